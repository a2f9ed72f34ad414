use clap::Args;
use colored::Colorize;
use kanri_core::Core;

use crate::commands::require_account;
use crate::utils::{command_error, display, task_ref};

#[derive(Args, Debug)]
pub struct Command {
    /// Id of the task (a unique prefix is enough)
    task_ref: String,

    /// Destination column: todo, doing or done
    column: String,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    require_account(core)?;

    let status = display::parse_status(&command.column)?;
    let task = task_ref::resolve(core.board.tasks(), &command.task_ref)?.clone();

    if core.board.set_status(&task.id, status).await? {
        println!(
            "{} moved '{}' to {}",
            "✓".green().bold(),
            task.text,
            display::status_label(status)
        );
    }

    Ok(())
}
