use clap::Args;
use colored::Colorize;
use kanri_core::Core;

use crate::commands::require_account;
use crate::utils::{command_error, prompt, task_ref};

#[derive(Args, Debug)]
pub struct Command {
    /// Id of the task (a unique prefix is enough)
    task_ref: String,

    /// Skip the confirmation prompt
    #[clap(long)]
    yes: bool,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    require_account(core)?;

    let task = task_ref::resolve(core.board.tasks(), &command.task_ref)?.clone();

    if !command.yes {
        let question = format!("Are you sure you want to delete '{}'?", task.text);
        if !prompt::confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    if core.board.delete(&task.id).await? {
        println!("{} deleted '{}'", "✓".green().bold(), task.text);
    }

    Ok(())
}
