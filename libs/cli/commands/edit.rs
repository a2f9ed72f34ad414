use clap::Args;
use colored::Colorize;
use kanri_core::Core;

use crate::commands::require_account;
use crate::utils::{command_error, task_ref};

#[derive(Args, Debug)]
pub struct Command {
    /// Id of the task (a unique prefix is enough)
    task_ref: String,

    /// Replacement text
    #[clap(required = true)]
    text: Vec<String>,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    require_account(core)?;

    let task = task_ref::resolve(core.board.tasks(), &command.task_ref)?.clone();
    let text = command.text.join(" ");

    if core.board.edit(&task.id, &text).await? {
        println!("{} task now reads '{}'", "✓".green().bold(), text.trim());
    } else {
        println!(
            "{}",
            "Nothing to change, the replacement text is empty.".yellow()
        );
    }

    Ok(())
}
