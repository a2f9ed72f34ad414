use clap::Args;
use colored::Colorize;
use kanri_core::Core;

use crate::commands::require_account;
use crate::utils::{command_error, display};

#[derive(Args, Debug)]
pub struct Command {
    /// Text of the task
    #[clap(required = true)]
    text: Vec<String>,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    require_account(core)?;

    match core.board.add(&command.text.join(" ")).await? {
        Some(task) => println!(
            "{} added '{}' to {} (id: {})",
            "✓".green().bold(),
            task.text,
            display::status_label(task.status),
            task.id.dimmed()
        ),
        None => println!("{}", "Nothing to add, the task text is empty.".yellow()),
    }

    Ok(())
}
