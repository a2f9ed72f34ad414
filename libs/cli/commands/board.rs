use clap::Args;
use kanri_core::{task::TaskStatus, Core};

use crate::commands::require_account;
use crate::utils::{command_error, display};

#[derive(Args, Debug)]
pub struct Command {
    /// Show json output
    #[clap(long)]
    json: bool,
}

pub async fn handle(command: Command, core: &Core) -> command_error::Result<()> {
    require_account(core)?;

    if command.json {
        let output = serde_json::json!({
            "todo": core.board.column(TaskStatus::Todo),
            "doing": core.board.column(TaskStatus::Doing),
            "done": core.board.column(TaskStatus::Done),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    display::print_board(&core.board);
    Ok(())
}
