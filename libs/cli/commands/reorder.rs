use clap::Args;
use colored::Colorize;
use kanri_core::{board::DragRequest, Core};

use crate::commands::require_account;
use crate::utils::{command_error, display, task_ref};

#[derive(Args, Debug)]
pub struct Command {
    /// Id of the task (a unique prefix is enough)
    task_ref: String,

    /// 1-based position within the destination column
    #[clap(long)]
    at: usize,

    /// Destination column (defaults to the task's current column)
    #[clap(long)]
    to: Option<String>,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    require_account(core)?;

    let task = task_ref::resolve(core.board.tasks(), &command.task_ref)?.clone();
    let source_status = task.status;
    let source_index = core
        .board
        .column(source_status)
        .iter()
        .position(|candidate| candidate.id == task.id)
        .ok_or_else(|| eyre::eyre!("the board is out of sync, run `kanri board` to reload"))?;

    let destination_status = match &command.to {
        Some(column) => display::parse_status(column)?,
        None => source_status,
    };

    // Same-column reorders have N slots; moving into another column opens
    // an extra one at the bottom.
    let column_len = core.board.column(destination_status).len();
    let max_position = if destination_status == source_status {
        column_len
    } else {
        column_len + 1
    };
    if command.at < 1 || command.at > max_position {
        Err(eyre::eyre!(
            "position {} is out of range, {} holds positions 1 to {}",
            command.at,
            display::status_label(destination_status),
            max_position
        ))?;
    }

    let moved = core
        .board
        .drag(DragRequest {
            task_id: task.id.clone(),
            source: (source_status, source_index),
            destination: (destination_status, command.at - 1),
        })
        .await?;

    if moved {
        println!(
            "{} placed '{}' at position {} of {}",
            "✓".green().bold(),
            task.text,
            command.at,
            display::status_label(destination_status)
        );
    } else {
        println!("{}", "The task is already there.".yellow());
    }

    Ok(())
}
