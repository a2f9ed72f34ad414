use clap::Args;
use colored::Colorize;
use kanri_core::{session::SessionError, Core};

use crate::commands::require_account;
use crate::utils::{command_error, prompt};
use crate::utils::exit_code::ExitCode;

#[derive(Args, Debug)]
pub struct Command {
    /// Account name, prompted for when omitted
    #[clap(long)]
    username: Option<String>,

    /// Account password, prompted for when omitted
    #[clap(long)]
    password: Option<String>,

    /// Skip the confirmation prompt
    #[clap(long)]
    yes: bool,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    let account = require_account(core)?;

    if !command.yes {
        let question = format!(
            "Delete the profile '{}' and every task it owns?",
            account.username
        );
        if !prompt::confirm(&question)? {
            println!("Aborted.");
            return Ok(());
        }
    }

    // Deleting a profile asks for the credentials again.
    let username = match command.username {
        Some(value) => value,
        None => prompt::line("Confirm username: ")?,
    };
    let password = match command.password {
        Some(value) => value,
        None => prompt::line("Confirm password: ")?,
    };

    match core.session.delete_profile(&username, &password).await {
        Ok(()) => {
            core.board.clear();
            println!("{} profile deleted", "✓".green().bold());
            Ok(())
        }
        Err(e @ SessionError::InvalidCredentials) => {
            eprintln!("{} {e}, the profile was kept", "✗".red().bold());
            Err(command_error::Error::Exit(ExitCode::NoUser))
        }
        Err(e) => Err(eyre::Report::new(e))?,
    }
}
