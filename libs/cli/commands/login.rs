use clap::Args;
use colored::Colorize;
use kanri_core::{session::SessionError, Core};

use crate::utils::command_error;
use crate::utils::exit_code::ExitCode;

#[derive(Args, Debug)]
pub struct Command {
    /// Name of the account
    username: String,

    /// Password of the account
    password: String,
}

pub async fn handle(command: Command, core: &mut Core) -> command_error::Result<()> {
    match core
        .session
        .login(&command.username, &command.password)
        .await
    {
        Ok(account) => {
            println!(
                "{} logged in as {}",
                "✓".green().bold(),
                account.username.bold()
            );
            Ok(())
        }
        Err(e @ SessionError::InvalidCredentials) => {
            eprintln!("{} {e}", "✗".red().bold());
            Err(command_error::Error::Exit(ExitCode::NoUser))
        }
        Err(e) => Err(eyre::Report::new(e))?,
    }
}
