use clap::Subcommand;
use colored::Colorize;
use kanri_core::{session::Account, Core};
use kanri_store::BuiltinStoreType;

use crate::utils::command_error;
use crate::utils::exit_code::ExitCode;

pub mod add;
pub mod board;
pub mod delete;
pub mod delete_profile;
pub mod edit;
pub mod login;
pub mod logout;
pub mod move_task;
pub mod register;
pub mod reorder;
pub mod whoami;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create an account and log in
    Register(register::Command),
    /// Log in with an existing account
    Login(login::Command),
    /// Log out and forget the cached session
    Logout(logout::Command),
    /// Show the logged-in account
    Whoami(whoami::Command),
    /// Show the board
    Board(board::Command),
    /// Add a task to the todo column
    Add(add::Command),
    /// Remove a task
    Delete(delete::Command),
    /// Rewrite a task's text
    Edit(edit::Command),
    /// Move a task to another column, keeping its position value
    #[command(name = "move")]
    Move(move_task::Command),
    /// Move a task to an exact position, renumbering the column
    Reorder(reorder::Command),
    /// Delete the account and every task it owns
    DeleteProfile(delete_profile::Command),
}

impl Command {
    pub async fn execute(
        self,
        config: Option<String>,
        store: Option<String>,
    ) -> command_error::Result<()> {
        let config_path = match config {
            Some(path) => shellexpand::tilde(&path).to_string(),
            None => kanri_config::default_config_path()?
                .to_string_lossy()
                .to_string(),
        };

        let store_type = match store.as_deref() {
            None | Some("rest") => BuiltinStoreType::Rest,
            Some("in-memory") => BuiltinStoreType::InMemory,
            Some(other) => {
                eprintln!(
                    "{} unknown store type '{}', expected 'rest' or 'in-memory'",
                    "✗".red().bold(),
                    other
                );
                return Err(command_error::Error::Exit(ExitCode::Usage));
            }
        };

        let mut core = kanri_core::load(store_type, &config_path).await?;
        if let Err(e) = core.has_found_config_file() {
            tracing::debug!(error = %e, "no configuration file found, using defaults");
        }

        core.session.restore();
        if let Some(account) = core.session.current().cloned() {
            core.board.load(&account).await?;
        }

        match self {
            Self::Register(o) => register::handle(o, &mut core).await?,
            Self::Login(o) => login::handle(o, &mut core).await?,
            Self::Logout(o) => logout::handle(o, &mut core).await?,
            Self::Whoami(o) => whoami::handle(o, &core).await?,
            Self::Board(o) => board::handle(o, &core).await?,
            Self::Add(o) => add::handle(o, &mut core).await?,
            Self::Delete(o) => delete::handle(o, &mut core).await?,
            Self::Edit(o) => edit::handle(o, &mut core).await?,
            Self::Move(o) => move_task::handle(o, &mut core).await?,
            Self::Reorder(o) => reorder::handle(o, &mut core).await?,
            Self::DeleteProfile(o) => delete_profile::handle(o, &mut core).await?,
        };

        Ok(())
    }
}

/// Commands acting on the board refuse to run anonymously with one inline
/// message instead of silently doing nothing.
pub(crate) fn require_account(core: &Core) -> command_error::Result<Account> {
    match core.session.current() {
        Some(account) => Ok(account.clone()),
        None => {
            eprintln!(
                "{} you are not logged in, run {} first",
                "✗".red().bold(),
                "kanri login".bold()
            );
            Err(command_error::Error::Exit(ExitCode::NoUser))
        }
    }
}
