use clap::Parser;

mod commands;
mod tracing;
mod utils;

use utils::command_error;

// Note: for uniformity, we dont use clap `default_value` or `default_value_t` options
#[derive(Parser, Debug)]
#[command(
    name = "kanri",
    version,
    long_about = Some("A personal task board in the terminal: three fixed columns, positional reordering, and a remote store as the source of truth.")
)]
struct Args {
    /// Path of the configuration file (default: ~/.config/kanri/config.toml)
    #[clap(long, global = true)]
    config: Option<String>,

    /// Store implementation to use: rest or in-memory (default: rest)
    #[clap(long, global = true)]
    store: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    command: commands::Command,
}

#[tokio::main]
pub async fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    tracing::setup()?;

    let args = Args::parse();

    match args.command.execute(args.config, args.store).await {
        Ok(()) => Ok(()),
        Err(command_error::Error::Exit(code)) => code.exit(),
        Err(command_error::Error::ExitWithError(code, report)) => {
            eprintln!("{report:?}");
            code.exit()
        }
    }
}
