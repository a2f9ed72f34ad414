use clap::Args;
use colored::Colorize;
use kanri_core::Core;

#[derive(Args, Debug)]
pub struct Command {
    /// Show json output
    #[clap(long)]
    json: bool,
}

pub async fn handle(command: Command, core: &Core) -> eyre::Result<()> {
    if command.json {
        match core.session.current() {
            Some(account) => println!("{}", serde_json::to_string_pretty(account)?),
            // An empty object means nobody is logged in.
            None => println!("{{}}"),
        }
        return Ok(());
    }

    match core.session.current() {
        Some(account) => {
            println!(
                "{} logged in as {}",
                "●".green(),
                account.username.bold()
            );
            println!(
                "{} {}: {}",
                "  ╰─".dimmed(),
                "ID".bold(),
                account.id.dimmed()
            );
        }
        None => println!("{}", "No account is logged in.".yellow()),
    }

    Ok(())
}
