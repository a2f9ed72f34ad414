use clap::Args;
use kanri_core::Core;

#[derive(Args, Debug)]
pub struct Command {}

pub async fn handle(_: Command, core: &mut Core) -> eyre::Result<()> {
    core.session.logout();
    core.board.clear();
    println!("Logged out.");
    Ok(())
}
