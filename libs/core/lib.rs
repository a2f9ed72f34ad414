pub mod board;
pub mod cache;
pub mod session;
pub mod task;

mod load;

pub use load::{load, load_core};

use board::Board;
use session::Session;

/// The composed application core: an explicit session object and board
/// object sharing one store handle, wired together at load time and passed
/// by reference to whichever front-end needs them.
pub struct Core {
    pub session: Session,
    pub board: Board,
    /// Ok - found | Err - not found with error reason
    found_config_file: Result<(), eyre::Error>,
}

impl Core {
    pub fn has_found_config_file(&self) -> &Result<(), eyre::Error> {
        &self.found_config_file
    }
}
