use crate::utils::exit_code::ExitCode;

/// Failure of a CLI command: either an error worth printing as a report, or
/// a plain exit after the command already told the user what went wrong.
pub enum Error {
    ExitWithError(ExitCode, eyre::Report),
    Exit(ExitCode),
}

pub type Result<T> = std::result::Result<T, Error>;

impl<E> From<E> for Error
where
    E: Into<eyre::Report>,
{
    #[track_caller]
    fn from(error: E) -> Self {
        let r: eyre::Report = error.into();
        Self::ExitWithError(ExitCode::Error, r)
    }
}
