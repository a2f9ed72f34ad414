/// The subset of `<sysexits.h>` exit codes this CLI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// A generic or unspecified error occurred.
    Error = 1,

    /// The command was used incorrectly. (EX_USAGE)
    Usage = 64,

    /// The input data was incorrect in some way. (EX_DATAERR)
    DataError = 65,

    /// A specified user did not exist or could not be authenticated. (EX_NOUSER)
    NoUser = 67,
}

impl ExitCode {
    /// Terminates the current process with the corresponding exit code.
    pub fn exit(self) -> ! {
        std::process::exit(self as i32)
    }
}
