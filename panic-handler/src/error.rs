use std::fmt;

#[derive(Debug)]
pub enum Error {
    HandlerAlreadyRegistered,
    /// The panic hook can't be changed while the current thread is panicking
    Panicking,
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HandlerAlreadyRegistered => {
                f.write_str("Unable to register panic handler, only one is allowed at a time")
            }
            Self::Panicking => f.write_str("Unable to register panic handler while panicking"),
        }
    }
}
