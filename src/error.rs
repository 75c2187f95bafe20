use std::fmt;

#[derive(Debug)]
pub enum Error {
    Handler(panic_handler::Error),
    Io(std::io::Error),
    Config(serde_json::Error),
    /// The host didn't provide package information for the application
    PackageNotFound(String),
    /// Relaunching the application failed
    Restart(std::io::Error),
    /// The notification thread couldn't be started
    Spawn(std::io::Error),
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Handler(e) => Some(e),
            Self::Io(e) | Self::Restart(e) | Self::Spawn(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::PackageNotFound(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handler(e) => write!(f, "handler error: {}", e),
            Self::Io(e) => write!(f, "io error: {}", e),
            Self::Config(e) => write!(f, "invalid configuration: {}", e),
            Self::PackageNotFound(name) => write!(f, "package info for '{}' not found", name),
            Self::Restart(e) => write!(f, "unable to restart application: {}", e),
            Self::Spawn(e) => write!(f, "unable to spawn notification thread: {}", e),
        }
    }
}

impl From<panic_handler::Error> for Error {
    fn from(e: panic_handler::Error) -> Self {
        Self::Handler(e)
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e)
    }
}
