use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    time::Duration,
};

pub const DEFAULT_FILE_NAME_PREFIX: &str = "CrashLog";
pub const DEFAULT_DIRECTORY_NAME: &str = "Crash";
pub const DEFAULT_RETENTION_DAYS: i64 = 5;
pub const DEFAULT_NOTIFY_DELAY_MS: u64 = 3000;

/// What happens to the application once a crash has been recorded
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawHandleMode")]
pub enum HandleMode {
    /// Terminate the process
    #[default]
    ExitApp,
    /// Relaunch the application from its entry point
    RestartApp,
}

impl HandleMode {
    pub const EXIT_APP: i64 = 0;
    pub const RESTART_APP: i64 = 1;

    /// Maps a mode code to a mode, anything that isn't a known code is
    /// treated as [`HandleMode::ExitApp`]
    pub fn from_code(code: i64) -> Self {
        if code == Self::RESTART_APP {
            Self::RestartApp
        } else {
            Self::ExitApp
        }
    }

    /// Same as [`HandleMode::from_code`], for the names used in config files
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "restart_app" | "restartapp" | "restart" => Self::RestartApp,
            _ => Self::ExitApp,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::ExitApp => Self::EXIT_APP,
            Self::RestartApp => Self::RESTART_APP,
        }
    }

    /// The message shown to the user while the crash is being handled
    pub fn notice(self) -> &'static str {
        match self {
            Self::ExitApp => "Sorry, the application hit an unexpected error and will now exit.",
            Self::RestartApp => {
                "Sorry, the application hit an unexpected error and will now restart."
            }
        }
    }
}

impl From<i64> for HandleMode {
    fn from(code: i64) -> Self {
        Self::from_code(code)
    }
}

impl From<i32> for HandleMode {
    fn from(code: i32) -> Self {
        Self::from_code(code.into())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawHandleMode {
    Code(i64),
    Name(String),
    Other(serde::de::IgnoredAny),
}

impl From<RawHandleMode> for HandleMode {
    fn from(raw: RawHandleMode) -> Self {
        match raw {
            RawHandleMode::Code(code) => Self::from_code(code),
            RawHandleMode::Name(name) => Self::from_name(&name),
            RawHandleMode::Other(_) => Self::ExitApp,
        }
    }
}

/// Configuration for a [`CrashHandler`](crate::CrashHandler). Every field is
/// optional when deserializing, missing fields take their default.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    pub handle_mode: HandleMode,
    /// Crash files are named `<prefix>-<YYYYMMDD>.txt`
    pub file_name_prefix: String,
    /// The subdirectory of the storage root that crash files are written to
    pub directory_name: String,
    /// Files older than this many days are removed on init. Negative values
    /// are treated as their absolute value.
    pub retention_days: i64,
    /// Where crash directories live, `None` disables writing reports
    pub storage_root: Option<PathBuf>,
    /// How long to wait before exiting so the user notification can be seen
    pub notify_delay_ms: u64,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            handle_mode: HandleMode::ExitApp,
            file_name_prefix: DEFAULT_FILE_NAME_PREFIX.to_owned(),
            directory_name: DEFAULT_DIRECTORY_NAME.to_owned(),
            retention_days: DEFAULT_RETENTION_DAYS,
            storage_root: dirs::data_local_dir(),
            notify_delay_ms: DEFAULT_NOTIFY_DELAY_MS,
        }
    }
}

impl HandlerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, crate::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, crate::Error> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Empty names fall back to the defaults, same as the setters
    fn normalized(mut self) -> Self {
        if self.file_name_prefix.is_empty() {
            self.file_name_prefix = DEFAULT_FILE_NAME_PREFIX.to_owned();
        }
        if self.directory_name.is_empty() {
            self.directory_name = DEFAULT_DIRECTORY_NAME.to_owned();
        }
        self
    }

    /// Sets the crash file prefix, empty input is ignored
    pub fn set_file_name_prefix(&mut self, prefix: &str) {
        if !prefix.is_empty() {
            self.file_name_prefix = prefix.to_owned();
        }
    }

    /// Sets the crash directory name, empty input is ignored
    pub fn set_directory_name(&mut self, name: &str) {
        if !name.is_empty() {
            self.directory_name = name.to_owned();
        }
    }

    /// `<storage_root>/<directory_name>`, if there is a storage root
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.storage_root
            .as_ref()
            .map(|root| root.join(&self.directory_name))
    }

    #[inline]
    pub fn notify_delay(&self) -> Duration {
        Duration::from_millis(self.notify_delay_ms)
    }
}
