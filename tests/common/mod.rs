#![allow(dead_code)]

use crashlog::{metadata::BuildField, Error, HandlerConfig, PackageInfo, Platform, ProcessControl};
use parking_lot::Mutex;
use std::{path::Path, sync::Arc, time::Duration};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Sleep(Duration),
    Terminate,
    Restart,
}

/// Records process control calls instead of acting on them
#[derive(Clone, Default)]
pub struct FakeProcess {
    pub calls: Arc<Mutex<Vec<Call>>>,
    pub fail_restart: bool,
}

impl FakeProcess {
    pub fn failing_restart() -> Self {
        Self {
            fail_restart: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }
}

impl ProcessControl for FakeProcess {
    fn sleep(&self, duration: Duration) {
        self.calls.lock().push(Call::Sleep(duration));
    }

    fn terminate(&self) {
        self.calls.lock().push(Call::Terminate);
    }

    fn restart(&self) -> Result<(), Error> {
        self.calls.lock().push(Call::Restart);

        if self.fail_restart {
            Err(Error::Restart(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no launcher",
            )))
        } else {
            Ok(())
        }
    }
}

pub struct FakePlatform {
    pub package: Option<PackageInfo>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self {
            package: Some(PackageInfo {
                name: "crash-test".to_owned(),
                version_name: "1.2.3".to_owned(),
                version_code: 10203,
            }),
        }
    }

    pub fn without_package() -> Self {
        Self { package: None }
    }
}

impl Platform for FakePlatform {
    fn package_info(&self) -> Result<PackageInfo, Error> {
        self.package
            .clone()
            .ok_or_else(|| Error::PackageNotFound("crash-test".to_owned()))
    }

    fn build_fields(&self) -> Vec<BuildField> {
        vec![
            ("MODEL", Ok("test-device".to_owned())),
            (
                "SERIAL",
                Err(crashlog::metadata::FieldError::Unsupported("SERIAL")),
            ),
        ]
    }
}

pub fn config_in(root: &Path) -> HandlerConfig {
    HandlerConfig {
        storage_root: Some(root.to_owned()),
        notify_delay_ms: 10,
        ..Default::default()
    }
}

/// Reads every crash file in the crash directory of `config`
pub fn crash_files(config: &HandlerConfig) -> Vec<(String, String)> {
    let dir = match config.log_dir() {
        Some(dir) => dir,
        None => return Vec::new(),
    };

    let mut files: Vec<_> = match std::fs::read_dir(&dir) {
        Ok(rd) => rd
            .filter_map(|e| e.ok())
            .map(|e| {
                (
                    e.file_name().to_string_lossy().into_owned(),
                    std::fs::read_to_string(e.path()).unwrap(),
                )
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    files.sort();
    files
}
