//! Best-effort collection of application and platform details that are
//! written at the top of every crash report.

use std::collections::BTreeMap;
use tracing::warn;

/// Metadata keys mapped to their values, ordered by key
pub type Metadata = BTreeMap<String, String>;

pub const VERSION_NAME: &str = "versionName";
pub const VERSION_CODE: &str = "versionCode";

/// Identity of the application that is crashing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub version_name: String,
    pub version_code: u32,
}

impl PackageInfo {
    /// Builds package info from cargo's package environment variables, the
    /// version code is `major * 10000 + minor * 100 + patch`. See
    /// [`package_info!`](crate::package_info).
    pub fn from_cargo(name: &str, version: &str, major: &str, minor: &str, patch: &str) -> Self {
        let part = |s: &str| s.parse::<u32>().unwrap_or(0);
        let version_code = part(major)
            .saturating_mul(10_000)
            .saturating_add(part(minor).saturating_mul(100))
            .saturating_add(part(patch));

        Self {
            name: name.to_owned(),
            version_name: version.to_owned(),
            version_code,
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FieldError {
    #[error("unable to query {field}: {source}")]
    Io {
        field: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),
}

/// A build field, by name, and the result of reading it
pub type BuildField = (&'static str, Result<String, FieldError>);

/// Queries the host for details about the application and the platform it
/// is running on
pub trait Platform: Send + Sync {
    fn package_info(&self) -> Result<PackageInfo, crate::Error>;

    /// The fixed set of platform fields to record
    fn build_fields(&self) -> Vec<BuildField>;
}

/// The [`Platform`] for the current process
#[derive(Clone, Debug, Default)]
pub struct HostPlatform {
    package: Option<PackageInfo>,
}

impl HostPlatform {
    pub fn with_package(package: PackageInfo) -> Self {
        Self {
            package: Some(package),
        }
    }
}

impl Platform for HostPlatform {
    fn package_info(&self) -> Result<PackageInfo, crate::Error> {
        self.package.clone().ok_or_else(|| {
            let name = std::env::current_exe()
                .ok()
                .and_then(|exe| exe.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .unwrap_or_default();
            crate::Error::PackageNotFound(name)
        })
    }

    fn build_fields(&self) -> Vec<BuildField> {
        let mut fields: Vec<BuildField> = vec![
            ("OS", Ok(std::env::consts::OS.to_owned())),
            ("ARCH", Ok(std::env::consts::ARCH.to_owned())),
            ("FAMILY", Ok(std::env::consts::FAMILY.to_owned())),
            (
                "CPUS",
                std::thread::available_parallelism()
                    .map(|n| n.to_string())
                    .map_err(|source| FieldError::Io {
                        field: "CPUS",
                        source,
                    }),
            ),
            ("PID", Ok(std::process::id().to_string())),
        ];

        fields.extend(uname_fields());
        fields
    }
}

cfg_if::cfg_if! {
    if #[cfg(unix)] {
        fn uname_fields() -> Vec<BuildField> {
            let uts = nix::sys::utsname::uname();

            vec![
                ("SYSNAME", Ok(uts.sysname().to_owned())),
                ("NODENAME", Ok(uts.nodename().to_owned())),
                ("RELEASE", Ok(uts.release().to_owned())),
                ("VERSION", Ok(uts.version().to_owned())),
                ("MACHINE", Ok(uts.machine().to_owned())),
            ]
        }
    } else {
        fn uname_fields() -> Vec<BuildField> {
            ["SYSNAME", "NODENAME", "RELEASE", "VERSION", "MACHINE"]
                .iter()
                .map(|field| (*field, Err(FieldError::Unsupported(*field))))
                .collect()
        }
    }
}

/// Gathers the package version and every readable build field. Failures are
/// logged and the affected keys are left out, this never fails as a whole.
pub fn collect(platform: &dyn Platform) -> Metadata {
    let mut infos = Metadata::new();

    match platform.package_info() {
        Ok(package) => {
            infos.insert(VERSION_NAME.to_owned(), package.version_name);
            infos.insert(VERSION_CODE.to_owned(), package.version_code.to_string());
        }
        Err(e) => {
            warn!(error = %e, "an error occurred when collecting package info");
        }
    }

    for (name, value) in platform.build_fields() {
        match value {
            Ok(value) => {
                infos.insert(name.to_owned(), value);
            }
            Err(e) => {
                warn!(field = name, error = %e, "unable to read build field");
            }
        }
    }

    infos
}
