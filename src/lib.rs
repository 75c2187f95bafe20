//! Captures uncaught panics (and fatal errors) into dated crash reports.
//!
//! ```no_run
//! let handler = crashlog::CrashHandler::global(|| {
//!     crashlog::CrashHandler::builder()
//!         .platform(crashlog::HostPlatform::with_package(crashlog::package_info!()))
//!         .build()
//! });
//!
//! handler.init(crashlog::HandleMode::ExitApp).unwrap();
//! ```

/// Builds a [`PackageInfo`] for the crate this is invoked from
#[macro_export]
macro_rules! package_info {
    () => {
        $crate::PackageInfo::from_cargo(
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
            env!("CARGO_PKG_VERSION_MAJOR"),
            env!("CARGO_PKG_VERSION_MINOR"),
            env!("CARGO_PKG_VERSION_PATCH"),
        )
    };
}

pub mod config;
mod error;
mod exception;
mod handler;
pub mod metadata;
mod notify;
mod process;
pub mod report;
pub mod retention;

pub use config::{HandleMode, HandlerConfig};
pub use error::Error;
pub use exception::Exception;
pub use handler::{Builder, CrashHandler};
pub use metadata::{HostPlatform, Metadata, PackageInfo, Platform};
pub use notify::{Notifier, StderrNotifier};
pub use panic_handler::Disposition;
pub use process::{HostProcess, ProcessControl};
pub use report::ReportWriter;
