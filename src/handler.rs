use crate::{
    config::{HandleMode, HandlerConfig},
    exception::Exception,
    metadata::{self, HostPlatform, Platform},
    notify::{self, Notifier, StderrNotifier},
    process::{HostProcess, ProcessControl},
    report::ReportWriter,
    retention, Error,
};
use panic_handler::{Disposition, PanicHandler};
use parking_lot::Mutex;
use std::{
    panic::{self, AssertUnwindSafe, PanicHookInfo},
    path::PathBuf,
    sync::{Arc, OnceLock},
};
use tracing::{debug, error, info, warn};

static INSTANCE: OnceLock<CrashHandler> = OnceLock::new();

struct Inner {
    config: Mutex<HandlerConfig>,
    platform: Box<dyn Platform>,
    notifier: Arc<dyn Notifier>,
    process: Box<dyn ProcessControl>,
    attached: Mutex<Option<PanicHandler>>,
}

impl Inner {
    fn uncaught_exception(&self, exception: Option<&Exception>) -> Disposition {
        let exception = match exception {
            Some(exception) => exception,
            None => {
                debug!("nothing to handle, delegating");
                return Disposition::Delegate;
            }
        };

        // A collaborator panicking is a failure to handle, same as an error.
        // This can't help when already inside the panic hook, a second panic
        // there aborts the process.
        match panic::catch_unwind(AssertUnwindSafe(|| self.handle(exception))) {
            Ok(Ok(())) => Disposition::Handled,
            Ok(Err(e)) => {
                error!(error = %e, "unable to handle crash, delegating");
                Disposition::Delegate
            }
            Err(payload) => {
                let msg = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("Box<dyn Any>");
                error!(panic = msg, "panicked while handling crash, delegating");
                Disposition::Delegate
            }
        }
    }

    fn handle(&self, exception: &Exception) -> Result<(), Error> {
        // Snapshot so the lock isn't held across the sleep/restart
        let config = self.config.lock().clone();

        // Fire and forget, the report is written either way
        if let Err(e) = notify::spawn_notification(
            Arc::clone(&self.notifier),
            config.handle_mode.notice().to_owned(),
        ) {
            warn!(error = %e, "unable to show crash notification");
        }

        let metadata = metadata::collect(self.platform.as_ref());
        let file_name = ReportWriter::new(&config).write(&metadata, exception);
        debug!(file_name = %file_name, "crash report recorded");

        match config.handle_mode {
            HandleMode::RestartApp => self.process.restart(),
            HandleMode::ExitApp => {
                self.process.sleep(config.notify_delay());
                self.process.terminate();
                Ok(())
            }
        }
    }
}

/// The process-wide crash handler. Once [`init`](CrashHandler::init)ed, every
/// panic in the process is recorded to a dated crash file before the
/// application exits or restarts.
///
/// Only one handler can be installed per process at a time, see
/// [`CrashHandler::global`] for the process singleton.
#[derive(Clone)]
pub struct CrashHandler {
    inner: Arc<Inner>,
}

impl CrashHandler {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the process singleton, built by `build` on first use. Later
    /// calls return the same handler and never run `build`.
    pub fn global(build: impl FnOnce() -> CrashHandler) -> &'static CrashHandler {
        INSTANCE.get_or_init(build)
    }

    /// Returns the process singleton, built with defaults on first use
    pub fn instance() -> &'static CrashHandler {
        Self::global(|| Self::builder().build())
    }

    /// Installs this handler as the process' panic hook and removes expired
    /// crash files. `mode` is validated, unknown modes become
    /// [`HandleMode::ExitApp`].
    ///
    /// Calling this again updates the mode and reinstalls the hook, the hook
    /// that predates the first call stays the fallback.
    pub fn init(&self, mode: impl Into<HandleMode>) -> Result<(), Error> {
        // Detaching while unwinding can't restore the previous hook, so leave
        // the current installation alone
        if std::thread::panicking() {
            return Err(panic_handler::Error::Panicking.into());
        }

        self.set_handle_mode(mode);

        {
            let mut attached = self.inner.attached.lock();

            // Detach first, otherwise we would capture ourselves as the
            // previous hook
            attached.take();

            let inner = Arc::clone(&self.inner);
            let handler = PanicHandler::attach(Box::new(move |info: &PanicHookInfo<'_>| {
                let exception = Exception::from_panic(info);
                inner.uncaught_exception(Some(&exception))
            }))?;

            *attached = Some(handler);
        }

        info!("crash handler installed");
        self.sweep();
        Ok(())
    }

    /// Uninstalls the panic hook, restoring the one that was in place before
    /// [`CrashHandler::init`]
    pub fn detach(&self) {
        if self.inner.attached.lock().take().is_some() {
            info!("crash handler detached");
        }
    }

    /// Handles an uncaught exception. `None` means there is nothing to
    /// handle. If the crash can't be handled locally the caller should fall
    /// back to its previous handler.
    pub fn uncaught_exception(&self, exception: Option<&Exception>) -> Disposition {
        self.inner.uncaught_exception(exception)
    }

    /// Handles an error that is fatal to the application, eg. one returned
    /// from `main`. There is no previous handler for errors, so if it can't
    /// be handled locally the process is terminated.
    pub fn fatal_error(&self, error: &(dyn std::error::Error + 'static)) {
        let exception = Exception::from_error(error);

        if self.inner.uncaught_exception(Some(&exception)) == Disposition::Delegate {
            self.inner.process.terminate();
        }
    }

    /// Removes expired crash files from the crash directory
    pub fn sweep(&self) -> Vec<PathBuf> {
        let (dir, retention_days) = {
            let config = self.inner.config.lock();
            (config.log_dir(), config.retention_days)
        };

        match dir {
            Some(dir) => retention::sweep(&dir, retention_days),
            None => Vec::new(),
        }
    }

    pub fn set_handle_mode(&self, mode: impl Into<HandleMode>) {
        self.inner.config.lock().handle_mode = mode.into();
    }

    pub fn handle_mode(&self) -> HandleMode {
        self.inner.config.lock().handle_mode
    }

    /// Sets the crash file prefix, empty input is ignored
    pub fn set_file_name(&self, prefix: &str) {
        self.inner.config.lock().set_file_name_prefix(prefix);
    }

    /// Sets the crash directory name, empty input is ignored
    pub fn set_directory_name(&self, name: &str) {
        self.inner.config.lock().set_directory_name(name);
    }

    pub fn set_retention_days(&self, days: i64) {
        self.inner.config.lock().retention_days = days;
    }

    /// The name of the file crashes happening today are written to
    pub fn file_name(&self) -> String {
        ReportWriter::new(&self.inner.config.lock()).file_name(chrono::Local::now().date_naive())
    }

    /// The directory crash files are written to
    pub fn log_dir(&self) -> Option<PathBuf> {
        self.inner.config.lock().log_dir()
    }

    pub fn config(&self) -> HandlerConfig {
        self.inner.config.lock().clone()
    }
}

/// Builds a [`CrashHandler`], every collaborator defaults to the one for the
/// current process
#[derive(Default)]
pub struct Builder {
    config: Option<HandlerConfig>,
    platform: Option<Box<dyn Platform>>,
    notifier: Option<Arc<dyn Notifier>>,
    process: Option<Box<dyn ProcessControl>>,
}

impl Builder {
    pub fn config(mut self, config: HandlerConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Some(Box::new(platform));
        self
    }

    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    pub fn process(mut self, process: impl ProcessControl + 'static) -> Self {
        self.process = Some(Box::new(process));
        self
    }

    pub fn build(self) -> CrashHandler {
        CrashHandler {
            inner: Arc::new(Inner {
                config: Mutex::new(self.config.unwrap_or_default()),
                platform: self
                    .platform
                    .unwrap_or_else(|| Box::new(HostPlatform::default())),
                notifier: self.notifier.unwrap_or_else(|| Arc::new(StderrNotifier)),
                process: self.process.unwrap_or_else(|| Box::new(HostProcess)),
                attached: Mutex::new(None),
            }),
        }
    }
}
