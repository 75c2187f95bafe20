use std::{process::Command, time::Duration};

/// Control over the lifetime of the current process
pub trait ProcessControl: Send + Sync {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }

    /// Ends the process, implementations for a real process never return
    fn terminate(&self);

    /// Relaunches the application from its entry point, discarding all of the
    /// state of the current process
    fn restart(&self) -> Result<(), crate::Error>;
}

/// The [`ProcessControl`] for the current process
#[derive(Copy, Clone, Debug, Default)]
pub struct HostProcess;

impl ProcessControl for HostProcess {
    fn terminate(&self) {
        std::process::exit(1);
    }

    fn restart(&self) -> Result<(), crate::Error> {
        let exe = std::env::current_exe().map_err(crate::Error::Restart)?;
        let mut cmd = Command::new(exe);
        cmd.args(std::env::args_os().skip(1));

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;

            // exec replaces the process image, it only returns on failure
            Err(crate::Error::Restart(cmd.exec()))
        }
        #[cfg(not(unix))]
        {
            cmd.spawn().map_err(crate::Error::Restart)?;
            std::process::exit(0)
        }
    }
}
