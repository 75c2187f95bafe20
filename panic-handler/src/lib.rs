mod error;
pub use error::Error;

use std::{
    panic::{self, PanicHookInfo},
    sync::{atomic, Arc},
};

/// The signature of a hook installed with [`std::panic::set_hook`]
pub type PanicHook = dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static;

/// What the crash callback did with a panic
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// The panic was handled locally, the previous hook is not run
    Handled,
    /// The panic is passed on to the hook that was installed before ours
    Delegate,
}

pub trait CrashEvent: Sync + Send {
    fn on_crash(&self, info: &PanicHookInfo<'_>) -> Disposition;
}

impl<F> CrashEvent for F
where
    F: Fn(&PanicHookInfo<'_>) -> Disposition + Send + Sync,
{
    fn on_crash(&self, info: &PanicHookInfo<'_>) -> Disposition {
        self(info)
    }
}

static HANDLER_ATTACHED: atomic::AtomicBool = atomic::AtomicBool::new(false);

/// The hook that was installed before ours, restored on detach
static PREVIOUS_HOOK: parking_lot::Mutex<Option<Arc<PanicHook>>> = parking_lot::const_mutex(None);

/// Runs the hook that predates the handler, or terminates the process
/// directly if there is none to fall back to
fn delegate(info: &PanicHookInfo<'_>) {
    // Clone out so the lock isn't held while the previous hook runs
    let previous = PREVIOUS_HOOK.lock().clone();

    match previous {
        Some(previous) => previous(info),
        None => std::process::abort(),
    }
}

pub struct PanicHandler {
    _attached: (),
}

impl PanicHandler {
    /// Installs a panic hook that forwards every panic to `on_crash`. The
    /// hook that was installed at the time of the call is captured and used
    /// as the fallback whenever `on_crash` returns [`Disposition::Delegate`].
    /// Only one handler can be attached at a time, dropping the returned
    /// handler detaches it and restores the captured hook.
    pub fn attach(on_crash: Box<dyn CrashEvent>) -> Result<Self, Error> {
        // take_hook/set_hook panic when called from a panicking thread
        if std::thread::panicking() {
            return Err(Error::Panicking);
        }

        if HANDLER_ATTACHED
            .compare_exchange(
                false,
                true,
                atomic::Ordering::AcqRel,
                atomic::Ordering::Relaxed,
            )
            .is_err()
        {
            return Err(Error::HandlerAlreadyRegistered);
        }

        let previous: Arc<PanicHook> = Arc::from(panic::take_hook());
        *PREVIOUS_HOOK.lock() = Some(previous);

        panic::set_hook(Box::new(move |info| match on_crash.on_crash(info) {
            Disposition::Handled => {}
            Disposition::Delegate => delegate(info),
        }));

        Ok(Self { _attached: () })
    }

    /// Returns true if a handler is currently attached in this process
    pub fn is_attached() -> bool {
        HANDLER_ATTACHED.load(atomic::Ordering::Acquire)
    }
}

impl Drop for PanicHandler {
    fn drop(&mut self) {
        // The hook can't be swapped out from under a panicking thread, leave
        // it installed, the process is going down anyway
        if std::thread::panicking() {
            return;
        }

        drop(panic::take_hook());

        if let Some(previous) = PREVIOUS_HOOK.lock().take() {
            panic::set_hook(Box::new(move |info| previous(info)));
        }

        HANDLER_ATTACHED.store(false, atomic::Ordering::Release);
    }
}
