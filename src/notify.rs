use std::sync::Arc;

/// Shows a short message to the user while a crash is handled
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

impl<F> Notifier for F
where
    F: Fn(&str) + Send + Sync,
{
    fn notify(&self, message: &str) {
        self(message)
    }
}

/// Writes the notification to stderr
#[derive(Copy, Clone, Debug, Default)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Shows `message` from a detached thread running its own message loop. The
/// thread is never joined, it may or may not get to run before the process
/// goes away.
pub(crate) fn spawn_notification(
    notifier: Arc<dyn Notifier>,
    message: String,
) -> Result<(), crate::Error> {
    let (tx, rx) = crossbeam::channel::bounded::<String>(1);

    std::thread::Builder::new()
        .name("crashlog-notify".to_owned())
        .spawn(move || {
            // Ends once the sender is dropped
            for message in rx {
                notifier.notify(&message);
            }
        })
        .map_err(crate::Error::Spawn)?;

    // Capacity is 1 and this is the only send, so this can't block
    let _ = tx.send(message);
    Ok(())
}
