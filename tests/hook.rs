mod common;

use common::{Call, FakePlatform, FakeProcess};
use crashlog::{CrashHandler, HandleMode};
use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};

fn panic_in_thread(n: usize) {
    let res = std::thread::spawn(move || panic!("hook test {}", n)).join();
    assert!(res.is_err());
}

fn reports(config: &crashlog::HandlerConfig) -> usize {
    common::crash_files(config)
        .iter()
        .map(|(_, contents)| contents.matches("panic: hook test").count())
        .sum()
}

// The panic hook is process global, so this is all one test
#[test]
fn installs_delegates_and_reinstalls() {
    let previous_calls = Arc::new(AtomicUsize::new(0));
    {
        let pc = previous_calls.clone();
        std::panic::set_hook(Box::new(move |_| {
            pc.fetch_add(1, Ordering::SeqCst);
        }));
    }

    let root = tempfile::tempdir().unwrap();
    let config = common::config_in(root.path());

    // An expired file from an earlier run is swept on init
    let dir = config.log_dir().unwrap();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("CrashLog-20000101.txt"), b"ancient").unwrap();

    let process = FakeProcess::failing_restart();
    let handler = CrashHandler::builder()
        .config(config.clone())
        .platform(FakePlatform::new())
        .notifier(|_: &str| {})
        .process(process.clone())
        .build();

    handler.init(HandleMode::RESTART_APP).unwrap();
    assert_eq!(handler.handle_mode(), HandleMode::RestartApp);
    assert!(!dir.join("CrashLog-20000101.txt").exists());

    // Restarting fails, so after recording the crash the previous hook runs
    panic_in_thread(1);
    assert_eq!(reports(&config), 1);
    assert_eq!(previous_calls.load(Ordering::SeqCst), 1);

    // Reinstalling must not make us our own fallback
    handler.init(1).unwrap();
    panic_in_thread(2);
    assert_eq!(reports(&config), 2);
    assert_eq!(previous_calls.load(Ordering::SeqCst), 2);
    assert_eq!(process.calls(), vec![Call::Restart, Call::Restart]);

    // Only one handler per process
    let other = CrashHandler::builder()
        .config(config.clone())
        .process(FakeProcess::default())
        .build();
    assert!(matches!(
        other.init(0),
        Err(crashlog::Error::Handler(
            panic_handler::Error::HandlerAlreadyRegistered
        ))
    ));

    // Unknown modes exit, which handles the crash locally
    handler.init(42).unwrap();
    assert_eq!(handler.handle_mode(), HandleMode::ExitApp);
    panic_in_thread(3);
    assert_eq!(reports(&config), 3);
    assert_eq!(previous_calls.load(Ordering::SeqCst), 2);
    assert_eq!(
        process.calls()[2..],
        [Call::Sleep(Duration::from_millis(10)), Call::Terminate]
    );

    // Reinstalling from a thread that is unwinding is refused and leaves the
    // current installation in place
    struct InitOnUnwind(CrashHandler, Arc<AtomicUsize>);

    impl Drop for InitOnUnwind {
        fn drop(&mut self) {
            if matches!(
                self.0.init(0),
                Err(crashlog::Error::Handler(panic_handler::Error::Panicking))
            ) {
                self.1.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    let refused = Arc::new(AtomicUsize::new(0));
    {
        let guard = InitOnUnwind(handler.clone(), refused.clone());
        let res = std::thread::spawn(move || {
            let _guard = guard;
            panic!("unwinding init");
        })
        .join();
        assert!(res.is_err());
    }
    assert_eq!(refused.load(Ordering::SeqCst), 1);
    assert!(panic_handler::PanicHandler::is_attached());
    assert_eq!(previous_calls.load(Ordering::SeqCst), 2);
    assert_eq!(process.calls().last(), Some(&Call::Terminate));

    handler.init(42).unwrap();
    panic_in_thread(4);
    assert_eq!(reports(&config), 4);
    assert_eq!(previous_calls.load(Ordering::SeqCst), 2);

    handler.detach();
    assert!(!panic_handler::PanicHandler::is_attached());
    panic_in_thread(5);
    assert_eq!(reports(&config), 4);
    assert_eq!(previous_calls.load(Ordering::SeqCst), 3);
}
