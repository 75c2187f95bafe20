use crashlog::{CrashHandler, HandleMode, HandlerConfig, HostPlatform};

const RESTARTED: &str = "CRASHLOG_DEMO_RESTARTED";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = match std::env::args().skip_while(|a| a != "--config").nth(1) {
        Some(path) => HandlerConfig::from_path(path).unwrap(),
        None => HandlerConfig {
            storage_root: std::env::current_dir().ok(),
            ..Default::default()
        },
    };

    let mode = if std::env::args().any(|a| a == "--restart") {
        HandleMode::RestartApp
    } else {
        config.handle_mode
    };

    let handler = CrashHandler::global(|| {
        CrashHandler::builder()
            .config(config)
            .platform(HostPlatform::with_package(crashlog::package_info!()))
            .build()
    });

    // The relaunched process inherits our environment, use it to avoid
    // crashing in a loop
    if std::env::var_os(RESTARTED).is_some() {
        println!("restarted after a crash");
        return;
    }
    std::env::set_var(RESTARTED, "1");

    handler.init(mode).unwrap();

    println!(
        "crash reports go to {}",
        handler
            .log_dir()
            .map(|dir| dir.join(handler.file_name()).display().to_string())
            .unwrap_or_else(|| "nowhere, no storage is available".to_owned())
    );

    if std::env::args().any(|a| a == "--panic") {
        let values: Vec<u32> = Vec::new();
        println!("{}", values[3]);
    }

    if std::env::args().any(|a| a == "--error") {
        let err = std::fs::read("/definitely/not/here").unwrap_err();
        handler.fatal_error(&err);
    }
}
