use crashlog::{HandleMode, HandlerConfig};
use rstest::rstest;

#[rstest]
#[case(0, HandleMode::ExitApp)]
#[case(1, HandleMode::RestartApp)]
#[case(2, HandleMode::ExitApp)]
#[case(-1, HandleMode::ExitApp)]
#[case(i64::MAX, HandleMode::ExitApp)]
fn mode_codes(#[case] code: i64, #[case] expected: HandleMode) {
    assert_eq!(HandleMode::from_code(code), expected);
    assert_eq!(HandleMode::from(code), expected);
}

#[test]
fn valid_modes_round_trip_through_codes() {
    for mode in [HandleMode::ExitApp, HandleMode::RestartApp] {
        assert_eq!(HandleMode::from_code(mode.code()), mode);
    }
}

#[test]
fn defaults() {
    let config = HandlerConfig::default();

    assert_eq!(config.handle_mode, HandleMode::ExitApp);
    assert_eq!(config.file_name_prefix, "CrashLog");
    assert_eq!(config.directory_name, "Crash");
    assert_eq!(config.retention_days, 5);
    assert_eq!(config.notify_delay().as_millis(), 3000);
}

#[test]
fn empty_json_is_defaults() {
    let config = HandlerConfig::from_json_str("{}").unwrap();
    assert_eq!(config, HandlerConfig::default());
}

#[rstest]
#[case(r#"{"handle_mode": 1}"#, HandleMode::RestartApp)]
#[case(r#"{"handle_mode": 0}"#, HandleMode::ExitApp)]
#[case(r#"{"handle_mode": "restart_app"}"#, HandleMode::RestartApp)]
#[case(r#"{"handle_mode": "RestartApp"}"#, HandleMode::RestartApp)]
#[case(r#"{"handle_mode": 42}"#, HandleMode::ExitApp)]
#[case(r#"{"handle_mode": "explode"}"#, HandleMode::ExitApp)]
#[case(r#"{"handle_mode": true}"#, HandleMode::ExitApp)]
#[case(r#"{"handle_mode": null}"#, HandleMode::ExitApp)]
fn json_modes(#[case] json: &str, #[case] expected: HandleMode) {
    let config = HandlerConfig::from_json_str(json).unwrap();
    assert_eq!(config.handle_mode, expected);
}

#[test]
fn json_overrides() {
    let config = HandlerConfig::from_json_str(
        r#"{
            "file_name_prefix": "AppCrash",
            "directory_name": "logs",
            "retention_days": -7,
            "storage_root": "/var/tmp",
            "notify_delay_ms": 500
        }"#,
    )
    .unwrap();

    assert_eq!(config.file_name_prefix, "AppCrash");
    assert_eq!(config.directory_name, "logs");
    assert_eq!(config.retention_days, -7);
    assert_eq!(
        config.log_dir().unwrap(),
        std::path::Path::new("/var/tmp").join("logs")
    );
    assert_eq!(config.notify_delay().as_millis(), 500);
}

#[test]
fn null_storage_root_disables_storage() {
    let config = HandlerConfig::from_json_str(r#"{"storage_root": null}"#).unwrap();
    assert!(config.storage_root.is_none());
    assert!(config.log_dir().is_none());
}

#[test]
fn empty_names_are_ignored() {
    let config =
        HandlerConfig::from_json_str(r#"{"file_name_prefix": "", "directory_name": ""}"#).unwrap();
    assert_eq!(config.file_name_prefix, "CrashLog");
    assert_eq!(config.directory_name, "Crash");

    let mut config = HandlerConfig::default();
    config.set_file_name_prefix("Mine");
    config.set_file_name_prefix("");
    config.set_directory_name("");
    assert_eq!(config.file_name_prefix, "Mine");
    assert_eq!(config.directory_name, "Crash");
}

#[test]
fn invalid_json_is_an_error() {
    assert!(matches!(
        HandlerConfig::from_json_str("{ not json"),
        Err(crashlog::Error::Config(_))
    ));
    assert!(matches!(
        HandlerConfig::from_json_str(r#"{"retention_days": "five"}"#),
        Err(crashlog::Error::Config(_))
    ));
}

#[test]
fn from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crashlog.json");
    std::fs::write(&path, r#"{"handle_mode": "restart_app"}"#).unwrap();

    let config = HandlerConfig::from_path(&path).unwrap();
    assert_eq!(config.handle_mode, HandleMode::RestartApp);

    assert!(matches!(
        HandlerConfig::from_path(dir.path().join("missing.json")),
        Err(crashlog::Error::Io(_))
    ));
}
