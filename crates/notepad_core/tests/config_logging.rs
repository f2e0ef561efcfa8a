use notepad_core::{logging_status, NotepadConfig};

#[test]
fn config_log_level_drives_logging_init() {
    let log_dir = tempfile::tempdir().unwrap();

    let rejected = NotepadConfig {
        log_level: "verbose".to_string(),
        ..NotepadConfig::default()
    };
    assert!(rejected.init_logging(log_dir.path()).is_err());
    assert!(logging_status().is_none());

    let config = NotepadConfig {
        log_level: "WARN".to_string(),
        ..NotepadConfig::default()
    };
    config.init_logging(log_dir.path()).unwrap();

    let (active_level, active_dir) = logging_status().unwrap();
    assert_eq!(active_level, "warn");
    assert_eq!(active_dir, log_dir.path());
}
