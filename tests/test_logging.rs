use chatstats::logging;

#[test]
fn test_logging_writes_to_file() -> anyhow::Result<()> {
    // Create a temporary test directory
    let test_dir = tempfile::tempdir()?;
    let log_dir = test_dir.path().join("logs");

    logging::init_logging(Some(&log_dir), false)?;

    tracing::info!("Test info message");
    tracing::debug!("Test debug message");
    tracing::warn!("Test warning message");

    let log_file = log_dir.join(logging::LOG_FILE_NAME);
    assert!(log_file.exists(), "Log file not created: {}", log_file.display());

    let contents = std::fs::read_to_string(&log_file)?;
    assert!(contents.contains("New run"));
    assert!(contents.contains("Test info message"));
    assert!(contents.contains("Test warning message"));
    if std::env::var_os("RUST_LOG").is_none() {
        assert!(!contents.contains("Test debug message"));
    }

    Ok(())
}
