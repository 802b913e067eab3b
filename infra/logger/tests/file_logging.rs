use std::fs;
use std::time::Duration;
use tempfile::tempdir;
use wspec_domain::config::LoggingConfig;
use wspec_logger::Logger;

#[test]
fn json_file_logging_from_config() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let config = LoggingConfig {
        level: "info".to_owned(),
        console: false,
        directory: Some(log_dir.clone()),
        json: true,
        max_files: 3,
    };

    let logger = Logger::from_config("winspector-file", &config)?;
    assert!(logger.guard().is_some());

    tracing::info!(domain = "vortex.data.microsoft.com", "blocklisted domain");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    let first = contents.lines().next().expect("log file should not be empty");
    assert!(first.starts_with('{'), "expected a JSON line, got: {first}");
    assert!(first.contains("vortex.data.microsoft.com"));

    Ok(())
}
