use std::fs;
use std::path::PathBuf;
use wspec_kernel::config::{ConfigError, load_app_config, load_config};
use wspec_kernel::domain::config::AppConfig;

#[test]
fn loads_toml_and_rebases_relative_paths() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("winspector.toml");
    fs::write(
        &file,
        r#"
[knowledge]
kb_path = "kb/knowledge_base.yaml"
blocklist_path = "/srv/lists/telemetry.txt"
strict = true

[logging]
level = "debug"
"#,
    )?;

    let cfg = load_app_config(Some(&file))?;

    assert_eq!(cfg.knowledge.kb_path, dir.path().join("kb/knowledge_base.yaml"));
    assert_eq!(cfg.knowledge.blocklist_path, Some(PathBuf::from("/srv/lists/telemetry.txt")));
    assert_eq!(cfg.knowledge.domains_path, Some(dir.path().join("data/telemetry_domains.yaml")));
    assert!(cfg.knowledge.strict);
    assert_eq!(cfg.logging.level, "debug");
    Ok(())
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let missing = dir.path().join("absent.toml");

    let err = load_config::<AppConfig>(Some(&missing)).expect_err("missing file must fail");
    assert!(matches!(err, ConfigError::Config { .. }));
    assert_eq!(err.context_message(), Some("Failed to build config"));
}

#[test]
fn malformed_file_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("winspector.toml");
    fs::write(&file, "[knowledge\nkb_path = ")?;

    assert!(load_app_config(Some(&file)).is_err());
    Ok(())
}
