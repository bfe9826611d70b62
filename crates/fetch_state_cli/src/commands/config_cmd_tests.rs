use super::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_init_config_writes_defaults() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("fetch-state.toml");
    let path = config_path.to_string_lossy().to_string();

    init_config(Some(&path)).expect("Init should succeed");

    let loaded = AppConfig::load(&config_path).expect("Failed to load config");
    assert_eq!(loaded, AppConfig::default());
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("fetch-state.toml");
    fs::write(&config_path, "[fetch]\nmanual = true\n").expect("Failed to write config");
    let path = config_path.to_string_lossy().to_string();

    let result = init_config(Some(&path));

    match result {
        Err(Error::Config(msg)) => assert!(msg.contains("already exists")),
        other => panic!("Expected Config error, got {other:?}"),
    }
    let content = fs::read_to_string(&config_path).expect("Failed to read config");
    assert_eq!(content, "[fetch]\nmanual = true\n");
}

#[test]
fn test_show_config_reads_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("fetch-state.toml");
    fs::write(
        &config_path,
        "[http]\nbase_url = \"http://localhost:8080\"\n",
    )
    .expect("Failed to write config");
    let path = config_path.to_string_lossy().to_string();

    let rendered = show_config(Some(&path)).expect("Show should succeed");

    assert!(rendered.contains("base_url = \"http://localhost:8080\""));
    assert!(rendered.contains("manual = false"));
}
