//! Tests for layered configuration loading.

use anidirector_rate_limit::{AniDirectorConfig, StorageSettings, Tier};
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_load_bundled_defaults() {
    let config = {
        let (_dir, path) = write_override("");
        AniDirectorConfig::from_file(&path).unwrap()
    };

    let free = config.tier("gemini", None).unwrap();
    assert_eq!(free.name(), "Free");
    assert_eq!(free.rpm(), Some(10));
    assert_eq!(free.rpd(), Some(250));
    assert_eq!(free.max_concurrent(), Some(1));

    assert_eq!(config.generation.inter_call_delay().as_millis(), 1000);
    assert_eq!(*config.generation.max_reference_images(), 3);
    assert_eq!(*config.generation.max_transient_retries(), 1);
}

#[test]
fn test_file_overrides_single_values() {
    let (_dir, path) = write_override(
        r#"
[generation]
inter_call_delay_ms = 250

[storage]
data_dir = "/srv/anidirector"
"#,
    );
    let config = AniDirectorConfig::from_file(&path).unwrap();

    assert_eq!(config.generation.inter_call_delay().as_millis(), 250);
    // Untouched keys keep their bundled values
    assert_eq!(config.generation.transient_retry_delay().as_millis(), 2000);
    assert_eq!(
        config.storage.resolve_data_dir().unwrap(),
        PathBuf::from("/srv/anidirector")
    );
}

#[test]
fn test_named_tier_lookup() {
    let config = {
        let (_dir, path) = write_override("");
        AniDirectorConfig::from_file(&path).unwrap()
    };

    let paid = config.tier("gemini", Some("tier1")).unwrap();
    assert_eq!(paid.rpm(), Some(300));
    assert!(config.tier("gemini", Some("enterprise")).is_none());
    assert!(config.tier("unknown", None).is_none());
}

#[test]
fn test_malformed_file_is_config_error() {
    let (_dir, path) = write_override("[generation\ninter_call_delay_ms = ");
    let err = AniDirectorConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Configuration Error"));
}

#[test]
fn test_default_data_dir_is_namespaced() {
    let settings = StorageSettings::default();
    if let Ok(dir) = settings.resolve_data_dir() {
        assert!(dir.ends_with("anidirector"));
    }
}

fn write_override(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("anidirector.toml");
    std::fs::write(&path, contents).unwrap();
    (dir, path)
}
