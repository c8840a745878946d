//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use serial_test::serial;
use vignette::config::AppConfig;

/// A fresh config directory under the system temp dir
fn temp_config_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vignette_config_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("VIG_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("VIG_WINDOW__TITLE");
    assert_eq!(config.window.title, "Test From Env");
}

#[test]
#[serial]
fn test_shipped_defaults_match_code_defaults() {
    let config = AppConfig::load().unwrap();
    let defaults = AppConfig::default();
    assert_eq!(config.window.width, defaults.window.width);
    assert_eq!(config.timing.transition_duration, defaults.timing.transition_duration);
    assert_eq!(config.loading.tick_interval, defaults.loading.tick_interval);
    assert_eq!(config.story.path, defaults.story.path);
}

#[test]
#[serial]
fn test_user_file_overrides_single_key() {
    let dir = temp_config_dir("user");
    fs::write(dir.join("user.toml"), "[timing]\ntransition_duration = 1.25\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.timing.transition_duration, 1.25);
    // untouched keys in the same section keep their defaults
    assert_eq!(config.timing.text_reveal_delay, 0.5);
    assert_eq!(config.window.title, "for you");

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_env_seed_reaches_sequencer_settings() {
    let dir = temp_config_dir("seed");
    std::env::set_var("VIG_DEBUG__SEED", "42");
    let config = AppConfig::load_from(&dir);
    std::env::remove_var("VIG_DEBUG__SEED");

    let config = config.unwrap();
    assert_eq!(config.debug.seed, Some(42));
    assert_eq!(config.sequencer_settings().seed, Some(42));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
#[serial]
fn test_malformed_user_file_is_an_error() {
    let dir = temp_config_dir("bad");
    fs::write(dir.join("user.toml"), "[window]\nwidth = \"wide\"\n").unwrap();

    let result = AppConfig::load_from(&dir);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().starts_with("Configuration error"));

    fs::remove_dir_all(&dir).unwrap();
}
