use std::fs;

use anyhow::Result;
use serial_test::serial;
use test_utils::temp_dir;

use super::Config;
use super::ConfigKey;
use crate::application::cli;

#[test]
fn it_serializes_to_valid_toml() {
    let res = Config::serialize_default(cli::build());
    let toml_res = res.parse::<toml_edit::Document>();
    assert!(toml_res.is_ok());

    assert!(res.contains("# webhook-url = \"\""));
    assert!(res.contains("request-timeout = 60000"));
    assert!(res.contains("greeting = \"New chat started. How can I assist you?\""));
    assert!(!res.contains("session-id"));
    assert!(!res.contains("config-file"));
}

#[tokio::test]
#[serial]
async fn it_loads_config_from_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "hookchat",
        "chat",
        "-c",
        "./config.example.toml",
    ])?;
    Config::load(cli::build(), vec![&matches]).await?;

    assert_eq!(
        Config::get(ConfigKey::WebhookURL),
        "http://localhost:5678/webhook/chat"
    );
    assert_eq!(Config::get(ConfigKey::RequestTimeout), "30000");

    return Ok(());
}

#[tokio::test]
#[serial]
async fn it_fails_to_loads_config_from_file() -> Result<()> {
    let matches = cli::build().try_get_matches_from(vec![
        "hookchat",
        "chat",
        "-c",
        "./test/bad-config.toml",
    ])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());
    return Ok(());
}

#[tokio::test]
#[serial]
async fn it_fails_on_invalid_toml() -> Result<()> {
    let dir = temp_dir();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "webhook-url = [\"unterminated\"")?;

    let config_path_str = config_path.to_string_lossy().to_string();
    let matches =
        cli::build().try_get_matches_from(vec!["hookchat", "-c", config_path_str.as_str()])?;
    let res = Config::load(cli::build(), vec![&matches]).await;
    assert!(res.is_err());

    return Ok(());
}
