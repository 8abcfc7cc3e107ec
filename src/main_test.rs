use std::env;
use std::fs;

use anyhow::Result;
use serial_test::serial;
use test_utils::temp_dir;

use super::init_logging;

#[test]
#[serial]
fn it_skips_logging_unless_requested() {
    env::set_var("RUST_LOG", "warn");
    env::set_var("HOOKCHAT_LOG_DIR", "/nonexistent/hookchat-logs");

    assert!(init_logging().is_none());

    env::remove_var("RUST_LOG");
    env::remove_var("HOOKCHAT_LOG_DIR");
}

#[test]
#[serial]
fn it_runs_without_logging_when_the_log_file_cannot_be_opened() -> Result<()> {
    let dir = temp_dir();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "a file, not a directory")?;

    env::set_var("RUST_LOG", "hookchat=debug");
    env::set_var("HOOKCHAT_LOG_DIR", blocker.join("logs"));

    let res = init_logging();

    env::remove_var("RUST_LOG");
    env::remove_var("HOOKCHAT_LOG_DIR");
    assert!(res.is_none());

    return Ok(());
}
