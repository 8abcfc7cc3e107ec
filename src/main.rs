#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::fs;
use std::path;
use std::process;

use anyhow::Error;
use domain::models::Action;
use domain::models::Event;
use domain::models::SessionId;
use infrastructure::endpoints::EndpointManager;
use tokio::sync::mpsc;
use tokio::task;
use tracing_appender::non_blocking::WorkerGuard;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! hookchat has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

/// Debug logging is opt-in through `RUST_LOG`. A log file that cannot be
/// opened disables logging rather than stopping the app.
fn init_logging() -> Option<WorkerGuard> {
    if !env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("hookchat")
    {
        return None;
    }

    let debug_log_dir = env::var("HOOKCHAT_LOG_DIR")
        .map(path::PathBuf::from)
        .unwrap_or_else(|_| {
            return dirs::cache_dir()
                .unwrap_or_else(env::temp_dir)
                .join("hookchat");
        });

    let file = fs::create_dir_all(&debug_log_dir).and_then(|_| {
        return fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(debug_log_dir.join("debug.log"));
    });
    let file = match file {
        Ok(file) => file,
        Err(err) => {
            eprintln!(
                "{}",
                Paint::yellow(format!(
                    "Debug logging disabled, cannot open {}: {err}",
                    debug_log_dir.join("debug.log").to_string_lossy()
                ))
            );
            return None;
        }
    };

    let (writer, guard) = tracing_appender::non_blocking(file);
    tracing_subscriber::fmt()
        .json()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(writer)
        .init();

    return Some(guard);
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let _guard = init_logging();

    match cli::parse().await {
        Ok(true) => {}
        Ok(false) => process::exit(0),
        Err(err) => {
            handle_error(err);
            return;
        }
    }

    let endpoint = match EndpointManager::get() {
        Ok(endpoint) => endpoint,
        Err(err) => {
            handle_error(err);
            return;
        }
    };

    let store = cli::open_store().await;
    let session_id = Config::get(ConfigKey::SessionID);
    let requested = if session_id.is_empty() {
        None
    } else {
        Some(SessionId::new(&session_id))
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let background = task::spawn(async move {
        ActionsService::start(endpoint, event_tx, &mut action_rx).await;
    });

    let res = ui::start(action_tx, event_rx, store, requested).await;
    background.abort();

    if let Err(err) = res {
        ui::destruct_terminal_for_panic();
        handle_error(err);
    }

    process::exit(0);
}
