use std::io;
use std::path;

use anyhow::bail;
use anyhow::Result;
use chrono::Local;
use chrono::TimeZone;
use clap::value_parser;
use clap::Arg;
use clap::ArgAction;
use clap::ArgGroup;
use clap::ArgMatches;
use clap::Command;
use clap_complete::generate;
use clap_complete::Generator;
use clap_complete::Shell;
use dialoguer::theme::ColorfulTheme;
use dialoguer::Select;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use yansi::Paint;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Session;
use crate::domain::models::SessionId;
use crate::domain::services::view;
use crate::domain::services::Conversation;
use crate::domain::services::HistoryFile;
use crate::domain::services::SessionStore;
use crate::domain::services::Transcript;
use crate::infrastructure::endpoints::EndpointManager;

fn print_completions<G: Generator>(gen: G, cmd: &mut Command) {
    generate(gen, cmd, cmd.get_name().to_string(), &mut io::stdout());
    std::process::exit(0);
}

/// Opens the session store at the configured history file.
pub async fn open_store() -> SessionStore {
    let history = HistoryFile::new(path::PathBuf::from(Config::get(ConfigKey::HistoryFile)));
    return SessionStore::open(history, &Config::get(ConfigKey::Greeting)).await;
}

fn format_timestamp(timestamp: i64) -> String {
    return Local
        .timestamp_millis_opt(timestamp)
        .single()
        .map(|e| return e.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| return "unknown".to_string());
}

fn format_session(session: &Session) -> String {
    return format!(
        "- (ID: {}) {}, Messages: {}, {}",
        session.id,
        format_timestamp(session.last_updated),
        session.messages.len(),
        session.title
    );
}

fn format_transcript(session: &Session) -> String {
    let mut transcript = Transcript::default();
    view::render_all(&mut transcript, &view::project(&session.messages, false));
    if transcript.is_empty() {
        return Paint::new("(no messages yet)").dimmed().to_string();
    }

    return transcript.as_string();
}

async fn print_sessions_list() -> Result<()> {
    let store = open_store().await;
    let sessions = store
        .list_by_recency()
        .into_iter()
        .map(format_session)
        .collect::<Vec<String>>();

    if sessions.is_empty() {
        println!("There are no sessions available. You should start your first one!");
    } else {
        println!("{}", sessions.join("\n"));
    }

    return Ok(());
}

async fn print_session(session_id: &str) -> Result<()> {
    let store = open_store().await;
    let id = SessionId::new(session_id);
    let session = match store.get(&id) {
        Some(session) => session,
        None => bail!(format!("No session found for id {session_id}")),
    };

    println!("{}\n\n{}", Paint::new(&session.title).bold(), format_transcript(session));

    return Ok(());
}

async fn ask(text: &str, session_id: Option<&String>, new_session: bool) -> Result<()> {
    let endpoint = EndpointManager::get()?;
    let mut store = open_store().await;

    let id = if new_session {
        store.create_session().await
    } else {
        store.resolve(session_id.map(|e| return SessionId::new(e)).as_ref()).await
    };

    let mut conversation = Conversation::default();
    if conversation
        .send(&mut store, &endpoint, &id, text)
        .await?
        .is_none()
    {
        bail!("Nothing to send, the message is empty");
    }

    let reply = store
        .get(&id)
        .and_then(|session| return session.messages.last())
        .map(|message| {
            let mut transcript = Transcript::default();
            view::render_all(&mut transcript, &view::project(&[message.clone()], false));
            return transcript.as_string();
        })
        .unwrap_or_default();

    println!("{reply}");
    println!("\n{}", Paint::new(format!("(session {id})")).dimmed());

    return Ok(());
}

async fn create_config_file() -> Result<()> {
    let config_file_path_str = Config::default(ConfigKey::ConfigFile);
    let config_file_path = path::PathBuf::from(&config_file_path_str);
    if config_file_path.exists() {
        bail!(format!(
            "Config file already exists at {config_file_path_str}"
        ));
    }

    if let Some(parent) = config_file_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(&config_file_path).await?;
    file.write_all(Config::serialize_default(build()).as_bytes())
        .await?;

    println!("Created default config file at {config_file_path_str}");
    return Ok(());
}

async fn load_config_from_session_interactive() -> Result<bool> {
    let store = open_store().await;
    let sessions = store.list_by_recency();

    if sessions.is_empty() {
        println!("There are no sessions available. You should start your first one!");
        return Ok(false);
    }

    let session_options = sessions
        .iter()
        .map(|session| {
            return format_session(session);
        })
        .collect::<Vec<String>>();

    let idx = match Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Which session would you like to open?")
        .default(0)
        .items(&session_options)
        .interact_opt()?
    {
        Some(idx) => idx,
        None => return Ok(false),
    };

    Config::set(ConfigKey::SessionID, sessions[idx].id.as_str());

    return Ok(true);
}

async fn delete_sessions(delete_matches: &ArgMatches) -> Result<()> {
    let mut store = open_store().await;

    if let Some(session_id) = delete_matches.get_one::<String>("session-id") {
        if !store.delete_session(&SessionId::new(session_id)).await {
            bail!(format!("No session found for id {session_id}"));
        }
        store.flush().await?;
        println!("Deleted session {session_id}");
    } else if delete_matches.get_flag("all") {
        let count = store.delete_all().await;
        store.flush().await?;
        println!("Deleted {count} sessions");
    } else {
        subcommand_sessions_delete().print_long_help()?;
    }

    return Ok(());
}

fn subcommand_ask() -> Command {
    return Command::new("ask")
        .about("Send a single message and print the reply without starting the UI.")
        .arg(
            Arg::new("text")
                .help("Message to send.")
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new("session-id")
                .short('i')
                .long("id")
                .help("Session to send the message in. Defaults to the most recent session.")
                .num_args(1),
        )
        .arg(
            Arg::new("new")
                .long("new")
                .help("Start a new session for this message.")
                .action(ArgAction::SetTrue)
                .conflicts_with("session-id"),
        );
}

fn subcommand_completions() -> Command {
    return Command::new("completions")
        .about("Generates shell completions.")
        .arg(
            clap::Arg::new("shell")
                .short('s')
                .long("shell")
                .help("Which shell to generate completions for.")
                .action(ArgAction::Set)
                .value_parser(value_parser!(Shell))
                .required(true),
        );
}

fn subcommand_config() -> Command {
    return Command::new("config")
        .about("Configuration file options.")
        .subcommand(
            Command::new("create").about("Saves the default config file to the configuration file path. This command will fail if the file exists already.")
        )
        .subcommand(
            Command::new("default").about("Outputs the default configuration file to stdout.")
        )
        .subcommand(
            Command::new("path").about("Returns the default path for the configuration file.")
        );
}

fn subcommand_sessions_delete() -> Command {
    return Command::new("delete")
        .about("Delete one or all sessions.")
        .arg(
            clap::Arg::new("session-id")
                .short('i')
                .long("id")
                .help("Session ID")
                .num_args(1),
        )
        .arg(
            clap::Arg::new("all")
                .long("all")
                .help("Delete all sessions.")
                .action(ArgAction::SetTrue),
        )
        .group(
            ArgGroup::new("delete-args")
                .args(["session-id", "all"])
                .required(true),
        );
}

fn subcommand_sessions() -> Command {
    return Command::new("sessions")
        .about("Manage chat sessions.")
        .arg_required_else_help(true)
        .subcommand(Command::new("path").about("Print the chat history file path."))
        .subcommand(Command::new("list").about("List all sessions, most recently updated first."))
        .subcommand(
            Command::new("show")
                .about("Print the transcript of a session.")
                .arg(
                    clap::Arg::new("session-id")
                        .short('i')
                        .long("id")
                        .help("Session ID")
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("open")
                .about("Open a session by ID. Omit passing any session ID to load an interactive selection.")
                .arg(
                    clap::Arg::new(ConfigKey::SessionID.to_string())
                        .short('i')
                        .long("id")
                        .help("Session ID")
                        .required(false),
                ),
        )
        .subcommand(subcommand_sessions_delete());
}

fn arg_config(key: ConfigKey, env: &str, help: String) -> Arg {
    return Arg::new(key.to_string())
        .long(key.to_string())
        .env(env.to_string())
        .num_args(1)
        .help(help)
        .global(true);
}

pub fn build() -> Command {
    let about = format!(
        "{}\n\nVersion: {}",
        env!("CARGO_PKG_DESCRIPTION"),
        env!("CARGO_PKG_VERSION"),
    );

    let hotkeys = [
        "Enter - Send message",
        "CTRL+N - Start a new chat",
        "Tab / Shift+Tab - Next / previous chat",
        "Up / Down - Scroll",
        "CTRL+U / CTRL+D - Page up / down",
        "CTRL+C - Exit",
    ]
    .iter()
    .map(|line| return format!("  - {line}"))
    .collect::<Vec<String>>()
    .join("\n");
    let after_help = format!(
        "{}\n{hotkeys}",
        Paint::new("CHAT HOTKEYS:").underline().bold()
    );

    return Command::new("hookchat")
        .about(about)
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .after_help(after_help)
        .arg_required_else_help(false)
        .subcommand(Command::new("chat").about("Start the chat UI on the most recent session."))
        .subcommand(subcommand_ask())
        .subcommand(subcommand_completions())
        .subcommand(subcommand_config())
        .subcommand(Command::new("manpages").about("Generates manpages and outputs to stdout."))
        .subcommand(subcommand_sessions())
        .arg(
            Arg::new(ConfigKey::ConfigFile.to_string())
                .short('c')
                .long(ConfigKey::ConfigFile.to_string())
                .env("HOOKCHAT_CONFIG_FILE")
                .num_args(1)
                .help(format!("Path to configuration file [default: {}]", Config::default(ConfigKey::ConfigFile)))
                .global(true)
        )
        .arg(
            arg_config(
                ConfigKey::WebhookURL,
                "HOOKCHAT_WEBHOOK_URL",
                "Webhook URL every chat message is posted to.".to_string(),
            )
            .short('u'),
        )
        .arg(arg_config(
            ConfigKey::WebhookToken,
            "HOOKCHAT_WEBHOOK_TOKEN",
            "Bearer token sent with every webhook request.".to_string(),
        ))
        .arg(arg_config(
            ConfigKey::RequestTimeout,
            "HOOKCHAT_REQUEST_TIMEOUT",
            format!(
                "Time to wait in milliseconds for a webhook reply before giving up. [default: {}]",
                Config::default(ConfigKey::RequestTimeout)
            ),
        ))
        .arg(arg_config(
            ConfigKey::HistoryFile,
            "HOOKCHAT_HISTORY_FILE",
            format!(
                "Path to the chat history file. [default: {}]",
                Config::default(ConfigKey::HistoryFile)
            ),
        ))
        .arg(arg_config(
            ConfigKey::Greeting,
            "HOOKCHAT_GREETING",
            format!(
                "Greeting posted at the top of every new chat. Leave empty to disable. [default: {}]",
                Config::default(ConfigKey::Greeting)
            ),
        ))
        .arg(arg_config(
            ConfigKey::Username,
            "HOOKCHAT_USERNAME",
            "Your user name displayed above your chat bubbles.".to_string(),
        ));
}

pub async fn parse() -> Result<bool> {
    let matches = build().get_matches();

    match matches.subcommand() {
        Some(("chat", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
        }
        Some(("ask", subcmd_matches)) => {
            Config::load(build(), vec![&matches, subcmd_matches]).await?;
            let text = match subcmd_matches.get_one::<String>("text") {
                Some(text) => text,
                None => bail!("A message is required"),
            };
            ask(
                text,
                subcmd_matches.get_one::<String>("session-id"),
                subcmd_matches.get_flag("new"),
            )
            .await?;
            return Ok(false);
        }
        Some(("completions", subcmd_matches)) => {
            if let Some(completions) = subcmd_matches.get_one::<Shell>("shell").copied() {
                let mut app = build();
                print_completions(completions, &mut app);
            }
        }
        Some(("config", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("create", _)) => {
                create_config_file().await?;
                return Ok(false);
            }
            Some(("default", _)) => {
                println!("{}", Config::serialize_default(build()));
                return Ok(false);
            }
            Some(("path", _)) => {
                println!("{}", Config::default(ConfigKey::ConfigFile));
                return Ok(false);
            }
            _ => {
                subcommand_config().print_long_help()?;
                return Ok(false);
            }
        },
        Some(("manpages", _)) => {
            clap_mangen::Man::new(build()).render(&mut io::stdout())?;
            return Ok(false);
        }
        Some(("sessions", subcmd_matches)) => match subcmd_matches.subcommand() {
            Some(("path", path_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, path_matches]).await?;
                println!("{}", Config::get(ConfigKey::HistoryFile));
                return Ok(false);
            }
            Some(("list", list_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, list_matches]).await?;
                print_sessions_list().await?;
                return Ok(false);
            }
            Some(("show", show_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, show_matches]).await?;
                if let Some(session_id) = show_matches.get_one::<String>("session-id") {
                    print_session(session_id).await?;
                }
                return Ok(false);
            }
            Some(("open", open_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, open_matches]).await?;
                if let Some(session_id) = open_matches.get_one::<String>("session-id") {
                    Config::set(ConfigKey::SessionID, session_id);
                } else if !load_config_from_session_interactive().await? {
                    return Ok(false);
                }
            }
            Some(("delete", delete_matches)) => {
                Config::load(build(), vec![&matches, subcmd_matches, delete_matches]).await?;
                delete_sessions(delete_matches).await?;
                return Ok(false);
            }
            _ => {
                subcommand_sessions().print_long_help()?;
                return Ok(false);
            }
        },
        _ => {
            Config::load(build(), vec![&matches]).await?;
        }
    }

    return Ok(true);
}
