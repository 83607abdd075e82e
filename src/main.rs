//! tabkeep CLI - browser session snapshot manager.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tabkeep::cli;
use tabkeep::config::load_config;
use tabkeep::logging::init_logging;

#[derive(Parser)]
#[command(name = "tabkeep")]
#[command(author, version, about = "Browser session snapshot manager", long_about = None)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// [Internal] Handle one JSON request from stdin. Called by the extension.
    Message,

    /// [Internal] Run the background service on stdin/stdout.
    Run,

    /// [User] Save the open windows as a session.
    Save {
        /// Display name.
        #[arg(short, long)]
        name: Option<String>,

        /// Category (manual, auto, change). Defaults to manual.
        #[arg(short, long)]
        category: Option<String>,

        /// Only include these window ids.
        #[arg(short, long = "window")]
        windows: Vec<i64>,
    },

    /// [User] List stored sessions.
    List {
        /// Only this category.
        #[arg(short, long)]
        category: Option<String>,

        /// Only sessions whose name contains this text.
        #[arg(short, long)]
        query: Option<String>,
    },

    /// [User] Restore a session.
    Restore {
        /// Session key (e.g. autoSessions_0 or manual_1714557600250).
        key: String,

        /// Restore only this window (0-based).
        #[arg(short, long)]
        window: Option<usize>,
    },

    /// [User] Delete a session.
    Delete {
        /// Session key.
        key: String,
    },

    /// [User] Schedule a restoration.
    Schedule {
        /// When (RFC 3339, or local "YYYY-MM-DD HH:MM").
        #[arg(long)]
        at: String,

        /// Session key to restore.
        #[arg(long)]
        session: Option<String>,

        /// Link to open (repeatable).
        #[arg(long = "url")]
        urls: Vec<String>,
    },

    /// [User] List scheduled restorations.
    Scheduled,

    /// [User] Cancel a scheduled restoration.
    Cancel {
        /// Schedule id.
        id: String,
    },

    /// [User] Manage groups.
    #[command(subcommand)]
    Group(GroupCommand),

    /// [User] Export sessions as JSON.
    Export {
        /// Export only this session.
        #[arg(long)]
        session: Option<String>,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// [User] Import sessions from an export file.
    Import {
        /// Export file.
        file: PathBuf,
    },

    /// [User] Show session statistics.
    Stats,

    /// [User] Show or change settings.
    #[command(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum GroupCommand {
    /// Create a group of sessions or links.
    Create {
        /// Group name.
        name: String,

        /// Session key (repeatable).
        #[arg(long = "session")]
        sessions: Vec<String>,

        /// Link (repeatable).
        #[arg(long = "url")]
        urls: Vec<String>,
    },
    /// List groups.
    List,
    /// Open everything in a group.
    Restore {
        /// Group id.
        id: String,
    },
    /// Delete a group.
    Delete {
        /// Group id.
        id: String,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Show every setting.
    Show,
    /// Change a setting (e.g. `autoBackupInterval 15`).
    Set {
        /// Setting key.
        key: String,
        /// New value.
        value: String,
    },
}

async fn dispatch(command: Commands) -> tabkeep::Result<()> {
    let config = load_config()?;
    let (background, alarms) = cli::open(&config)?;

    match command {
        Commands::Message => cli::message::run(&background).await,
        Commands::Run => cli::service::run(&background, alarms).await,
        Commands::Save {
            name,
            category,
            windows,
        } => cli::save::run(&background, category.as_deref(), name, windows).await,
        Commands::List { category, query } => {
            cli::list::run(&background, category.as_deref(), query.as_deref()).await
        }
        Commands::Restore { key, window } => cli::restore::run(&background, &key, window).await,
        Commands::Delete { key } => cli::restore::delete(&background, &key).await,
        Commands::Schedule { at, session, urls } => {
            cli::schedule::run(&background, &at, session.as_deref(), urls).await
        }
        Commands::Scheduled => cli::schedule::list(&background).await,
        Commands::Cancel { id } => cli::schedule::cancel(&background, &id).await,
        Commands::Group(group) => match group {
            GroupCommand::Create {
                name,
                sessions,
                urls,
            } => cli::group::create(&background, &name, &sessions, urls).await,
            GroupCommand::List => cli::group::list(&background).await,
            GroupCommand::Restore { id } => cli::group::restore(&background, &id).await,
            GroupCommand::Delete { id } => cli::group::delete(&background, &id).await,
        },
        Commands::Export { session, output } => {
            cli::transfer::export(&background, session.as_deref(), output.as_deref()).await
        }
        Commands::Import { file } => cli::transfer::import(&background, &file).await,
        Commands::Stats => cli::stats::run(&background).await,
        Commands::Settings(settings) => match settings {
            SettingsCommand::Show => cli::settings::show(&background).await,
            SettingsCommand::Set { key, value } => {
                cli::settings::set(&background, &key, &value).await
            }
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match dispatch(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tabkeep: error: {e}");
            ExitCode::FAILURE
        }
    }
}
