//! ctw - one command line for Linear and GitHub tickets.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ctw::Provider;
use ctw::commands::{self, CreateOptions};
use ctw_config::{ConfigStore, Environment, SettingsResolver};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "ctw",
    about = "Ticket wrangler - read, create and summarize Linear and GitHub issues",
    version,
    propagate_version = true
)]
struct Cli {
    /// Profile to use instead of the configured default
    #[arg(long, short = 'k', global = true)]
    tracker: Option<String>,

    /// Path to the configuration file (default: ~/.config/ctw/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List open issues assigned to you
    ListIssues,

    /// Show a single issue
    GetIssue {
        /// Issue identifier (ENG-123, owner/repo#42, or 42 with a default repo)
        issue_id: String,
    },

    /// Create a new issue
    CreateIssue {
        /// Issue title
        title: String,

        /// Issue description
        description: Option<String>,

        /// Team ID (Linear) or owner/repo (GitHub)
        #[arg(long, short = 't')]
        team: Option<String>,

        /// Priority from 1 (urgent) to 4 (low)
        #[arg(long, short = 'p', default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=4))]
        priority: u8,
    },

    /// List teams (Linear) or repositories you can push to (GitHub)
    ListTeams,

    /// Render an issue as a markdown context document
    Context {
        /// Issue identifier
        issue_id: String,

        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Print the branch slug for an issue
    Slug {
        /// Issue identifier
        issue_id: String,
    },

    /// Set the default tracker profile
    SetDefault {
        /// Profile name
        profile: String,
    },

    /// Show the resolved configuration with credentials masked
    ConfigShow,
}

/// `-v` forces debug; otherwise `RUST_LOG` applies, defaulting to warn.
fn log_filter(verbose: bool, rust_log: Option<&str>) -> EnvFilter {
    let directives = if verbose {
        "debug"
    } else {
        rust_log.unwrap_or_default()
    };
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, rust_log.as_deref()))
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let env = Environment::capture();
    let store = match cli.config {
        Some(path) => ConfigStore::new(path),
        None => ConfigStore::from_env(&env)?,
    };

    let mut stdout = io::stdout().lock();
    let result = run(cli.command, cli.tracker.as_deref(), &store, &env, &mut stdout).await;
    stdout.flush()?;
    result
}

async fn run(
    command: Commands,
    tracker: Option<&str>,
    store: &ConfigStore,
    env: &Environment,
    out: &mut impl Write,
) -> Result<()> {
    if let Commands::SetDefault { profile } = &command {
        return commands::set_default(store, profile, out);
    }

    let settings = SettingsResolver::new(store, env).resolve(tracker)?;
    tracing::debug!(
        profile = settings.profile_label(),
        provider = %settings.provider,
        "resolved settings"
    );
    if let Commands::ConfigShow = command {
        return commands::config_show(&settings, out);
    }

    let provider = Provider::from_settings(&settings)?;
    match command {
        Commands::ListIssues => commands::list_issues(&provider, out).await,
        Commands::GetIssue { issue_id } => commands::get_issue(&provider, &issue_id, out).await,
        Commands::CreateIssue {
            title,
            description,
            team,
            priority,
        } => {
            let options = CreateOptions {
                title,
                description,
                team,
                priority: Some(priority),
            };
            commands::create_issue(&provider, &settings, options, out, &mut io::stderr()).await
        }
        Commands::ListTeams => commands::list_teams(&provider, out).await,
        Commands::Context { issue_id, output } => {
            commands::context(&provider, &issue_id, output.as_deref(), out).await
        }
        Commands::Slug { issue_id } => commands::slug(&provider, &issue_id, out).await,
        Commands::SetDefault { .. } | Commands::ConfigShow => Ok(()),
    }
}
