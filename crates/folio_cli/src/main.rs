//! Folio CLI - renders a portfolio from a profile-data service in the terminal.

mod commands;
mod config;
mod progress;
mod render;
mod shutdown;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use console::Term;
use folio::Subject;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::config::ServiceOverrides;
use crate::render::OutputFormat;

#[derive(Parser)]
#[command(name = "folio")]
#[command(version)]
#[command(about = "Render a developer portfolio from a profile-data service")]
#[command(
    long_about = "Folio fetches a user's profile and pinned repositories from a profile-data \
service, both at once, and renders them as a portfolio page in the terminal. A failure of \
either request shows an error banner over placeholder values."
)]
#[command(after_long_help = r#"EXAMPLES
    Render the configured portfolio once:
        $ folio show

    Render someone else's portfolio from a deployed service:
        $ folio show octocat --base-url https://portfolio-api.example.com

    Keep the page fresh, refreshing every 30 seconds:
        $ folio watch --every 30

    Emit the display model as JSON:
        $ folio show -o json

CONFIGURATION
    Folio reads configuration from:
      1. ~/.config/folio/config.toml (or $XDG_CONFIG_HOME/folio/config.toml)
      2. ./folio.toml
      3. Environment variables (FOLIO_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    FOLIO_SERVICE__BASE_URL       Profile-data service location (default: http://localhost:8000)
    FOLIO_SERVICE__SUBJECT        Username to render
    FOLIO_SERVICE__REPO_LIMIT     Repositories to request (default: 6)
    FOLIO_SERVICE__TIMEOUT_SECS   Request timeout (default: none)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Service options shared by the fetching commands.
#[derive(Debug, Clone, clap::Args)]
struct ServiceOptions {
    /// Profile-data service base URL (default from config or http://localhost:8000)
    #[arg(short = 'b', long)]
    base_url: Option<String>,

    /// Number of repositories to request (default from config or 6)
    #[arg(short = 'l', long)]
    limit: Option<usize>,

    /// Request timeout in seconds (default from config, otherwise none)
    #[arg(short = 't', long)]
    timeout: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

impl ServiceOptions {
    fn overrides(&self) -> ServiceOverrides {
        ServiceOverrides {
            base_url: self.base_url.clone(),
            repo_limit: self.limit,
            timeout_secs: self.timeout,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the portfolio once and render it
    Show {
        /// Username to render (default from config)
        subject: Option<String>,

        #[command(flatten)]
        service: ServiceOptions,
    },
    /// Fetch the portfolio periodically and re-render each result
    Watch {
        /// Username to render (default from config)
        subject: Option<String>,

        /// Seconds between refreshes
        #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
        every: u64,

        #[command(flatten)]
        service: ServiceOptions,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
    /// Generate man page(s)
    Man {
        /// Output directory for man pages (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Structured logging only when not attached to a TTY
    if !Term::stdout().is_term() {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new("folio=info,folio_cli=info"),
        };

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = config::Config::load();
    let cli = Cli::parse();

    let shutdown = CancellationToken::new();

    match cli.command {
        Commands::Completions { shell } => {
            commands::meta::handle_completions(shell)?;
        }
        Commands::Man { output } => {
            commands::meta::handle_man(output)?;
        }
        Commands::Show { subject, service } => {
            let subject = Subject::new(config.subject(subject.as_deref()))?;
            let orchestrator =
                commands::show::build_orchestrator(&config, &service.overrides(), shutdown.clone())?;
            shutdown::setup_shutdown_handler(shutdown);

            let loaded = commands::show::handle_show(&orchestrator, subject, service.output).await?;
            if !loaded {
                std::process::exit(1);
            }
        }
        Commands::Watch {
            subject,
            every,
            service,
        } => {
            let subject = Subject::new(config.subject(subject.as_deref()))?;
            let orchestrator =
                commands::show::build_orchestrator(&config, &service.overrides(), shutdown.clone())?;
            shutdown::setup_shutdown_handler(shutdown);

            commands::show::handle_watch(
                &orchestrator,
                subject,
                Duration::from_secs(every),
                service.output,
            )
            .await?;
        }
    }

    Ok(())
}
