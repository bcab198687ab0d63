//! Commerce Discounts CLI - plan and apply commercetools product discounts.
//!
//! # Usage
//!
//! ```bash
//! # Check a configuration file without touching the API
//! ctd validate discount.yaml
//!
//! # Show what apply would do
//! ctd plan discount.yaml --state discount.state.json
//!
//! # Create or update the discount and record its state
//! ctd apply discount.yaml --state discount.state.json
//!
//! # Adopt an existing discount
//! ctd import 8d6bd6b4-6c51-4bd4-8a7c-8f1c9a3c2b10 --state discount.state.json
//!
//! # Delete the discount and its state file
//! ctd destroy --state discount.state.json
//! ```
//!
//! # Environment Variables
//!
//! - `CTP_PROJECT_KEY`, `CTP_CLIENT_ID`, `CTP_CLIENT_SECRET` - API client credentials
//! - `CTP_SCOPES`, `CTP_API_URL`, `CTP_AUTH_URL`, `CTP_REQUEST_TIMEOUT_SECS` - optional overrides
//! - `CTD_LOG_FORMAT` - set to `json` for structured log output
//! - `SENTRY_DSN`, `SENTRY_ENVIRONMENT` - optional error reporting

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "ctd")]
#[command(author, version, about = "commercetools product discount tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file
    Validate {
        /// YAML configuration file
        config: PathBuf,
    },
    /// Refresh state and show the planned change
    Plan {
        /// YAML configuration file
        config: PathBuf,

        /// JSON state file
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Create or update the discount and write state
    Apply {
        /// YAML configuration file
        config: PathBuf,

        /// JSON state file
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Import an existing discount by ID
    Import {
        /// Product discount ID
        id: String,

        /// JSON state file
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Delete the discount and remove the state file
    Destroy {
        /// JSON state file
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Print the stored state
    Show {
        /// JSON state file
        #[arg(short, long)]
        state: PathBuf,
    },
    /// Print the resource schema
    Schema,
}

fn init_sentry() -> Option<sentry::ClientInitGuard> {
    let dsn = std::env::var("SENTRY_DSN").ok().filter(|v| !v.is_empty())?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: std::env::var("SENTRY_ENVIRONMENT")
                .ok()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "commerce_discounts_provider=info,commerce_discounts_cli=info".into()
    });

    let is_json = std::env::var("CTD_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(|| tracing_subscriber::fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Sentry must be initialized before the tracing subscriber
    let sentry_guard = init_sentry();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Validate { config } => commands::inspect::validate(&config),
        Commands::Plan { config, state } => commands::lifecycle::plan(&config, &state).await,
        Commands::Apply { config, state } => commands::lifecycle::apply(&config, &state).await,
        Commands::Import { id, state } => commands::lifecycle::import(&id, &state).await,
        Commands::Destroy { state } => commands::lifecycle::destroy(&state).await,
        Commands::Show { state } => commands::inspect::show(&state),
        Commands::Schema => {
            commands::inspect::schema();
            Ok(())
        }
    }
}
