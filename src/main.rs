//! Wikode suggestion CLI
//!
//! Computes the article suggestions for one user against the Wikode database
//! and prints them as JSON on stdout. Logs go to stderr.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wikode::{Config, Database, PgSuggestionStore, Result, SuggestionEngine};

#[derive(Debug, Parser)]
#[command(name = "wikode-suggest", version, about = "Suggest articles to a Wikode user")]
struct Cli {
    /// User to compute suggestions for
    #[arg(long, env = "SUGGEST_USER_ID")]
    user_id: i64,

    /// Override SUGGESTION_LIMIT
    #[arg(long)]
    limit: Option<usize>,

    /// Override SUGGESTION_RANDOM_SEED
    #[arg(long)]
    seed: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!(code = e.error_code(), "Suggestion run failed: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::from_env_unchecked()?;
    if let Some(limit) = cli.limit {
        config.suggestion.limit = limit;
    }
    if cli.seed.is_some() {
        config.suggestion.random_seed = cli.seed;
    }
    let config = config.validated()?;

    let db = Database::new(&config.database).await?;
    let store = Arc::new(PgSuggestionStore::new(db.pool().clone()));

    let result = suggest(store, cli.user_id, &config, cli.pretty).await;
    db.close().await;
    result
}

async fn suggest(
    store: Arc<PgSuggestionStore>,
    user_id: i64,
    config: &Config,
    pretty: bool,
) -> Result<()> {
    let engine =
        SuggestionEngine::new(store.clone(), store.as_ref(), user_id, config.suggestion.clone())
            .await?;
    let suggestions = engine.suggestion_list().await?;
    info!("Computed {} suggestions for user {}", suggestions.len(), user_id);

    let json = if pretty {
        serde_json::to_string_pretty(&suggestions)?
    } else {
        serde_json::to_string(&suggestions)?
    };
    println!("{}", json);

    Ok(())
}

/// Initialize structured logging with tracing
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("wikode=info,wikode_suggest=info,sqlx=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .init();
}
