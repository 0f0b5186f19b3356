use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rank_lookup::api::state::AppState;
use rank_lookup::config::AppConfig;
use rank_lookup::lookup::{LookupOutcome, LookupRequest, LookupService};
use rank_lookup::models::RiotId;
use rank_lookup::upstream::RiotClient;

#[derive(Parser)]
#[command(name = "rank-lookup")]
#[command(about = "Look up a player's competitive rank through the game-statistics API")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Bind address (default from config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (default from config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Look up a single player and print the result
    Lookup {
        /// Player as "name#tag"
        riot_id: String,

        /// Rank region (default from config)
        #[arg(long)]
        region: Option<String>,
    },
}

fn init_tracing(level: &str, json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_service(config: &AppConfig) -> Result<LookupService> {
    let identity_key = config.upstream.identity_key()?;
    let rank_key = config.upstream.rank_key()?;
    let client = RiotClient::new(&config.upstream, identity_key, rank_key)?;
    let service = LookupService::new(Arc::new(client), &config.upstream)?;
    Ok(service)
}

fn print_outcome(outcome: &LookupOutcome) {
    match outcome {
        LookupOutcome::Ranked {
            player,
            region,
            rank,
        } => {
            println!("\n=== {} ({}) ===", player, region);
            println!("Tier:     {}", rank.tier);
            println!("Rating:   {}", rank.rating_points);
            println!("Wins:     {}", rank.wins);
            println!("Losses:   {}", rank.losses);
            if let Some(rate) = rank.win_rate() {
                println!("Win rate: {:.1}%", rate);
            }
            if let Some(icon) = &rank.icon_url {
                println!("Icon:     {}", icon);
            }
        }
        LookupOutcome::Unranked { player, region } => {
            println!("{} has no competitive rank in {}", player, region);
        }
        LookupOutcome::NotFound { player } => {
            println!("Player {} was not found", player);
        }
        LookupOutcome::Failed(e) => {
            eprintln!("Lookup failed: {}", e.user_message());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing .env is fine; the key may come from the real environment
    dotenvy::dotenv().ok();

    let (config, source) = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;

    let level = cli.log_level.as_deref().unwrap_or(&config.log_level);
    init_tracing(level, cli.json_logs);

    tracing::info!("Starting rank-lookup v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Using {}", source);

    match cli.command {
        Commands::Serve { host, port } => {
            let service = build_service(&config)?;
            let state = AppState {
                lookup: Arc::new(service),
                verification_file: config.verification.file.clone().map(Arc::new),
            };
            let app = rank_lookup::api::build_router(state);

            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("binding {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Lookup { riot_id, region } => {
            let id: RiotId = riot_id.parse()?;
            let service = build_service(&config)?;

            let mut request = LookupRequest::new(id.game_name, id.tag_line);
            if let Some(region) = region {
                request = request.with_region(region);
            }

            let outcome = service.lookup(&request).await;
            print_outcome(&outcome);
            if matches!(outcome, LookupOutcome::Failed(_)) {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
