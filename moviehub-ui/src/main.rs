//! MovieHub terminal client (moviehub-ui) - Main entry point
//!
//! Browses the MovieHub catalog from the command line: listing, search,
//! the detail view with its trailer and reviews, and sign-in.

use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use moviehub_common::config::{ClientConfig, ConfigResolver, LoggingConfig};
use moviehub_common::events::{Generation, Readiness, ViewEvent};
use moviehub_ui::media::{resolve_trailer, RawMediaPayload};
use moviehub_ui::view::{SelectOutcome, ViewPhase};
use moviehub_ui::{render, MovieHub};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Command-line arguments for moviehub-ui
#[derive(Parser, Debug)]
#[command(name = "moviehub-ui")]
#[command(about = "Terminal client for the MovieHub catalog")]
#[command(version)]
struct Args {
    /// Backend base URL (overrides MOVIEHUB_API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Bearer token of a previous sign-in (overrides MOVIEHUB_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Config file (default: ~/.config/moviehub/moviehub-ui.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every movie
    List,

    /// Search by title and/or year
    Search {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Show one movie with its trailer and reviews
    Show { id: i64 },

    /// Normalize a trailer payload (URL, bare video id or relay JSON)
    Trailer { payload: String },

    /// Sign in and print the bearer token
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "MOVIEHUB_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = ConfigResolver::new()
        .with_api_url(args.api_url.clone())
        .with_token(args.token.clone())
        .with_config_path(args.config.clone())
        .resolve();

    init_tracing(&config.logging)?;
    info!(
        "Starting MovieHub client (moviehub-ui) v{}",
        env!("CARGO_PKG_VERSION")
    );

    config.validate().context("Invalid configuration")?;
    info!(api = %config.api_base_url, "Backend configured");

    let hub = MovieHub::new(&config)?;

    match args.command {
        Command::List => {
            let movies = hub.api.list_movies().await?;
            print!("{}", render::movie_list(&movies));
        }
        Command::Search { title, year } => {
            let movies = hub.api.search_movies(title.as_deref(), year).await?;
            print!("{}", render::movie_list(&movies));
        }
        Command::Show { id } => show_movie(&hub, &config, id).await?,
        Command::Trailer { payload } => {
            let trailer = resolve_trailer(&RawMediaPayload::from_cli_arg(&payload));
            match trailer.reference.player_src() {
                Some(src) => println!("Embed: {src}"),
                None => println!("No embeddable trailer"),
            }
            if let Some(link) = trailer.link {
                println!("Link: {link}");
            }
        }
        Command::Login { email, password } => {
            let identity = hub
                .login(&email, &password)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            let me = &identity.profile;
            println!("Signed in as {} (id:{}, role: {})", me.username, me.id, me.role);
            println!("Token: {}", identity.token);
        }
    }

    Ok(())
}

async fn show_movie(hub: &MovieHub, config: &ClientConfig, id: i64) -> Result<()> {
    if let Some(me) = hub.restore(config.token.as_deref()).await {
        info!(username = %me.username, "Session restored");
    }

    let mut events = hub.coordinator.subscribe();
    let outcome = hub
        .coordinator
        .select(id)
        .await
        .map_err(|e| anyhow::anyhow!(e.user_message()))?;
    if outcome == SelectOutcome::Superseded {
        return Ok(());
    }

    let view = hub.coordinator.snapshot().await;
    print!("{}", render::detail_view(&view));

    let Some(generation) = view.generation() else {
        return Ok(());
    };
    let settled = view.phase == ViewPhase::Ready(Readiness::Settled);
    let reviews_loaded = view.reviews.is_some();
    let wait = wait_for_settle(&mut events, generation, settled, reviews_loaded);
    if tokio::time::timeout(config.request_timeout * 2, wait).await.is_err() {
        warn!(generation, "Gave up waiting for trailer and reviews");
    }

    let view = hub.coordinator.snapshot().await;
    if !settled && view.phase == ViewPhase::Ready(Readiness::Settled) {
        println!();
        print!("{}", render::detail_view(&view));
    }
    println!();
    match &view.reviews {
        Some(reviews) => print!("{}", render::review_list(reviews, &hub.labels).await),
        None => println!("Reviews unavailable."),
    }
    Ok(())
}

/// Wait until both the trailer and the reviews of `generation` are in
async fn wait_for_settle(
    events: &mut broadcast::Receiver<ViewEvent>,
    generation: Generation,
    mut settled: bool,
    mut reviews_loaded: bool,
) {
    while !(settled && reviews_loaded) {
        match events.recv().await {
            Ok(event) if event.generation() == generation => match event {
                ViewEvent::MovieRendered {
                    readiness: Readiness::Settled,
                    ..
                } => settled = true,
                ViewEvent::ReviewsLoaded { .. } => reviews_loaded = true,
                _ => {}
            },
            Ok(_) => {}
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "View events lagged");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
