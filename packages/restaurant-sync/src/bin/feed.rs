//! Run the restaurant reconciler against a LettuceEat server and print every
//! snapshot it publishes.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use restaurant_sync::{
    FileStore, HttpListingSource, HttpStreamSource, KeyValueStore, MemoryStore, Reconciler,
    ReconcilerConfig, RestaurantCache, SystemClock,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "feed", about = "Reconcile a restaurant search and print the feed")]
struct Args {
    /// Search query, e.g. "sushi"
    query: String,

    /// LettuceEat server base URL
    #[arg(long, env = "LETTUCEEAT_SERVER_URL", default_value = "http://localhost:3000")]
    server: String,

    /// City used in listing and extraction prompts
    #[arg(long, default_value = "Ottawa")]
    location: String,

    /// JSON cache file; in-memory when omitted
    #[arg(long)]
    cache_file: Option<PathBuf>,

    /// Fresh window in seconds
    #[arg(long, default_value_t = 300)]
    fresh_secs: u64,

    /// Cache expiry in seconds
    #[arg(long, default_value_t = 3600)]
    expiry_secs: u64,

    /// Seconds to wait for a first record before showing samples
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Print full snapshots as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn,restaurant_sync=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let store: Arc<dyn KeyValueStore> = match &args.cache_file {
        Some(path) => Arc::new(
            FileStore::open(path)
                .with_context(|| format!("Failed to open cache file {}", path.display()))?,
        ),
        None => Arc::new(MemoryStore::new()),
    };
    let cache = RestaurantCache::new(store, Arc::new(SystemClock))
        .with_expiry(Duration::from_secs(args.expiry_secs));

    let reconciler = Reconciler::new(
        cache,
        Arc::new(HttpListingSource::new(&args.server).with_location(&args.location)),
        Arc::new(HttpStreamSource::new(&args.server).with_location(&args.location)),
        ReconcilerConfig {
            fresh_window: Duration::from_secs(args.fresh_secs),
            no_data_timeout: Duration::from_secs(args.timeout_secs),
            ..Default::default()
        },
    );

    let mut feed = reconciler.subscribe();
    let handle = reconciler.reconcile(&args.query);

    while feed.changed().await.is_ok() {
        let snapshot = feed.borrow_and_update().clone();
        if args.json {
            println!(
                "{}",
                serde_json::to_string(&snapshot).context("Failed to serialize snapshot")?
            );
        } else {
            println!(
                "[{:?}] {} restaurant(s){}",
                snapshot.state,
                snapshot.restaurants.len(),
                if snapshot.showing_sample_data {
                    " (showing sample data)"
                } else {
                    ""
                }
            );
            if snapshot.is_settled() {
                for r in &snapshot.restaurants {
                    println!(
                        "  {:<30} {:<4} {:.1}  {:<12} {}",
                        r.name,
                        r.price_range.as_str(),
                        r.rating,
                        r.category,
                        r.address
                    );
                }
            }
        }
        if snapshot.is_settled() {
            break;
        }
    }

    handle.finished().await;
    Ok(())
}
