use std::fmt::Display;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use relief_client::{
    BackendClient, Config, FeedPhase, FixedPosition, FoodRegionFetcher, GeoPoint, LogNotifier,
    NewsFetcher, ProximityFeed, ResourceFetcher, ShelterFetcher,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relief_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env().context("failed to load configuration")?;

    let api = Arc::new(BackendClient::new(&config).context("failed to build backend client")?);
    let notifier: Arc<LogNotifier> = Arc::new(LogNotifier);

    let position = match (config.fixed_latitude, config.fixed_longitude) {
        (Some(latitude), Some(longitude)) => GeoPoint::new(latitude, longitude),
        _ => anyhow::bail!("set FIXED_LATITUDE and FIXED_LONGITUDE to run the listing CLI"),
    };
    let provider = FixedPosition(position);

    let kind = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "shelters".to_string());
    info!(
        kind = %kind,
        latitude = position.latitude,
        longitude = position.longitude,
        "listing nearby resources"
    );

    match kind.as_str() {
        "shelters" => run_feed(ShelterFetcher::new(api), provider, notifier).await,
        "food" => run_feed(FoodRegionFetcher::new(api), provider, notifier).await,
        "news" => run_feed(NewsFetcher::new(api), provider, notifier).await,
        other => error!("unknown resource kind: {other} (expected shelters|food|news)"),
    }

    Ok(())
}

async fn run_feed<F>(fetcher: F, provider: FixedPosition, notifier: Arc<LogNotifier>)
where
    F: ResourceFetcher,
    F::Item: Display,
{
    let feed = ProximityFeed::new(fetcher, notifier);
    feed.mount(&provider).await;

    let snapshot = feed.snapshot();
    if snapshot.phase != FeedPhase::Loaded {
        // Failures have already produced a notice through the notifier.
        return;
    }

    for entry in &snapshot.items {
        match entry.distance_km {
            Some(distance) => println!("{distance:>8.2} km  {}", entry.item),
            None => println!("       ?  km  {}", entry.item),
        }
    }
    info!(count = snapshot.items.len(), "feed loaded");
}
