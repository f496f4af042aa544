use futures_util::StreamExt;
use tracing::info;

use tour_content::ContentClient;
use tour_map::{Geocoder, MapSession, Stop, TracingEngine, DEFAULT_CENTER};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let base_url = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TOUR_BACKEND_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8000".to_string());

    let content = ContentClient::new(&base_url);
    let entries = content.all_entries().await?;
    info!(backend = %base_url, count = entries.len(), "fetched tour entries");

    let geocoder = Geocoder::new()?;
    let stops: Vec<Stop> = geocoder.resolve(&entries).collect().await;
    for stop in &stops {
        info!(
            name = %stop.name,
            lat = stop.position.lat,
            lng = stop.position.lng,
            entry_id = stop.entry_id,
            "resolved stop"
        );
    }

    let mut session = MapSession::new(TracingEngine::default());
    let center = stops
        .first()
        .map(|stop| stop.position)
        .unwrap_or(DEFAULT_CENTER);
    session.open(center);
    session.set_markers(&stops);
    session.focus(None, &stops);
    session.close();

    Ok(())
}
