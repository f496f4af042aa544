use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use futures_util::StreamExt;
use serde_json::json;

use tour_content::{Address, Entry};
use tour_map::{Geocoder, LatLng};

#[derive(Clone)]
struct StubState {
    hits: Arc<AtomicUsize>,
}

/// Stub lookup service: a couple of known addresses, one that matches
/// nothing and one that breaks.
async fn search(
    State(state): State<StubState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    assert_eq!(params.get("format").map(String::as_str), Some("json"));
    assert_eq!(params.get("limit").map(String::as_str), Some("1"));

    match params.get("q").map(String::as_str).unwrap_or_default() {
        "600 Peachtree St NE" => {
            Json(json!([{ "lat": "33.771", "lon": "-84.385" }])).into_response()
        }
        "660 Peachtree St NE" => {
            Json(json!([{ "lat": "33.772", "lon": "-84.384" }])).into_response()
        }
        "1 Nowhere Ln" => Json(json!([])).into_response(),
        _ => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

async fn start_stub() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/search", get(search))
        .with_state(StubState {
            hits: Arc::clone(&hits),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/search"), hits)
}

fn text_entry(id: i64, address: &str) -> Entry {
    Entry {
        id,
        name: format!("Site {id}"),
        blurb: None,
        description: None,
        address: Some(Address::Text(address.to_string())),
    }
}

fn inline_entry(id: i64, lat: f64, lng: f64) -> Entry {
    Entry {
        id,
        name: format!("Site {id}"),
        blurb: None,
        description: None,
        address: Some(Address::Structured(json!({ "lat": lat, "lng": lng }))),
    }
}

#[tokio::test]
async fn resolves_in_entry_order_skipping_failures() {
    let (endpoint, _hits) = start_stub().await;
    let geocoder = Geocoder::new()
        .unwrap()
        .with_endpoint(endpoint)
        .with_delay(Duration::ZERO);

    let entries = vec![
        inline_entry(1, 33.756, -84.376),
        text_entry(2, "1 Nowhere Ln"),   // no match
        text_entry(3, "1 Broken Rd"),    // server error
        text_entry(4, "600 Peachtree St NE"),
        Entry {
            id: 5,
            name: "Site 5".to_string(),
            blurb: None,
            description: None,
            address: None, // no address at all
        },
        text_entry(6, "660 Peachtree St NE"),
    ];

    let stops: Vec<_> = geocoder.resolve(&entries).collect().await;

    assert_eq!(stops.len(), 3);
    assert_eq!(stops[0].entry_id, 1);
    assert_eq!(stops[0].source_index, 0);
    assert_eq!(stops[0].position, LatLng::new(33.756, -84.376));
    assert_eq!(stops[1].entry_id, 4);
    assert_eq!(stops[1].source_index, 3);
    assert_eq!(stops[1].position, LatLng::new(33.771, -84.385));
    assert_eq!(stops[2].entry_id, 6);
    assert_eq!(stops[2].source_index, 5);
}

#[tokio::test]
async fn inline_coordinates_issue_no_requests() {
    let (endpoint, hits) = start_stub().await;
    // Default one-second delay: must not matter when nothing hits the wire.
    let geocoder = Geocoder::new().unwrap().with_endpoint(endpoint);

    let entries = vec![inline_entry(1, 33.756, -84.376), inline_entry(2, 33.688, -84.392)];
    let stops: Vec<_> = geocoder.resolve(&entries).collect().await;

    assert_eq!(stops.len(), 2);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn network_lookups_are_rate_limited() {
    let (endpoint, hits) = start_stub().await;
    let delay = Duration::from_millis(150);
    let geocoder = Geocoder::new()
        .unwrap()
        .with_endpoint(endpoint)
        .with_delay(delay);

    let entries = vec![
        text_entry(1, "600 Peachtree St NE"),
        text_entry(2, "660 Peachtree St NE"),
        text_entry(3, "600 Peachtree St NE"),
    ];

    let started = Instant::now();
    let stops: Vec<_> = geocoder.resolve(&entries).collect().await;
    let elapsed = started.elapsed();

    assert_eq!(stops.len(), 3);
    assert_eq!(hits.load(Ordering::SeqCst), 3);
    // One delay between each pair of sequential lookups.
    assert!(
        elapsed >= delay * (entries.len() as u32 - 1),
        "resolved too fast: {elapsed:?}"
    );
}

#[tokio::test]
async fn each_resolve_call_is_independent() {
    let (endpoint, hits) = start_stub().await;
    let geocoder = Geocoder::new()
        .unwrap()
        .with_endpoint(endpoint)
        .with_delay(Duration::ZERO);

    let entries = vec![text_entry(1, "600 Peachtree St NE")];

    let first: Vec<_> = geocoder.resolve(&entries).collect().await;
    let second: Vec<_> = geocoder.resolve(&entries).collect().await;

    assert_eq!(first, second);
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn abandoned_stream_stops_issuing_requests() {
    let (endpoint, hits) = start_stub().await;
    let geocoder = Geocoder::new()
        .unwrap()
        .with_endpoint(endpoint)
        .with_delay(Duration::ZERO);

    let entries = vec![
        text_entry(1, "600 Peachtree St NE"),
        text_entry(2, "660 Peachtree St NE"),
        text_entry(3, "600 Peachtree St NE"),
    ];

    let mut stream = std::pin::pin!(geocoder.resolve(&entries));
    let first = stream.next().await;
    assert!(first.is_some());
    drop(stream);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
