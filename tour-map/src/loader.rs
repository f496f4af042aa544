//! Process-wide loader for the map engine's external resources.
//!
//! The engine ships as a versioned script/stylesheet pair on a CDN. Views
//! can mount and unmount any number of times, but each resource must be
//! requested at most once. The loader keeps a registry keyed by URL; a
//! second caller arriving while a load is still in flight awaits the same
//! shared future instead of issuing a duplicate request.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, Shared};
use futures_util::FutureExt;
use tokio::sync::Mutex;

use crate::error::Error;

pub const LEAFLET_CSS_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.min.css";
pub const LEAFLET_JS_URL: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/leaflet/1.9.4/leaflet.min.js";
pub const TILE_URL_TEMPLATE: &str =
    "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}{r}.png";
pub const TILE_ATTRIBUTION: &str =
    r#"&copy; <a href="https://carto.com/">CARTO</a> &copy; <a href="https://openstreetmap.org/">OSM</a>"#;

/// The document the resources are attached to.
///
/// Production hosts hand these calls to the page; tests substitute a fake
/// that counts requests.
#[async_trait]
pub trait ResourceHost: Send + Sync + 'static {
    /// Whether a resource with this URL is already attached.
    fn has(&self, url: &str) -> bool;

    /// Attaches a stylesheet link. Stylesheets apply as they stream in and
    /// give no completion signal.
    fn insert_stylesheet(&self, url: &str);

    /// Attaches a script and returns once it has loaded and executed, or
    /// with the failure reason when the network load fails.
    async fn load_script(&self, url: &str) -> Result<(), String>;
}

type SharedLoad = Shared<BoxFuture<'static, Result<(), String>>>;

enum LoadState {
    InFlight(SharedLoad),
    Done,
}

pub struct ResourceLoader<H> {
    host: Arc<H>,
    registry: Mutex<HashMap<String, LoadState>>,
}

impl<H: ResourceHost> ResourceLoader<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            registry: Mutex::new(HashMap::new()),
        }
    }

    /// Attaches a stylesheet unless one with the same URL already exists.
    pub fn ensure_stylesheet(&self, url: &str) {
        if self.host.has(url) {
            return;
        }
        self.host.insert_stylesheet(url);
    }

    /// Loads a script at most once, returning when it is ready.
    ///
    /// Concurrent calls for the same URL share one request. A failed load
    /// is evicted from the registry so a later mount may try again.
    pub async fn ensure_script(&self, url: &str) -> Result<(), Error> {
        let load = {
            let mut registry = self.registry.lock().await;
            match registry.get(url) {
                Some(LoadState::Done) => return Ok(()),
                Some(LoadState::InFlight(load)) => load.clone(),
                None => {
                    if self.host.has(url) {
                        registry.insert(url.to_string(), LoadState::Done);
                        return Ok(());
                    }
                    let host = Arc::clone(&self.host);
                    let target = url.to_string();
                    let load: SharedLoad =
                        async move { host.load_script(&target).await }.boxed().shared();
                    registry.insert(url.to_string(), LoadState::InFlight(load.clone()));
                    load
                }
            }
        };

        let result = load.await;

        let mut registry = self.registry.lock().await;
        match result {
            Ok(()) => {
                registry.insert(url.to_string(), LoadState::Done);
                Ok(())
            }
            Err(reason) => {
                registry.remove(url);
                Err(Error::ResourceLoad {
                    url: url.to_string(),
                    reason,
                })
            }
        }
    }
}
