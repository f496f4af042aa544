//! Client for the tour content backend.
//!
//! The backend stores each historical site as an entry with a free-form
//! `details` JSON blob. `tour-content` fetches entries over the backend's
//! REST API and normalizes the loosely keyed `details` fields into a flat
//! [`Entry`] that the rest of the application can rely on.
//!
//! # Example
//!
//! ```no_run
//! use tour_content::ContentClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ContentClient::new("http://127.0.0.1:8000");
//!
//!     let entries = client.all_entries().await?;
//!     for entry in &entries {
//!         println!("{}: {:?}", entry.name, entry.address);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod model;

pub use client::ContentClient;
pub use error::Error;
pub use model::{Address, Entry};
