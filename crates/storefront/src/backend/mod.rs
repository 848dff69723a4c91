//! Hosted backend client.
//!
//! One HTTP client implements all three backend-facing ports (documents,
//! auth, object storage) against the hosted service's REST surface, plus
//! the exchange-rate fetcher. Uses `reqwest` for HTTP and `moka` for a
//! short-lived document read cache.

mod client;
mod rates;

pub use client::BackendClient;
pub use rates::HttpRateSource;
