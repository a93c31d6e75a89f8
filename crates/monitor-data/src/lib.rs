//! Content fetching for the site monitor.
//!
//! Defines the [`Fetcher`](fetcher::Fetcher) seam the change detector pulls
//! snapshots through, an HTTP implementation and a scripted in-memory one.

pub mod fetcher;
pub mod http;
pub mod scripted;

pub use monitor_core as core;
