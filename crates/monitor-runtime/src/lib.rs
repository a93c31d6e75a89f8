//! Runtime layer for the site monitor.
//!
//! Wires the fetcher, content store and notification bus into a change
//! detector, runs polling rounds over every subscription and drives those
//! rounds on a timer.

pub mod detector;
pub mod listener;
pub mod monitor;
pub mod orchestrator;

pub use monitor_core as core;
pub use monitor_data as data;
