//! Core domain types for the site monitor.
//!
//! Holds the data model, the comparison strategies, the content store, the
//! notification bus and the configuration layer. Nothing in this crate
//! performs network I/O.

pub mod auth;
pub mod error;
pub mod models;
pub mod notifications;
pub mod settings;
pub mod store;
pub mod strategy;
pub mod watch_list;

pub use error::{MonitorError, Result};
