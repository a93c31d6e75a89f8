//! Content comparison strategies.
//!
//! Each strategy is a pure predicate over two content snapshots answering
//! "is this still the same page?". The registry is closed: the set of keys is
//! fixed at compile time and an unknown key is reported as
//! [`MonitorError::UnknownStrategy`].

use crate::error::{MonitorError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// The available ways of deciding whether a resource has changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonStrategy {
    /// Unchanged when both snapshots have the same length in characters.
    ///
    /// Coarse: an edit that keeps the length identical goes unnoticed.
    #[serde(rename = "size")]
    SameSize,
    /// Unchanged when both snapshots are byte-for-byte identical.
    #[serde(rename = "exact")]
    ExactMatch,
    /// Unchanged when the snapshots agree after markup tags are stripped and
    /// surrounding whitespace is trimmed.
    #[serde(rename = "text")]
    TextOnlyMatch,
}

impl FromStr for ComparisonStrategy {
    type Err = MonitorError;

    /// Exact lookup by key.
    ///
    /// Accepts `"size"`, `"exact"` and `"text"` as written. Returns
    /// [`MonitorError::UnknownStrategy`] for anything else, including other
    /// spellings such as `"SIZE"` or `" exact "`.
    fn from_str(value: &str) -> Result<Self> {
        match value {
            "size" => Ok(ComparisonStrategy::SameSize),
            "exact" => Ok(ComparisonStrategy::ExactMatch),
            "text" => Ok(ComparisonStrategy::TextOnlyMatch),
            _ => Err(MonitorError::UnknownStrategy(value.to_string())),
        }
    }
}

impl ComparisonStrategy {
    /// Every registered strategy, in key order.
    pub const ALL: [ComparisonStrategy; 3] = [
        ComparisonStrategy::SameSize,
        ComparisonStrategy::ExactMatch,
        ComparisonStrategy::TextOnlyMatch,
    ];

    /// The canonical key used in preferences and watch-list files.
    pub fn key(&self) -> &'static str {
        match self {
            ComparisonStrategy::SameSize => "size",
            ComparisonStrategy::ExactMatch => "exact",
            ComparisonStrategy::TextOnlyMatch => "text",
        }
    }

    /// Return `true` when `current` counts as the same content as `previous`.
    pub fn is_unchanged(&self, previous: &str, current: &str) -> bool {
        match self {
            ComparisonStrategy::SameSize => previous.chars().count() == current.chars().count(),
            ComparisonStrategy::ExactMatch => previous == current,
            ComparisonStrategy::TextOnlyMatch => strip_markup(previous) == strip_markup(current),
        }
    }
}

impl fmt::Display for ComparisonStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("regex is valid"))
}

/// Remove everything that looks like a `<...>` tag and trim the result.
///
/// This is pattern removal, not parsing. Text such as `a < b > c` loses the
/// bracketed span too. Trimming only drops ASCII control characters and
/// spaces; a trailing `\u{00A0}` is content.
pub fn strip_markup(content: &str) -> String {
    tag_pattern()
        .replace_all(content, "")
        .trim_matches(|c: char| c <= ' ')
        .to_string()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
