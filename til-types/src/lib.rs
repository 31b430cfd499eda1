//! Shared types for the TIL backend and its HTTP clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =====================================================
// Domain Types
// =====================================================

/// One TIL note.
///
/// `path` is relative to the content root (`"rust/my-cool-fact.md"`) and
/// identifies the entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilEntry {
    pub title: String,
    pub category: String,
    /// Markdown body with front-matter stripped
    pub content: String,
    pub path: String,
}

// =====================================================
// Response Types
// =====================================================

/// Body of `GET /api/til/all`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TilListResponse {
    pub entries: Vec<TilEntry>,
    /// Every category in the catalog, not just the filtered ones
    pub categories: Vec<String>,
    pub total: usize,
}

/// Snapshot of the catalog cache state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogInfo {
    pub total: usize,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refreshed_at: Option<DateTime<Utc>>,
    pub ttl_secs: u64,
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}
