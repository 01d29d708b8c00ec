//! Core trait definitions for content sources and result reporters.
//!
//! These async traits are implemented by `civiquiz-client` (remote HTTP
//! endpoints) and by [`crate::library::DeckLibrary`] (static deck files).

use async_trait::async_trait;

use crate::error::{LoadError, SubmissionError};
use crate::model::{CategorySummary, Deck};
use crate::report::{ServerAck, SessionSummary};

// ---------------------------------------------------------------------------
// Content provider trait
// ---------------------------------------------------------------------------

/// Source of categories and decks.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Human-readable provider name (e.g. "remote").
    fn name(&self) -> &str;

    /// List the available categories.
    async fn categories(&self) -> Result<Vec<CategorySummary>, LoadError>;

    /// Fetch the deck for the category with this name.
    async fn deck(&self, category: &str) -> Result<Deck, LoadError>;
}

// ---------------------------------------------------------------------------
// Result reporter trait
// ---------------------------------------------------------------------------

/// Sink for completed session results.
///
/// Implementations make a single attempt: no deduplication, no retry.
#[async_trait]
pub trait ResultReporter: Send + Sync {
    async fn submit(&self, summary: &SessionSummary) -> Result<ServerAck, SubmissionError>;
}
