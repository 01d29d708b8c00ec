//! Mock content provider and reporter for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use civiquiz_core::error::{LoadError, SubmissionError};
use civiquiz_core::model::{CategorySummary, Deck};
use civiquiz_core::report::{ServerAck, SessionSummary};
use civiquiz_core::traits::{ContentProvider, ResultReporter};

/// Serves in-memory decks without any network traffic.
pub struct MockContentProvider {
    /// Decks keyed by category name.
    decks: HashMap<String, Deck>,
    /// Returned by every call when set.
    failure: Option<LoadError>,
    call_count: AtomicU32,
    last_category: Mutex<Option<String>>,
}

impl MockContentProvider {
    pub fn new(decks: impl IntoIterator<Item = Deck>) -> Self {
        Self {
            decks: decks
                .into_iter()
                .map(|d| (d.category.name.clone(), d))
                .collect(),
            failure: None,
            call_count: AtomicU32::new(0),
            last_category: Mutex::new(None),
        }
    }

    /// Create a mock whose every call fails with `error`.
    pub fn failing(error: LoadError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(Vec::new())
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last category requested from this provider.
    pub fn last_category(&self) -> Option<String> {
        self.last_category
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ContentProvider for MockContentProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn categories(&self) -> Result<Vec<CategorySummary>, LoadError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        let mut categories: Vec<CategorySummary> = self
            .decks
            .values()
            .map(|d| CategorySummary {
                id: d.category.id,
                name: d.category.name.clone(),
                description: None,
                question_count: d.len(),
            })
            .collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn deck(&self, category: &str) -> Result<Deck, LoadError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_category.lock().unwrap_or_else(|e| e.into_inner()) = Some(category.to_string());
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        self.decks
            .get(category)
            .cloned()
            .ok_or_else(|| LoadError::UnknownCategory(category.to_string()))
    }
}

/// Records submissions and answers with a fixed result.
pub struct MockReporter {
    response: Result<ServerAck, SubmissionError>,
    call_count: AtomicU32,
    last_summary: Mutex<Option<SessionSummary>>,
}

impl MockReporter {
    /// Accept every submission.
    pub fn accepting() -> Self {
        Self::with_response(Ok(ServerAck {
            quiz_id: None,
            score: 0,
            total_questions: 0,
            percentage: 0.0,
        }))
    }

    pub fn with_response(response: Result<ServerAck, SubmissionError>) -> Self {
        Self {
            response,
            call_count: AtomicU32::new(0),
            last_summary: Mutex::new(None),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_summary(&self) -> Option<SessionSummary> {
        self.last_summary
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ResultReporter for MockReporter {
    async fn submit(&self, summary: &SessionSummary) -> Result<ServerAck, SubmissionError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_summary.lock().unwrap_or_else(|e| e.into_inner()) = Some(summary.clone());

        // Same fail-fast rule as the real endpoint.
        summary.to_payload()?;

        let mut ack = self.response.clone()?;
        if ack.total_questions == 0 {
            ack.total_questions = summary.answers.len() as u32;
        }
        Ok(ack)
    }
}
