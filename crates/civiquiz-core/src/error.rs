//! Error types shared by the session state machine and its collaborators.
//!
//! Load and submission failures are defined here rather than in the HTTP
//! client so the session can store and classify them without string matching.

use thiserror::Error;

/// A deck or category listing could not be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// The content source was unreachable or answered with an error.
    #[error("content unavailable: {0}")]
    Unavailable(String),

    /// The category exists but has no questions.
    #[error("category '{0}' has no questions")]
    EmptyDeck(String),

    /// The content was delivered but could not be turned into a deck.
    #[error("malformed content: {0}")]
    Malformed(String),

    /// The category name could not be matched against a known listing.
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// A result submission failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    /// No category id is known for this session; nothing was sent.
    #[error("cannot submit results: category id is missing, select the category again")]
    MissingCategory,

    /// The scoring endpoint could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// The scoring endpoint answered with a non-success status.
    #[error("submission rejected (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    /// The scoring endpoint answered with an unexpected body.
    #[error("failed to decode submission response: {0}")]
    Decode(String),
}

/// A session transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The session is not presenting a question.
    #[error("session is not ready for input")]
    NotReady,

    /// The current question already has a locked answer.
    #[error("answer already locked for this question")]
    AlreadyAnswered,

    /// `advance` was requested before the current question was answered.
    #[error("current question has not been answered")]
    NotAnswered,

    /// The selected option does not belong to the current question.
    #[error("option does not belong to the current question")]
    UnknownOption,

    /// A timeout was reported but the session has no time limit.
    #[error("session has no time limit")]
    NoTimeLimit,

    /// No deck has been loaded yet.
    #[error("no deck loaded")]
    NoDeck,

    /// Results can only be submitted after the last question.
    #[error("session is not completed")]
    NotCompleted,

    /// A submission is already on its way.
    #[error("submission already in progress")]
    SubmissionInFlight,

    /// The server already accepted this session's results.
    #[error("results already submitted")]
    AlreadySubmitted,
}

impl SessionError {
    /// Returns `true` for refusals that callers should silently drop, such as a
    /// second click on an already locked answer.
    pub fn is_ignorable(&self) -> bool {
        matches!(
            self,
            SessionError::AlreadyAnswered
                | SessionError::SubmissionInFlight
                | SessionError::AlreadySubmitted
        )
    }
}

/// Invalid input to the option randomizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShuffleError {
    #[error("cannot shuffle an empty option list")]
    Empty,

    #[error("correct index {index} out of range for {len} options")]
    IndexOutOfRange { index: usize, len: usize },
}

/// A sorting-board operation was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SortingError {
    #[error("unknown card: {0}")]
    UnknownCard(String),

    #[error("unknown bin: {0}")]
    UnknownBin(String),

    #[error("card already placed: {0}")]
    AlreadyPlaced(String),

    #[error("duplicate card id: {0}")]
    DuplicateCard(String),

    #[error("{remaining} card(s) still need a bin")]
    Incomplete { remaining: usize },
}
