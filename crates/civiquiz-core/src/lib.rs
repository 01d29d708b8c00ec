//! civiquiz-core: quiz sessions, option shuffling, and scoring.
//!
//! This crate defines the data model, the session state machine, and the
//! traits that content sources and result reporters implement.

pub mod error;
pub mod flashcard;
pub mod library;
pub mod model;
pub mod parser;
pub mod report;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod sorting;
pub mod traits;
