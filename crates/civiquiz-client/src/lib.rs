//! civiquiz-client: HTTP integrations for civiquiz.
//!
//! Wraps the quiz backend (categories, decks, result submission) and the
//! chat assistant behind a small JSON request helper, and implements the
//! core `ContentProvider` and `ResultReporter` traits on top of it.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod mock;
pub mod remote;

pub use api::{join_url, ApiClient, RequestOptions};
pub use config::{create_content_provider, load_config, CiviquizConfig, SessionDefaults};
pub use error::{ChatError, RequestError};
