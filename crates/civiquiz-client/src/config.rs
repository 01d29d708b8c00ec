//! Client configuration and factories.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use civiquiz_core::library::DeckLibrary;
use civiquiz_core::session::{InputMode, SessionConfig};
use civiquiz_core::traits::ContentProvider;

use crate::api::{ApiClient, DEFAULT_TIMEOUT_SECS};
use crate::chat::ChatClient;
use crate::remote::{RemoteContentProvider, RemoteReporter};

/// Defaults applied to every new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDefaults {
    #[serde(default)]
    pub shuffle_questions: bool,
    #[serde(default = "default_true")]
    pub shuffle_options: bool,
    /// Per-question time limit; unset means untimed.
    #[serde(default)]
    pub time_limit_secs: Option<u64>,
    /// Type answers instead of picking an option.
    #[serde(default)]
    pub free_text: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SessionDefaults {
    fn default() -> Self {
        Self {
            shuffle_questions: false,
            shuffle_options: true,
            time_limit_secs: None,
            free_text: false,
        }
    }
}

impl SessionDefaults {
    pub fn to_session_config(&self) -> SessionConfig {
        SessionConfig {
            shuffle_questions: self.shuffle_questions,
            shuffle_options: self.shuffle_options,
            input: if self.free_text {
                InputMode::FreeText
            } else {
                InputMode::MultipleChoice
            },
            time_limit: self
                .time_limit_secs
                .filter(|s| *s > 0)
                .map(Duration::from_secs),
        }
    }
}

/// Top-level civiquiz configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiviquizConfig {
    /// Base URL of the quiz backend.
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    /// Base URL of the chat assistant.
    #[serde(default = "default_chat_url")]
    pub chat_base_url: String,
    /// Name reported with submitted results.
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Directory of offline deck files. When set, it is played instead of
    /// the quiz backend unless a deck path is given explicitly.
    #[serde(default)]
    pub decks_dir: Option<PathBuf>,
    #[serde(default)]
    pub session: SessionDefaults,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000/api/quize".to_string()
}
fn default_chat_url() -> String {
    "http://localhost:8000/api".to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CiviquizConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            chat_base_url: default_chat_url(),
            user_name: None,
            request_timeout_secs: default_timeout(),
            decks_dir: None,
            session: SessionDefaults::default(),
        }
    }
}

impl CiviquizConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn api_client(&self) -> Result<ApiClient> {
        ApiClient::new(&self.api_base_url, self.timeout()).context("failed to create API client")
    }

    pub fn chat_client(&self) -> Result<ChatClient> {
        let api = ApiClient::new(&self.chat_base_url, self.timeout())
            .context("failed to create chat client")?;
        Ok(ChatClient::new(api))
    }

    pub fn reporter(&self) -> Result<RemoteReporter> {
        Ok(RemoteReporter::new(self.api_client()?))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `civiquiz.toml` in the current directory
/// 2. `~/.config/civiquiz/config.toml`
///
/// Environment variable overrides: `CIVIQUIZ_API_URL`, `CIVIQUIZ_CHAT_URL`,
/// `CIVIQUIZ_USER`.
pub fn load_config() -> Result<CiviquizConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<CiviquizConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("civiquiz.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            toml::from_str::<CiviquizConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => CiviquizConfig::default(),
    };

    // Apply env var overrides
    if let Ok(url) = std::env::var("CIVIQUIZ_API_URL") {
        config.api_base_url = url;
    }
    if let Ok(url) = std::env::var("CIVIQUIZ_CHAT_URL") {
        config.chat_base_url = url;
    }
    if let Ok(user) = std::env::var("CIVIQUIZ_USER") {
        config.user_name = Some(user);
    }

    config.api_base_url = resolve_env_vars(&config.api_base_url);
    config.chat_base_url = resolve_env_vars(&config.chat_base_url);
    config.user_name = config.user_name.as_deref().map(resolve_env_vars);

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("civiquiz"))
}

/// Create a content provider.
///
/// Precedence: an explicit `decks` path, then the configured `decks_dir`,
/// then the quiz backend.
pub fn create_content_provider(
    config: &CiviquizConfig,
    decks: Option<&Path>,
) -> Result<Box<dyn ContentProvider>> {
    match decks.or(config.decks_dir.as_deref()) {
        Some(path) => {
            tracing::debug!(path = %path.display(), "playing local decks");
            Ok(Box::new(DeckLibrary::open(path)?))
        }
        None => Ok(Box::new(RemoteContentProvider::new(config.api_client()?))),
    }
}
