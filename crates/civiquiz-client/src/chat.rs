//! Client for the civic-law chat assistant.

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::api::ApiClient;
use crate::error::ChatError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    question: &'a str,
    session_id: Option<&'a str>,
}

/// Answer returned by the assistant.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub question: Option<String>,
    pub answer: String,
    #[serde(default)]
    pub language: Option<String>,
    /// Documents cited for the answer, each with `source` and `content`.
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
    /// Model name (`llm`) and `sources_found` count.
    #[serde(default)]
    pub model_info: Option<serde_json::Value>,
    /// Stored passages similar to the question.
    #[serde(default)]
    pub similar_documents: Vec<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl ChatReply {
    pub fn model(&self) -> Option<&str> {
        self.model_info.as_ref()?.get("llm")?.as_str()
    }

    pub fn sources_found(&self) -> Option<u64> {
        self.model_info.as_ref()?.get("sources_found")?.as_u64()
    }
}

pub struct ChatClient {
    api: ApiClient,
}

impl ChatClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Service status and information, passed through as-is.
    #[instrument(skip(self))]
    pub async fn status(&self) -> Result<serde_json::Value, ChatError> {
        Ok(self.api.get("/chat/").await?)
    }

    #[instrument(skip(self, question))]
    pub async fn send(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<ChatReply, ChatError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ChatError::EmptyQuestion);
        }

        let body = ChatRequest {
            question,
            session_id,
        };
        Ok(self.api.post("/chat/", &body).await?)
    }
}
