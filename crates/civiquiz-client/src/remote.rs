//! Quiz backend: category listing, decks, and result submission.

use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;

use civiquiz_core::error::{LoadError, SubmissionError};
use civiquiz_core::model::{
    CategoryId, CategoryIndex, CategoryRef, CategorySummary, Deck, Difficulty, OptionId,
    Question, QuestionId, QuizOption,
};
use civiquiz_core::report::{ServerAck, SessionSummary};
use civiquiz_core::traits::{ContentProvider, ResultReporter};

use crate::api::ApiClient;

#[derive(Debug, Deserialize)]
struct CategoryDto {
    id: u64,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    question_count: usize,
}

#[derive(Debug, Deserialize)]
struct DeckDto {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    question_text: String,
    options: Vec<OptionDto>,
    correct_answer: String,
    #[serde(default)]
    difficulty_level: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    id: u64,
    option_text: String,
}

impl QuestionDto {
    fn into_question(self) -> Result<Question, LoadError> {
        let wanted = self.correct_answer.trim();
        let correct = self
            .options
            .iter()
            .find(|o| o.option_text.trim() == wanted)
            .map(|o| OptionId(o.id))
            .ok_or_else(|| {
                LoadError::Malformed(format!(
                    "question {}: correct answer '{}' matches no option",
                    self.id, self.correct_answer
                ))
            })?;

        let difficulty = self.difficulty_level.as_deref().and_then(|d| {
            d.parse::<Difficulty>()
                .map_err(|e| tracing::warn!(question = self.id, "{e}"))
                .ok()
        });

        Ok(Question {
            id: QuestionId(self.id),
            prompt: self.question_text,
            options: self
                .options
                .into_iter()
                .map(|o| QuizOption::new(o.id, o.option_text))
                .collect(),
            correct,
            difficulty,
            note: self.explanation.filter(|e| !e.trim().is_empty()),
            image: None,
        })
    }
}

/// Content provider backed by the quiz backend.
///
/// Keeps the last category listing so a deck response without an id can
/// still be tied to a known category.
pub struct RemoteContentProvider {
    api: ApiClient,
    index: Mutex<CategoryIndex>,
}

impl RemoteContentProvider {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            index: Mutex::new(CategoryIndex::new()),
        }
    }

    fn index(&self) -> std::sync::MutexGuard<'_, CategoryIndex> {
        self.index.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn category_for(
        &self,
        requested: &str,
        dto_id: Option<u64>,
        dto_name: Option<String>,
    ) -> CategoryRef {
        let name = dto_name.unwrap_or_else(|| requested.to_string());
        match dto_id {
            Some(id) => CategoryRef::named(name).with_id(CategoryId(id)),
            None => match self.index().resolve(&name) {
                Ok(resolved) => resolved,
                Err(e) => {
                    tracing::warn!(category = %name, "deck has no category id: {e}");
                    CategoryRef::named(name)
                }
            },
        }
    }
}

#[async_trait]
impl ContentProvider for RemoteContentProvider {
    fn name(&self) -> &str {
        "remote"
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<CategorySummary>, LoadError> {
        let dtos: Vec<CategoryDto> = self.api.get("/categories/").await?;
        let categories: Vec<CategorySummary> = dtos
            .into_iter()
            .map(|c| CategorySummary {
                id: Some(CategoryId(c.id)),
                name: c.name,
                description: c.description,
                question_count: c.question_count,
            })
            .collect();

        self.index().refresh(categories.clone());
        Ok(categories)
    }

    #[instrument(skip(self))]
    async fn deck(&self, category: &str) -> Result<Deck, LoadError> {
        let path = format!("/categories/{}/", urlencoding::encode(category));
        let dto: DeckDto = self.api.get(&path).await?;

        let questions = dto
            .questions
            .into_iter()
            .map(QuestionDto::into_question)
            .collect::<Result<Vec<_>, _>>()?;
        let category = self.category_for(category, dto.id, dto.name);

        tracing::debug!(count = questions.len(), "deck loaded");
        Ok(Deck::new(category, questions))
    }
}

/// Posts completed sessions to the scoring endpoint.
pub struct RemoteReporter {
    api: ApiClient,
}

impl RemoteReporter {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ResultReporter for RemoteReporter {
    #[instrument(skip(self, summary), fields(category = %summary.category.name))]
    async fn submit(&self, summary: &SessionSummary) -> Result<ServerAck, SubmissionError> {
        let payload = summary.to_payload()?;
        let ack: ServerAck = self.api.post("/quiz/submit/", &payload).await?;
        tracing::info!(score = ack.score, total = ack.total_questions, "results submitted");
        Ok(ack)
    }
}
