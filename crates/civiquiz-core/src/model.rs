//! Core data model types for civiquiz.
//!
//! Questions, options, decks and categories. Everything here is immutable once
//! loaded; the session state machine only reads it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LoadError;

/// Identifier of a question, unique within a deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

/// Identity token of an option, stable across shuffles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub u64);

/// Server-side category identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single answer option as displayed to the player.
///
/// Two options may share display text; they are still told apart by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOption {
    pub id: OptionId,
    pub text: String,
}

impl QuizOption {
    pub fn new(id: u64, text: impl Into<String>) -> Self {
        Self {
            id: OptionId(id),
            text: text.into(),
        }
    }
}

/// Question difficulty as tagged by the content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<QuizOption>,
    /// Identity of the correct option. Survives reordering of `options`.
    pub correct: OptionId,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Learning note or explanation shown after answering.
    #[serde(default)]
    pub note: Option<String>,
    /// Picture accompanying the prompt (flashcards).
    #[serde(default)]
    pub image: Option<String>,
}

impl Question {
    /// Build a question from plain option texts and the index of the correct one.
    ///
    /// Option ids are assigned by position, so duplicate texts stay distinct.
    pub fn from_texts(
        id: u64,
        prompt: impl Into<String>,
        options: impl IntoIterator<Item = impl Into<String>>,
        correct_index: usize,
    ) -> Result<Self, LoadError> {
        let options: Vec<QuizOption> = options
            .into_iter()
            .enumerate()
            .map(|(i, text)| QuizOption::new(i as u64, text))
            .collect();
        let correct = options
            .get(correct_index)
            .map(|o| o.id)
            .ok_or_else(|| {
                LoadError::Malformed(format!(
                    "question {id}: answer index {correct_index} out of range for {} options",
                    options.len()
                ))
            })?;

        Ok(Self {
            id: QuestionId(id),
            prompt: prompt.into(),
            options,
            correct,
            difficulty: None,
            note: None,
            image: None,
        })
    }

    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    pub fn with_image(mut self, image: Option<String>) -> Self {
        self.image = image;
        self
    }

    /// Current display position of the correct option.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.id == self.correct)
    }

    /// The correct option itself.
    pub fn correct_option(&self) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == self.correct)
    }

    pub fn option(&self, id: OptionId) -> Option<&QuizOption> {
        self.options.iter().find(|o| o.id == id)
    }
}

/// Category reference carried by a deck and by submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub name: String,
}

impl CategoryRef {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    pub fn with_id(mut self, id: CategoryId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Category listing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    #[serde(default)]
    pub id: Option<CategoryId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub question_count: usize,
}

impl CategorySummary {
    pub fn to_ref(&self) -> CategoryRef {
        CategoryRef {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Ordered question set for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub category: CategoryRef,
    pub questions: Vec<Question>,
}

impl Deck {
    pub fn new(category: CategoryRef, questions: Vec<Question>) -> Self {
        Self {
            category,
            questions,
        }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// What the player did for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// An option was picked.
    Choice(OptionId),
    /// Free-text input.
    Text(String),
    /// The per-question timer ran out.
    TimedOut,
}

impl Answer {
    /// Whether this answer is correct for `question`.
    pub fn is_correct(&self, question: &Question) -> bool {
        match self {
            Answer::Choice(id) => *id == question.correct,
            Answer::Text(text) => question
                .correct_option()
                .is_some_and(|o| normalize(&o.text) == normalize(text)),
            Answer::TimedOut => false,
        }
    }

    /// Text representation used when reporting to the scoring endpoint.
    pub fn display_text(&self, question: &Question) -> String {
        match self {
            Answer::Choice(id) => question
                .option(*id)
                .map(|o| o.text.clone())
                .unwrap_or_default(),
            Answer::Text(text) => text.trim().to_string(),
            Answer::TimedOut => String::new(),
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Locally cached category listing used to recover a category id from a name.
///
/// Resolution fails closed: with no listing, or a name the listing does not
/// know, the player has to pick a category again.
#[derive(Debug, Clone, Default)]
pub struct CategoryIndex {
    categories: Option<Vec<CategorySummary>>,
}

impl CategoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_listing(categories: Vec<CategorySummary>) -> Self {
        Self {
            categories: Some(categories),
        }
    }

    /// Replace the cached listing with a freshly fetched one.
    pub fn refresh(&mut self, categories: Vec<CategorySummary>) {
        self.categories = Some(categories);
    }

    pub fn categories(&self) -> &[CategorySummary] {
        self.categories.as_deref().unwrap_or(&[])
    }

    /// Look up the category with exactly this name.
    pub fn resolve(&self, name: &str) -> Result<CategoryRef, LoadError> {
        let listing = self.categories.as_ref().ok_or_else(|| {
            LoadError::UnknownCategory(format!(
                "no category listing loaded; select '{name}' again"
            ))
        })?;

        listing
            .iter()
            .find(|c| c.name == name)
            .filter(|c| c.id.is_some())
            .map(CategorySummary::to_ref)
            .ok_or_else(|| LoadError::UnknownCategory(name.to_string()))
    }
}
