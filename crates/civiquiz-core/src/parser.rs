//! TOML deck parser.
//!
//! Loads static decks from TOML files and directories, and validates them.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{LoadError, SortingError};
use crate::flashcard::{build_flashcard_deck, FlashCard, DEFAULT_DISTRACTORS};
use crate::model::{
    CategoryId, CategoryRef, CategorySummary, Deck, Difficulty, OptionId, Question, QuestionId,
    QuizOption,
};
use crate::sorting::{SortCard, SortingBoard};

/// How a deck is played.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckMode {
    #[default]
    Quiz,
    /// Situational questions, each followed by a learning note.
    Scenario,
    Flashcard,
    Sorting,
}

impl fmt::Display for DeckMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiz => write!(f, "quiz"),
            Self::Scenario => write!(f, "scenario"),
            Self::Flashcard => write!(f, "flashcard"),
            Self::Sorting => write!(f, "sorting"),
        }
    }
}

/// Bins and cards of a sorting deck.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortingSet {
    pub bins: Vec<String>,
    pub cards: Vec<SortCard>,
}

/// A parsed deck file.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckFile {
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub description: String,
    pub mode: DeckMode,
    pub questions: Vec<Question>,
    pub cards: Vec<FlashCard>,
    pub sorting: Option<SortingSet>,
    /// Where the deck was read from.
    pub source: PathBuf,
}

/// Intermediate TOML structure for parsing deck files.
#[derive(Debug, Deserialize)]
struct TomlDeckFile {
    deck: TomlDeckHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
    #[serde(default)]
    cards: Vec<FlashCard>,
    #[serde(default)]
    sorting: Option<SortingSet>,
}

#[derive(Debug, Deserialize)]
struct TomlDeckHeader {
    name: String,
    #[serde(default)]
    category_id: Option<u64>,
    #[serde(default)]
    description: String,
    #[serde(default)]
    mode: DeckMode,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    id: u64,
    prompt: String,
    options: Vec<String>,
    answer: usize,
    #[serde(default)]
    difficulty: Option<String>,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl DeckFile {
    pub fn category(&self) -> CategoryRef {
        CategoryRef {
            id: self.category_id,
            name: self.name.clone(),
        }
    }

    /// Number of playable items, whatever the mode.
    pub fn item_count(&self) -> usize {
        match self.mode {
            DeckMode::Quiz | DeckMode::Scenario => self.questions.len(),
            DeckMode::Flashcard => self.cards.len(),
            DeckMode::Sorting => self.sorting.as_ref().map_or(0, |s| s.cards.len()),
        }
    }

    pub fn summary(&self) -> CategorySummary {
        CategorySummary {
            id: self.category_id,
            name: self.name.clone(),
            description: (!self.description.is_empty()).then(|| self.description.clone()),
            question_count: self.item_count(),
        }
    }

    /// Turn the file into a playable deck. Flashcard decks draw their
    /// distractors from `rng`.
    pub fn to_deck<R>(&self, rng: &mut R) -> Result<Deck, LoadError>
    where
        R: Rng + ?Sized,
    {
        match self.mode {
            DeckMode::Quiz | DeckMode::Scenario => {
                Ok(Deck::new(self.category(), self.questions.clone()))
            }
            DeckMode::Flashcard => Ok(build_flashcard_deck(
                self.category(),
                &self.cards,
                DEFAULT_DISTRACTORS,
                rng,
            )),
            DeckMode::Sorting => Err(LoadError::Malformed(format!(
                "'{}' is a sorting deck and has no questions",
                self.name
            ))),
        }
    }

    /// Set up a sorting board for a sorting deck.
    pub fn sorting_board(&self) -> Result<SortingBoard> {
        let set = self
            .sorting
            .as_ref()
            .filter(|_| self.mode == DeckMode::Sorting)
            .with_context(|| format!("'{}' is not a sorting deck", self.name))?;
        let board = SortingBoard::new(self.category(), set.bins.clone(), set.cards.clone())
            .map_err(|e: SortingError| anyhow::anyhow!("{}: {e}", self.source.display()))?;
        Ok(board)
    }
}

/// Parse a single TOML file into a `DeckFile`.
pub fn parse_deck_file(path: &Path) -> Result<DeckFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read deck file: {}", path.display()))?;

    parse_deck_str(&content, path)
}

/// Parse a TOML string into a `DeckFile` (useful for testing).
pub fn parse_deck_str(content: &str, source_path: &Path) -> Result<DeckFile> {
    let parsed: TomlDeckFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let questions = parsed
        .questions
        .into_iter()
        .map(|q| {
            let difficulty = q
                .difficulty
                .map(|d| d.parse::<Difficulty>().map_err(|e| anyhow::anyhow!("{}", e)))
                .transpose()?;

            // Ids are positional; an out-of-range answer is kept and reported
            // by validation.
            Ok(Question {
                id: QuestionId(q.id),
                prompt: q.prompt,
                options: q
                    .options
                    .into_iter()
                    .enumerate()
                    .map(|(i, text)| QuizOption::new(i as u64, text))
                    .collect(),
                correct: OptionId(q.answer as u64),
                difficulty,
                note: q.note,
                image: q.image,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DeckFile {
        name: parsed.deck.name,
        category_id: parsed.deck.category_id.map(CategoryId),
        description: parsed.deck.description,
        mode: parsed.deck.mode,
        questions,
        cards: parsed.cards,
        sorting: parsed.sorting,
        source: source_path.to_path_buf(),
    })
}

/// Load a single deck file, or every deck under a directory.
pub fn load_decks(path: &Path) -> Result<Vec<DeckFile>> {
    if path.is_dir() {
        load_deck_directory(path)
    } else {
        Ok(vec![parse_deck_file(path)?])
    }
}

/// Recursively load all `.toml` deck files from a directory.
pub fn load_deck_directory(dir: &Path) -> Result<Vec<DeckFile>> {
    let mut decks = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            decks.extend(load_deck_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_deck_file(&path) {
                Ok(deck) => decks.push(deck),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(decks)
}

/// A warning from deck validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The question or card id (if applicable).
    pub item_id: Option<u64>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn deck(message: impl Into<String>) -> Self {
        Self {
            item_id: None,
            message: message.into(),
        }
    }

    fn item(id: u64, message: impl Into<String>) -> Self {
        Self {
            item_id: Some(id),
            message: message.into(),
        }
    }
}

/// Minimum number of flashcards for a full set of distractors.
const MIN_FLASHCARDS: usize = DEFAULT_DISTRACTORS + 1;

/// Validate a deck for common issues.
pub fn validate_deck_file(deck: &DeckFile) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if deck.item_count() == 0 {
        warnings.push(ValidationWarning::deck(format!(
            "{} deck has no items",
            deck.mode
        )));
    }

    match deck.mode {
        DeckMode::Quiz | DeckMode::Scenario => validate_questions(deck, &mut warnings),
        DeckMode::Flashcard => {
            if !deck.cards.is_empty() && deck.cards.len() < MIN_FLASHCARDS {
                warnings.push(ValidationWarning::deck(format!(
                    "only {} cards; questions will have fewer than {} options",
                    deck.cards.len(),
                    MIN_FLASHCARDS
                )));
            }
            for card in &deck.cards {
                if card.prompt.trim().is_empty() {
                    warnings.push(ValidationWarning::deck(format!(
                        "card with answer '{}' has an empty prompt",
                        card.answer
                    )));
                }
            }
        }
        DeckMode::Sorting => validate_sorting(deck, &mut warnings),
    }

    warnings
}

fn validate_questions(deck: &DeckFile, warnings: &mut Vec<ValidationWarning>) {
    // Check for duplicate question IDs
    let mut seen_ids = HashSet::new();
    for q in &deck.questions {
        if !seen_ids.insert(q.id) {
            warnings.push(ValidationWarning::item(
                q.id.0,
                format!("duplicate question ID: {}", q.id),
            ));
        }
    }

    for q in &deck.questions {
        if q.prompt.trim().is_empty() {
            warnings.push(ValidationWarning::item(q.id.0, "prompt is empty"));
        }
        if q.options.len() < 2 {
            warnings.push(ValidationWarning::item(
                q.id.0,
                format!("only {} option(s); at least 2 expected", q.options.len()),
            ));
        }
        if q.correct_index().is_none() {
            warnings.push(ValidationWarning::item(
                q.id.0,
                format!(
                    "answer index {} out of range for {} options",
                    q.correct.0,
                    q.options.len()
                ),
            ));
        }

        let mut texts = HashSet::new();
        for o in &q.options {
            if !texts.insert(o.text.trim()) {
                warnings.push(ValidationWarning::item(
                    q.id.0,
                    format!("duplicate option text: {}", o.text),
                ));
            }
        }
    }
}

fn validate_sorting(deck: &DeckFile, warnings: &mut Vec<ValidationWarning>) {
    let Some(set) = &deck.sorting else {
        warnings.push(ValidationWarning::deck("sorting deck has no [sorting] table"));
        return;
    };

    if set.bins.len() < 2 {
        warnings.push(ValidationWarning::deck("sorting deck needs at least 2 bins"));
    }

    let mut seen_ids = HashSet::new();
    for card in &set.cards {
        if !seen_ids.insert(card.id) {
            warnings.push(ValidationWarning::item(
                card.id,
                format!("duplicate card ID: {}", card.id),
            ));
        }
        if !set.bins.contains(&card.bin) {
            warnings.push(ValidationWarning::item(
                card.id,
                format!("card points at unknown bin '{}'", card.bin),
            ));
        }
    }
}
