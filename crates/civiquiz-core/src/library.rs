//! Offline content source backed by deck files.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::LoadError;
use crate::model::{CategorySummary, Deck};
use crate::parser::{load_decks, DeckFile};
use crate::traits::ContentProvider;

/// Serves parsed deck files through [`ContentProvider`].
///
/// Sorting decks are listed but cannot be played as question decks.
pub struct DeckLibrary {
    decks: Vec<DeckFile>,
    rng: Mutex<StdRng>,
}

impl DeckLibrary {
    pub fn new(decks: Vec<DeckFile>) -> Self {
        Self {
            decks,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Fixed seed for flashcard distractors, for reproducible runs.
    pub fn with_seed(decks: Vec<DeckFile>, seed: u64) -> Self {
        Self {
            decks,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Load a deck file or a directory of them.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let decks = load_decks(path)?;
        tracing::debug!(count = decks.len(), path = %path.display(), "loaded decks");
        Ok(Self::new(decks))
    }

    pub fn decks(&self) -> &[DeckFile] {
        &self.decks
    }

    /// Find a deck by name, exact match first, then ignoring case.
    pub fn find(&self, name: &str) -> Option<&DeckFile> {
        let name = name.trim();
        self.decks
            .iter()
            .find(|d| d.name == name)
            .or_else(|| self.decks.iter().find(|d| d.name.eq_ignore_ascii_case(name)))
    }
}

#[async_trait]
impl ContentProvider for DeckLibrary {
    fn name(&self) -> &str {
        "static"
    }

    async fn categories(&self) -> Result<Vec<CategorySummary>, LoadError> {
        Ok(self.decks.iter().map(DeckFile::summary).collect())
    }

    async fn deck(&self, category: &str) -> Result<Deck, LoadError> {
        let file = self
            .find(category)
            .ok_or_else(|| LoadError::UnknownCategory(category.to_string()))?;

        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        file.to_deck(&mut *rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CategoryId;
    use crate::parser::parse_deck_str;

    fn library() -> DeckLibrary {
        let constitution = parse_deck_str(
            r#"
[deck]
name = "Constitution"
category_id = 4

[[questions]]
id = 1
prompt = "When was the current constitution promulgated?"
options = ["2015", "2007", "1990"]
answer = 0
"#,
            Path::new("constitution.toml"),
        )
        .unwrap();
        let sorting = parse_deck_str(
            r#"
[deck]
name = "Rights"
mode = "sorting"

[sorting]
bins = ["Right", "Duty"]

[[sorting.cards]]
id = 1
text = "Vote"
bin = "Right"
"#,
            Path::new("rights.toml"),
        )
        .unwrap();
        DeckLibrary::with_seed(vec![constitution, sorting], 3)
    }

    #[tokio::test]
    async fn lists_every_deck() {
        let lib = library();
        let categories = lib.categories().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert_eq!(categories[0].id, Some(CategoryId(4)));
        assert_eq!(categories[1].question_count, 1);
    }

    #[tokio::test]
    async fn serves_deck_by_name() {
        let lib = library();
        let deck = lib.deck("constitution").await.unwrap();
        assert_eq!(deck.category.id, Some(CategoryId(4)));
        assert_eq!(deck.len(), 1);
    }

    #[tokio::test]
    async fn unknown_and_sorting_decks_fail() {
        let lib = library();
        assert_eq!(
            lib.deck("Geography").await,
            Err(LoadError::UnknownCategory("Geography".into()))
        );
        assert!(matches!(
            lib.deck("Rights").await,
            Err(LoadError::Malformed(_))
        ));
    }
}
