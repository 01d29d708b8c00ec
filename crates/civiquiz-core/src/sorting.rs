//! Sorting mode: drop every card into one of several bins, then check.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::SortingError;
use crate::model::{CategoryRef, QuestionId};
use crate::report::{AnswerEntry, SessionSummary};
use crate::scoring::percentage;

/// A card with the bin it belongs in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortCard {
    pub id: u64,
    pub text: String,
    pub bin: String,
}

/// A card that ended up in the wrong bin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Misplacement {
    pub card_id: u64,
    pub placed: String,
    pub expected: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingResult {
    pub correct: usize,
    pub total: usize,
    pub percentage: u32,
    pub mistakes: Vec<Misplacement>,
}

/// Board state for one sorting round.
#[derive(Debug, Clone)]
pub struct SortingBoard {
    category: CategoryRef,
    bins: Vec<String>,
    cards: Vec<SortCard>,
    placements: BTreeMap<u64, String>,
}

impl SortingBoard {
    /// Every card must name one of `bins` as its target, and card ids must be
    /// unique.
    pub fn new(
        category: CategoryRef,
        bins: Vec<String>,
        cards: Vec<SortCard>,
    ) -> Result<Self, SortingError> {
        if let Some(card) = cards.iter().find(|c| !bins.contains(&c.bin)) {
            return Err(SortingError::UnknownBin(card.bin.clone()));
        }
        let mut ids = HashSet::new();
        if let Some(card) = cards.iter().find(|c| !ids.insert(c.id)) {
            return Err(SortingError::DuplicateCard(card.id.to_string()));
        }
        Ok(Self {
            category,
            bins,
            cards,
            placements: BTreeMap::new(),
        })
    }

    pub fn category(&self) -> &CategoryRef {
        &self.category
    }

    pub fn bins(&self) -> &[String] {
        &self.bins
    }

    /// Move a card from the pool into `bin`. Placed cards stay put.
    pub fn place(&mut self, card_id: u64, bin: &str) -> Result<(), SortingError> {
        if !self.cards.iter().any(|c| c.id == card_id) {
            return Err(SortingError::UnknownCard(card_id.to_string()));
        }
        if !self.bins.iter().any(|b| b == bin) {
            return Err(SortingError::UnknownBin(bin.to_string()));
        }
        if self.placements.contains_key(&card_id) {
            return Err(SortingError::AlreadyPlaced(card_id.to_string()));
        }
        self.placements.insert(card_id, bin.to_string());
        Ok(())
    }

    /// Cards still waiting in the pool, in their original order.
    pub fn unplaced(&self) -> Vec<&SortCard> {
        self.cards
            .iter()
            .filter(|c| !self.placements.contains_key(&c.id))
            .collect()
    }

    pub fn bin_contents(&self, bin: &str) -> Vec<&SortCard> {
        self.cards
            .iter()
            .filter(|c| self.placements.get(&c.id).is_some_and(|b| b == bin))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.placements.len() == self.cards.len()
    }

    /// Score the board. Refused while cards remain in the pool.
    pub fn check(&self) -> Result<SortingResult, SortingError> {
        if !self.is_complete() {
            return Err(SortingError::Incomplete {
                remaining: self.cards.len() - self.placements.len(),
            });
        }

        let mistakes: Vec<Misplacement> = self
            .cards
            .iter()
            .filter_map(|c| {
                let placed = self.placements.get(&c.id)?;
                (placed != &c.bin).then(|| Misplacement {
                    card_id: c.id,
                    placed: placed.clone(),
                    expected: c.bin.clone(),
                })
            })
            .collect();

        let total = self.cards.len();
        let correct = total - mistakes.len();
        Ok(SortingResult {
            correct,
            total,
            percentage: percentage(correct, total),
            mistakes,
        })
    }

    /// Put every card back into the pool.
    pub fn reset(&mut self) {
        self.placements.clear();
    }

    /// Report placements in the submission format: card id as question id,
    /// bin name as the selected answer.
    pub fn summary(&self, user_name: Option<String>) -> SessionSummary {
        SessionSummary {
            user_name,
            category: self.category.clone(),
            answers: self
                .placements
                .iter()
                .map(|(id, bin)| AnswerEntry {
                    question_id: QuestionId(*id),
                    selected_answer: bin.clone(),
                })
                .collect(),
        }
    }
}
