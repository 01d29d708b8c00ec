//! Flashcard mode: turn prompt/answer cards into multiple-choice questions.
//!
//! Each card's options are its own answer plus a few answers borrowed from
//! other cards in the same set.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{CategoryRef, Deck, OptionId, Question, QuestionId, QuizOption};
use crate::shuffle::shuffle_options;

/// Number of wrong options shown next to the right one.
pub const DEFAULT_DISTRACTORS: usize = 3;

/// A prompt with a single expected answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCard {
    pub prompt: String,
    pub answer: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Build a deck with one question per card.
///
/// Distractors are distinct answers of other cards; answers with the same
/// text as the correct one are never used. Cards with too few other answers
/// simply get fewer options.
pub fn build_flashcard_deck<R>(
    category: CategoryRef,
    cards: &[FlashCard],
    distractors: usize,
    rng: &mut R,
) -> Deck
where
    R: Rng + ?Sized,
{
    let questions = cards
        .iter()
        .enumerate()
        .map(|(i, card)| {
            let mut seen = HashSet::new();
            let mut pool: Vec<&str> = cards
                .iter()
                .map(|c| c.answer.as_str())
                .filter(|a| *a != card.answer && seen.insert(*a))
                .collect();
            pool.shuffle(rng);
            pool.truncate(distractors);

            // Option 0 is the right answer; ids are fixed before shuffling.
            let options: Vec<QuizOption> = std::iter::once(card.answer.as_str())
                .chain(pool)
                .enumerate()
                .map(|(id, text)| QuizOption::new(id as u64, text))
                .collect();
            let options = match shuffle_options(options.clone(), 0, rng) {
                Ok(shuffled) => shuffled.options,
                Err(_) => options,
            };

            Question {
                id: QuestionId(i as u64 + 1),
                prompt: card.prompt.clone(),
                options,
                correct: OptionId(0),
                difficulty: None,
                note: None,
                image: card.image.clone(),
            }
        })
        .collect();

    Deck::new(category, questions)
}
