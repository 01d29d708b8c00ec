//! Option randomizer.
//!
//! Uniform Fisher-Yates shuffling of answer options that reports where the
//! correct option ended up. The correct option is followed by an identity
//! token assigned before shuffling, never by comparing display text, so
//! duplicate texts cannot be confused.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::ShuffleError;
use crate::model::{Deck, Question};

/// Output of [`shuffle_options`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shuffled<T> {
    /// The options in their new display order.
    pub options: Vec<T>,
    /// Position of the originally correct option within `options`.
    pub correct_index: usize,
}

/// Shuffle `options` uniformly and report the new index of the option that
/// was at `correct_index`.
pub fn shuffle_options<T, R>(
    options: Vec<T>,
    correct_index: usize,
    rng: &mut R,
) -> Result<Shuffled<T>, ShuffleError>
where
    R: Rng + ?Sized,
{
    if options.is_empty() {
        return Err(ShuffleError::Empty);
    }
    if correct_index >= options.len() {
        return Err(ShuffleError::IndexOutOfRange {
            index: correct_index,
            len: options.len(),
        });
    }

    // Tag each option with its original position before permuting.
    let mut tagged: Vec<(usize, T)> = options.into_iter().enumerate().collect();
    tagged.shuffle(rng);

    let mut new_index = 0;
    let options = tagged
        .into_iter()
        .enumerate()
        .map(|(position, (token, option))| {
            if token == correct_index {
                new_index = position;
            }
            option
        })
        .collect();

    Ok(Shuffled {
        options,
        correct_index: new_index,
    })
}

/// Return a copy of `question` with its options in a fresh random order.
pub fn shuffle_question<R>(question: &Question, rng: &mut R) -> Question
where
    R: Rng + ?Sized,
{
    let Some(correct_index) = question.correct_index() else {
        tracing::warn!(question = %question.id, "correct option missing, order kept");
        return question.clone();
    };

    match shuffle_options(question.options.clone(), correct_index, rng) {
        Ok(shuffled) => {
            debug_assert_eq!(
                shuffled.options[shuffled.correct_index].id,
                question.correct
            );
            Question {
                options: shuffled.options,
                ..question.clone()
            }
        }
        Err(e) => {
            tracing::warn!(question = %question.id, "option shuffle skipped: {e}");
            question.clone()
        }
    }
}

/// Produce the display order of a deck's questions.
pub fn arrange_deck<R>(
    deck: &Deck,
    shuffle_questions: bool,
    shuffle_options: bool,
    rng: &mut R,
) -> Vec<Question>
where
    R: Rng + ?Sized,
{
    let mut questions: Vec<Question> = if shuffle_options {
        deck.questions
            .iter()
            .map(|q| shuffle_question(q, rng))
            .collect()
    } else {
        deck.questions.clone()
    };

    if shuffle_questions {
        questions.shuffle(rng);
    }

    questions
}
