//! Quiz session state machine.
//!
//! One [`Session`] tracks a single play-through of a deck: which question is
//! shown, what was answered, and whether results were submitted. It is owned
//! by exactly one screen and mutated only through the transition methods
//! below. The score is never stored; it is recomputed from the answer record
//! and the deck on every call.
//!
//! ```text
//! Loading ──load ok──▶ Ready(0) ─select+advance─▶ Ready(1) ─ … ─▶ Completed
//!    │                    ▲                                          │
//!    └──load failed──▶ Error ──begin_load (retry)──▶ Loading         │
//!                         └────────────────── reset ◀────────────────┘
//! ```

use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LoadError, SessionError, SubmissionError};
use crate::model::{Answer, CategoryRef, Deck, OptionId, Question, QuestionId};
use crate::report::{AnswerEntry, ServerAck, SessionSummary};
use crate::scoring::{percentage, SessionResult};
use crate::shuffle::arrange_deck;

/// How the player enters answers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    MultipleChoice,
    FreeText,
}

/// Per-screen variations of the same state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Reorder questions on every load and reset.
    pub shuffle_questions: bool,
    /// Reorder each question's options on every load and reset.
    pub shuffle_options: bool,
    pub input: InputMode,
    /// Per-question timer. `None` disables [`Session::time_out`].
    pub time_limit: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shuffle_questions: false,
            shuffle_options: true,
            input: InputMode::MultipleChoice,
            time_limit: None,
        }
    }
}

/// Where the session currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error(LoadError),
    Ready { index: usize },
    Completed,
}

/// Progress of the result submission for a completed session.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Idle,
    InFlight,
    Accepted(ServerAck),
    Failed(SubmissionError),
}

/// Handed out by [`Session::begin_load`]; a load result is only applied if the
/// ticket is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Handed out by [`Session::begin_submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitTicket {
    generation: u64,
}

/// Whether an asynchronous result was applied to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    /// The session was reset or reloaded while the request was outstanding.
    Stale,
}

/// One play-through of a deck.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    config: SessionConfig,
    source: Option<Deck>,
    questions: Vec<Question>,
    phase: Phase,
    answers: BTreeMap<QuestionId, Answer>,
    generation: u64,
    submission: Submission,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            source: None,
            questions: Vec::new(),
            phase: Phase::Loading,
            answers: BTreeMap::new(),
            generation: 0,
            submission: Submission::Idle,
            started_at: None,
            completed_at: None,
        }
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Enter `Loading` and invalidate any request still in flight.
    ///
    /// Also serves as the manual retry out of `Error`.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.phase = Phase::Loading;
        self.source = None;
        self.questions.clear();
        self.answers.clear();
        self.submission = Submission::Idle;
        self.started_at = None;
        self.completed_at = None;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply the result of a deck fetch started with `ticket`.
    pub fn complete_load<R>(
        &mut self,
        ticket: LoadTicket,
        result: Result<Deck, LoadError>,
        rng: &mut R,
    ) -> Outcome
    where
        R: Rng + ?Sized,
    {
        if ticket.generation != self.generation {
            tracing::debug!(
                session = %self.id,
                "discarding load result from generation {}",
                ticket.generation
            );
            return Outcome::Stale;
        }

        match result.and_then(check_deck) {
            Ok(deck) => {
                tracing::info!(
                    session = %self.id,
                    category = %deck.category.name,
                    questions = deck.len(),
                    "deck loaded"
                );
                self.questions = arrange_deck(
                    &deck,
                    self.config.shuffle_questions,
                    self.config.shuffle_options,
                    rng,
                );
                self.source = Some(deck);
                self.phase = Phase::Ready { index: 0 };
                self.started_at = Some(Utc::now());
            }
            Err(e) => {
                tracing::warn!(session = %self.id, "deck load failed: {e}");
                self.phase = Phase::Error(e);
            }
        }

        Outcome::Applied
    }

    /// Load a deck that is already at hand.
    pub fn load<R>(&mut self, deck: Deck, rng: &mut R) -> Result<(), LoadError>
    where
        R: Rng + ?Sized,
    {
        let ticket = self.begin_load();
        self.complete_load(ticket, Ok(deck), rng);
        match &self.phase {
            Phase::Error(e) => Err(e.clone()),
            _ => Ok(()),
        }
    }

    // -----------------------------------------------------------------------
    // Answering
    // -----------------------------------------------------------------------

    /// Lock `option` as the answer to the current question.
    ///
    /// Returns whether it was correct. Does not move to the next question.
    pub fn select_option(&mut self, option: OptionId) -> Result<bool, SessionError> {
        let index = self.ready_index()?;
        if self.questions[index].option(option).is_none() {
            return Err(SessionError::UnknownOption);
        }
        self.record(index, Answer::Choice(option))
    }

    /// Lock the option shown at `position` (0-based) as the answer.
    pub fn select_position(&mut self, position: usize) -> Result<bool, SessionError> {
        let index = self.ready_index()?;
        let option = self.questions[index]
            .options
            .get(position)
            .map(|o| o.id)
            .ok_or(SessionError::UnknownOption)?;
        self.select_option(option)
    }

    /// Lock a free-text answer for the current question.
    pub fn answer_text(&mut self, text: &str) -> Result<bool, SessionError> {
        let index = self.ready_index()?;
        self.record(index, Answer::Text(text.trim().to_string()))
    }

    /// Record that the per-question timer expired.
    pub fn time_out(&mut self) -> Result<(), SessionError> {
        if self.config.time_limit.is_none() {
            return Err(SessionError::NoTimeLimit);
        }
        let index = self.ready_index()?;
        self.record(index, Answer::TimedOut).map(|_| ())
    }

    fn record(&mut self, index: usize, answer: Answer) -> Result<bool, SessionError> {
        let question = &self.questions[index];
        if self.answers.contains_key(&question.id) {
            return Err(SessionError::AlreadyAnswered);
        }
        let correct = answer.is_correct(question);
        tracing::debug!(
            session = %self.id,
            question = %question.id,
            correct,
            "answer locked"
        );
        self.answers.insert(question.id, answer);
        Ok(correct)
    }

    /// Move past the current, answered question.
    pub fn advance(&mut self) -> Result<(), SessionError> {
        let index = self.ready_index()?;
        if !self.answers.contains_key(&self.questions[index].id) {
            return Err(SessionError::NotAnswered);
        }

        if index + 1 < self.questions.len() {
            self.phase = Phase::Ready { index: index + 1 };
        } else {
            self.phase = Phase::Completed;
            self.completed_at = Some(Utc::now());
            tracing::info!(
                session = %self.id,
                score = self.score(),
                total = self.total(),
                "session completed"
            );
        }
        Ok(())
    }

    /// Start over with the same deck: answers cleared, order re-randomized.
    pub fn reset<R>(&mut self, rng: &mut R) -> Result<(), SessionError>
    where
        R: Rng + ?Sized,
    {
        let Some(deck) = self.source.as_ref() else {
            return Err(SessionError::NoDeck);
        };

        self.generation += 1;
        self.questions = arrange_deck(
            deck,
            self.config.shuffle_questions,
            self.config.shuffle_options,
            rng,
        );
        self.answers.clear();
        self.phase = Phase::Ready { index: 0 };
        self.submission = Submission::Idle;
        self.started_at = Some(Utc::now());
        self.completed_at = None;
        tracing::debug!(session = %self.id, "session reset");
        Ok(())
    }

    fn ready_index(&self) -> Result<usize, SessionError> {
        match self.phase {
            Phase::Ready { index } => Ok(index),
            _ => Err(SessionError::NotReady),
        }
    }

    // -----------------------------------------------------------------------
    // Submission
    // -----------------------------------------------------------------------

    /// Mark a submission as started. Repeated triggers while one is in flight
    /// are refused with [`SessionError::SubmissionInFlight`], and once the
    /// server has accepted the results with [`SessionError::AlreadySubmitted`].
    /// A failed submission may be retried.
    pub fn begin_submit(&mut self) -> Result<SubmitTicket, SessionError> {
        if self.phase != Phase::Completed {
            return Err(SessionError::NotCompleted);
        }
        match self.submission {
            Submission::InFlight => return Err(SessionError::SubmissionInFlight),
            Submission::Accepted(_) => return Err(SessionError::AlreadySubmitted),
            Submission::Idle | Submission::Failed(_) => {}
        }
        self.submission = Submission::InFlight;
        Ok(SubmitTicket {
            generation: self.generation,
        })
    }

    /// Apply the reporter's answer for a submission started with `ticket`.
    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<ServerAck, SubmissionError>,
    ) -> Outcome {
        if ticket.generation != self.generation {
            tracing::debug!(session = %self.id, "discarding stale submission result");
            return Outcome::Stale;
        }
        self.submission = match result {
            Ok(ack) => Submission::Accepted(ack),
            Err(e) => {
                tracing::warn!(session = %self.id, "submission failed: {e}");
                Submission::Failed(e)
            }
        };
        Outcome::Applied
    }

    /// Build the summary handed to a [`crate::traits::ResultReporter`].
    ///
    /// Timed-out questions are reported with an empty answer.
    pub fn summary(&self, user_name: Option<String>) -> SessionSummary {
        let answers = self
            .questions
            .iter()
            .filter_map(|q| {
                self.answers.get(&q.id).map(|a| AnswerEntry {
                    question_id: q.id,
                    selected_answer: a.display_text(q),
                })
            })
            .collect();

        SessionSummary {
            user_name,
            category: self
                .category()
                .cloned()
                .unwrap_or_else(|| CategoryRef::named("")),
            answers,
        }
    }

    /// Attach a resolved category (e.g. one recovered from a listing).
    pub fn set_category(&mut self, category: CategoryRef) {
        if let Some(deck) = self.source.as_mut() {
            deck.category = category;
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn category(&self) -> Option<&CategoryRef> {
        self.source.as_ref().map(|d| &d.category)
    }

    /// Questions in display order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// 0-based pointer; equals `total()` once completed.
    pub fn pointer(&self) -> usize {
        match self.phase {
            Phase::Ready { index } => index,
            Phase::Completed => self.questions.len(),
            Phase::Loading | Phase::Error(_) => 0,
        }
    }

    pub fn current_index(&self) -> Option<usize> {
        self.ready_index().ok()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_index().map(|i| &self.questions[i])
    }

    pub fn current_answer(&self) -> Option<&Answer> {
        self.current_question().and_then(|q| self.answers.get(&q.id))
    }

    pub fn answers(&self) -> &BTreeMap<QuestionId, Answer> {
        &self.answers
    }

    pub fn total(&self) -> usize {
        self.questions.len()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Percentage of questions answered so far.
    pub fn progress(&self) -> u32 {
        percentage(self.answered_count(), self.total())
    }

    /// Number of correct answers, derived from the answer record.
    pub fn score(&self) -> usize {
        self.questions
            .iter()
            .filter(|q| self.answers.get(&q.id).is_some_and(|a| a.is_correct(q)))
            .count()
    }

    /// Final tally, available once completed.
    pub fn result(&self) -> Option<SessionResult> {
        self.is_completed()
            .then(|| SessionResult::new(self.score(), self.total()))
    }

    pub fn submission(&self) -> &Submission {
        &self.submission
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

/// Reject decks the state machine cannot drive.
fn check_deck(deck: Deck) -> Result<Deck, LoadError> {
    if deck.is_empty() {
        return Err(LoadError::EmptyDeck(deck.category.name));
    }

    let mut seen = HashSet::new();
    for q in &deck.questions {
        if !seen.insert(q.id) {
            return Err(LoadError::Malformed(format!("duplicate question id {}", q.id)));
        }
        let mut option_ids = HashSet::new();
        if let Some(dup) = q.options.iter().find(|o| !option_ids.insert(o.id)) {
            return Err(LoadError::Malformed(format!(
                "question {} repeats option id {}",
                q.id, dup.id.0
            )));
        }
        if q.correct_option().is_none() {
            return Err(LoadError::Malformed(format!(
                "question {} has no correct option",
                q.id
            )));
        }
    }

    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::model::CategoryId;
    use crate::scoring::Grade;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    fn fixed() -> SessionConfig {
        SessionConfig {
            shuffle_options: false,
            ..SessionConfig::default()
        }
    }

    fn two_question_deck() -> Deck {
        Deck::new(
            CategoryRef::named("Basics").with_id(CategoryId(9)),
            vec![
                Question::from_texts(1, "q1", ["A", "B", "C"], 0).unwrap(),
                Question::from_texts(2, "q2", ["X", "Y"], 1).unwrap(),
            ],
        )
    }

    fn deck_of(n: u64) -> Deck {
        let questions = (1..=n)
            .map(|i| {
                Question::from_texts(i, format!("q{i}"), ["a", "b", "c", "d"], (i % 4) as usize)
                    .unwrap()
            })
            .collect();
        Deck::new(CategoryRef::named("Generated"), questions)
    }

    fn ready(deck: Deck, config: SessionConfig) -> Session {
        let mut session = Session::new(config);
        session.load(deck, &mut rng()).unwrap();
        session
    }

    #[test]
    fn worked_example() {
        let mut s = ready(two_question_deck(), fixed());
        assert_eq!(s.phase(), &Phase::Ready { index: 0 });

        let a = s.questions()[0].options[0].id;
        assert!(s.select_option(a).unwrap());
        assert_eq!(s.score(), 1);

        s.advance().unwrap();
        assert_eq!(s.phase(), &Phase::Ready { index: 1 });

        let x = s.questions()[1].options[0].id;
        assert!(!s.select_option(x).unwrap());
        assert_eq!(s.score(), 1);

        s.advance().unwrap();
        assert!(s.is_completed());
        let result = s.result().unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.total, 2);
        assert_eq!(result.percentage, 50);
        assert_eq!(result.grade, Grade::KeepLearning);
    }

    #[test]
    fn full_run_completes_for_any_deck_size() {
        let mut rng = StdRng::seed_from_u64(77);
        for n in 1..=25 {
            let mut s = Session::new(SessionConfig {
                shuffle_questions: true,
                ..SessionConfig::default()
            });
            s.load(deck_of(n), &mut rng).unwrap();

            for step in 0..n as usize {
                assert_eq!(s.pointer(), step);
                let options = s.current_question().unwrap().options.len();
                s.select_position(rng.random_range(0..options)).unwrap();
                s.advance().unwrap();
            }

            assert!(s.is_completed());
            assert_eq!(s.pointer(), n as usize);
            let score = s.score();
            assert!(score <= n as usize);
            let recomputed = s
                .questions()
                .iter()
                .filter(|q| s.answers()[&q.id].is_correct(q))
                .count();
            assert_eq!(score, recomputed);
        }
    }

    #[test]
    fn advance_without_answer_is_rejected() {
        let mut s = ready(two_question_deck(), fixed());
        assert_eq!(s.advance(), Err(SessionError::NotAnswered));
        assert_eq!(s.pointer(), 0);
        assert_eq!(s.phase(), &Phase::Ready { index: 0 });
    }

    #[test]
    fn second_selection_is_a_no_op() {
        let mut s = ready(two_question_deck(), fixed());
        let wrong = s.questions()[0].options[1].id;
        let right = s.questions()[0].options[0].id;

        assert!(!s.select_option(wrong).unwrap());
        let before = s.answers().clone();

        let err = s.select_option(right).unwrap_err();
        assert_eq!(err, SessionError::AlreadyAnswered);
        assert!(err.is_ignorable());
        assert_eq!(s.answers(), &before);
        assert_eq!(s.score(), 0);
    }

    #[test]
    fn unknown_option_is_rejected_without_locking() {
        let mut s = ready(two_question_deck(), fixed());
        assert_eq!(
            s.select_option(OptionId(99)),
            Err(SessionError::UnknownOption)
        );
        assert_eq!(s.select_position(3), Err(SessionError::UnknownOption));
        assert!(s.answers().is_empty());
        assert!(s.select_position(0).unwrap());
    }

    #[test]
    fn input_before_load_is_refused() {
        let mut s = Session::new(fixed());
        assert_eq!(s.phase(), &Phase::Loading);
        assert_eq!(s.select_option(OptionId(0)), Err(SessionError::NotReady));
        assert_eq!(s.advance(), Err(SessionError::NotReady));
        assert_eq!(s.reset(&mut rng()), Err(SessionError::NoDeck));
    }

    #[test]
    fn empty_deck_enters_error() {
        let mut s = Session::new(fixed());
        let err = s
            .load(Deck::new(CategoryRef::named("Empty"), vec![]), &mut rng())
            .unwrap_err();
        assert_eq!(err, LoadError::EmptyDeck("Empty".into()));
        assert!(matches!(s.phase(), Phase::Error(LoadError::EmptyDeck(_))));
    }

    #[test]
    fn duplicate_question_ids_are_malformed() {
        let deck = Deck::new(
            CategoryRef::named("Dupes"),
            vec![
                Question::from_texts(1, "a", ["x", "y"], 0).unwrap(),
                Question::from_texts(1, "b", ["x", "y"], 1).unwrap(),
            ],
        );
        let mut s = Session::new(fixed());
        assert!(matches!(
            s.load(deck, &mut rng()),
            Err(LoadError::Malformed(_))
        ));
    }

    #[test]
    fn duplicate_option_ids_are_malformed() {
        let mut question = Question::from_texts(1, "a", ["x", "y"], 0).unwrap();
        question.options[1].id = question.options[0].id;
        let deck = Deck::new(CategoryRef::named("Dupes"), vec![question]);

        let mut s = Session::new(fixed());
        let err = s.load(deck, &mut rng()).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(ref m) if m.contains("repeats option id")));
        assert!(matches!(s.phase(), Phase::Error(_)));
    }

    #[test]
    fn failed_load_then_manual_retry() {
        let mut s = Session::new(fixed());
        let ticket = s.begin_load();
        s.complete_load(
            ticket,
            Err(LoadError::Unavailable("connection refused".into())),
            &mut rng(),
        );
        assert!(matches!(s.phase(), Phase::Error(LoadError::Unavailable(_))));

        let retry = s.begin_load();
        assert_eq!(s.phase(), &Phase::Loading);
        assert_eq!(
            s.complete_load(retry, Ok(two_question_deck()), &mut rng()),
            Outcome::Applied
        );
        assert_eq!(s.phase(), &Phase::Ready { index: 0 });
    }

    #[test]
    fn stale_load_results_are_discarded() {
        let mut s = Session::new(fixed());
        let first = s.begin_load();
        let second = s.begin_load();

        assert_eq!(
            s.complete_load(first, Ok(deck_of(3)), &mut rng()),
            Outcome::Stale
        );
        assert_eq!(s.phase(), &Phase::Loading);

        assert_eq!(
            s.complete_load(second, Ok(two_question_deck()), &mut rng()),
            Outcome::Applied
        );
        assert_eq!(s.total(), 2);
    }

    #[test]
    fn reset_from_completed() {
        let mut s = ready(two_question_deck(), SessionConfig::default());
        while !s.is_completed() {
            s.select_position(0).unwrap();
            s.advance().unwrap();
        }

        s.reset(&mut rng()).unwrap();
        assert_eq!(s.pointer(), 0);
        assert_eq!(s.phase(), &Phase::Ready { index: 0 });
        assert_eq!(s.score(), 0);
        assert!(s.answers().is_empty());
        assert_eq!(s.total(), 2);
        assert_eq!(s.result(), None);
    }

    #[test]
    fn reset_keeps_correct_identity_after_reshuffle() {
        let mut s = ready(deck_of(6), SessionConfig::default());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..10 {
            s.reset(&mut rng).unwrap();
            for q in s.questions() {
                assert_eq!(q.correct, OptionId(q.id.0 % 4));
                assert!(q.correct_index().is_some());
            }
        }
    }

    #[test]
    fn free_text_answers() {
        let mut s = ready(
            two_question_deck(),
            SessionConfig {
                input: InputMode::FreeText,
                ..fixed()
            },
        );
        assert!(s.answer_text(" a ").unwrap());
        assert_eq!(s.answer_text("B"), Err(SessionError::AlreadyAnswered));
        s.advance().unwrap();
        assert!(!s.answer_text("x").unwrap());
        s.advance().unwrap();
        assert_eq!(s.result().unwrap().score, 1);
    }

    #[test]
    fn timeouts_count_as_wrong_answers() {
        let mut untimed = ready(two_question_deck(), fixed());
        assert_eq!(untimed.time_out(), Err(SessionError::NoTimeLimit));

        let mut s = ready(
            two_question_deck(),
            SessionConfig {
                time_limit: Some(Duration::from_secs(10)),
                ..fixed()
            },
        );
        s.time_out().unwrap();
        assert_eq!(s.current_answer(), Some(&Answer::TimedOut));
        s.advance().unwrap();
        s.select_position(1).unwrap();
        s.advance().unwrap();

        let result = s.result().unwrap();
        assert_eq!((result.score, result.total), (1, 2));

        let summary = s.summary(None);
        assert_eq!(summary.answers.len(), 2);
        assert_eq!(summary.answers[0].selected_answer, "");
        assert_eq!(summary.answers[1].selected_answer, "Y");
    }

    #[test]
    fn progress_tracks_answered_questions() {
        let mut s = ready(deck_of(4), fixed());
        assert_eq!(s.progress(), 0);
        s.select_position(0).unwrap();
        assert_eq!(s.progress(), 25);
        s.advance().unwrap();
        s.select_position(0).unwrap();
        assert_eq!(s.progress(), 50);
    }

    #[test]
    fn submission_guards() {
        let mut s = ready(two_question_deck(), fixed());
        assert_eq!(s.begin_submit(), Err(SessionError::NotCompleted));

        while !s.is_completed() {
            s.select_position(0).unwrap();
            s.advance().unwrap();
        }

        let ticket = s.begin_submit().unwrap();
        assert_eq!(s.submission(), &Submission::InFlight);
        let dup = s.begin_submit().unwrap_err();
        assert_eq!(dup, SessionError::SubmissionInFlight);
        assert!(dup.is_ignorable());

        let ack = ServerAck {
            quiz_id: Some(1),
            score: 1,
            total_questions: 2,
            percentage: 50.0,
        };
        assert_eq!(s.complete_submit(ticket, Ok(ack.clone())), Outcome::Applied);
        assert_eq!(s.submission(), &Submission::Accepted(ack));

        let again = s.begin_submit().unwrap_err();
        assert_eq!(again, SessionError::AlreadySubmitted);
        assert!(again.is_ignorable());
    }

    #[test]
    fn failed_submission_can_be_retried() {
        let mut s = ready(two_question_deck(), fixed());
        while !s.is_completed() {
            s.select_position(0).unwrap();
            s.advance().unwrap();
        }

        let ticket = s.begin_submit().unwrap();
        s.complete_submit(ticket, Err(SubmissionError::Network("down".into())));
        assert!(matches!(s.submission(), Submission::Failed(_)));

        let retry = s.begin_submit().unwrap();
        assert_eq!(s.submission(), &Submission::InFlight);
        let ack = ServerAck {
            quiz_id: Some(2),
            score: 2,
            total_questions: 2,
            percentage: 100.0,
        };
        s.complete_submit(retry, Ok(ack));
        assert_eq!(s.begin_submit(), Err(SessionError::AlreadySubmitted));

        // Playing again starts a fresh submission.
        s.reset(&mut rng()).unwrap();
        while !s.is_completed() {
            s.select_position(0).unwrap();
            s.advance().unwrap();
        }
        assert!(s.begin_submit().is_ok());
    }

    #[test]
    fn submission_result_after_reset_is_discarded() {
        let mut s = ready(two_question_deck(), fixed());
        while !s.is_completed() {
            s.select_position(0).unwrap();
            s.advance().unwrap();
        }
        let ticket = s.begin_submit().unwrap();
        s.reset(&mut rng()).unwrap();

        let outcome = s.complete_submit(ticket, Err(SubmissionError::Network("down".into())));
        assert_eq!(outcome, Outcome::Stale);
        assert_eq!(s.submission(), &Submission::Idle);
    }

    #[test]
    fn summary_reports_option_text_and_category() {
        let mut s = ready(two_question_deck(), fixed());
        s.select_position(2).unwrap();
        let summary = s.summary(Some("Hari".into()));
        assert_eq!(summary.category.id, Some(CategoryId(9)));
        assert_eq!(summary.answers.len(), 1);
        assert_eq!(summary.answers[0].question_id, QuestionId(1));
        assert_eq!(summary.answers[0].selected_answer, "C");
    }

    #[test]
    fn set_category_updates_summary() {
        let mut s = ready(deck_of(1), fixed());
        assert_eq!(s.summary(None).category.id, None);
        s.set_category(CategoryRef::named("Generated").with_id(CategoryId(3)));
        assert_eq!(s.summary(None).category.id, Some(CategoryId(3)));
    }
}
