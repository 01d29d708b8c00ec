//! Score aggregation and grade bands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// `round(100 * score / total)`, or 0 for an empty total.
pub fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((score as f64 * 100.0) / total as f64).round() as u32
}

/// Feedback band for a final percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grade {
    Outstanding,
    Excellent,
    GreatJob,
    GoodWork,
    KeepLearning,
    PracticeMore,
}

impl Grade {
    pub fn from_percentage(percentage: f64) -> Self {
        match percentage {
            p if p >= 90.0 => Grade::Outstanding,
            p if p >= 80.0 => Grade::Excellent,
            p if p >= 70.0 => Grade::GreatJob,
            p if p >= 60.0 => Grade::GoodWork,
            p if p >= 40.0 => Grade::KeepLearning,
            _ => Grade::PracticeMore,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Grade::Outstanding => "Outstanding!",
            Grade::Excellent => "Excellent!",
            Grade::GreatJob => "Great Job!",
            Grade::GoodWork => "Good Work!",
            Grade::KeepLearning => "Keep Learning!",
            Grade::PracticeMore => "Practice More!",
        };
        f.write_str(label)
    }
}

/// Final tally of a completed session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
    pub grade: Grade,
}

impl SessionResult {
    pub fn new(score: usize, total: usize) -> Self {
        let percentage = percentage(score, total);
        Self {
            score,
            total,
            percentage,
            grade: Grade::from_percentage(f64::from(percentage)),
        }
    }
}
