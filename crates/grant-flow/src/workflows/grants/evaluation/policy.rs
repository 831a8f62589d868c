use serde::{Deserialize, Serialize};

use super::Evaluation;

pub const MIN_SCORE: i32 = 0;
pub const MAX_SCORE: i32 = 100;

/// Controls whether the validity predicate gates persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationPolicy {
    pub enforce_validity: bool,
}

impl Default for EvaluationPolicy {
    fn default() -> Self {
        Self {
            enforce_validity: true,
        }
    }
}

/// Reasons an evaluation fails the validity predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidityViolation {
    ScoreOutOfRange(i32),
    EmptyComments,
}

impl ValidityViolation {
    pub fn summary(&self) -> String {
        match self {
            ValidityViolation::ScoreOutOfRange(score) => {
                format!("score {score} outside {MIN_SCORE}..={MAX_SCORE}")
            }
            ValidityViolation::EmptyComments => "comments must not be empty".to_string(),
        }
    }
}

pub(crate) fn violations(score: i32, comments: &str) -> Vec<ValidityViolation> {
    let mut found = Vec::new();
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        found.push(ValidityViolation::ScoreOutOfRange(score));
    }
    if comments.trim().is_empty() {
        found.push(ValidityViolation::EmptyComments);
    }
    found
}

impl Evaluation {
    /// Score within range and comments present.
    pub fn is_valid(&self) -> bool {
        violations(self.score, &self.comments).is_empty()
    }
}
