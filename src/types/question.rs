//! Question types for the trivia kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryId;

/// Unique identifier for a question.
///
/// Assigned by the store on creation. Implements `Ord` so listings can be
/// ordered by identifier ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(i64);

impl QuestionId {
    /// Create a new QuestionId.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for QuestionId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A stored trivia question.
///
/// Serializes with the field names clients already consume:
/// `id`, `question`, `answer`, `category`, `difficulty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier.
    pub id: QuestionId,
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Category the question belongs to.
    pub category: CategoryId,
    /// Difficulty score.
    pub difficulty: i32,
}

impl Question {
    /// Create a question record.
    pub fn new(
        id: QuestionId,
        question: impl Into<String>,
        answer: impl Into<String>,
        category: CategoryId,
        difficulty: i32,
    ) -> Self {
        Self {
            id,
            question: question.into(),
            answer: answer.into(),
            category,
            difficulty,
        }
    }

    /// Case-insensitive substring match against the question text.
    pub fn matches(&self, term: &str) -> bool {
        self.question.to_lowercase().contains(&term.to_lowercase())
    }
}

/// A question that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    /// Question text.
    pub question: String,
    /// Answer text.
    pub answer: String,
    /// Category the question belongs to.
    pub category: CategoryId,
    /// Difficulty score.
    pub difficulty: i32,
}

impl NewQuestion {
    /// Create a new question request.
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        category: CategoryId,
        difficulty: i32,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category,
            difficulty,
        }
    }

    /// Attach a store-assigned identifier.
    pub fn with_id(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            answer: self.answer,
            category: self.category,
            difficulty: self.difficulty,
        }
    }
}
