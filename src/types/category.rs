//! Category types for the trivia kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i64);

impl CategoryId {
    /// Reserved identifier meaning "every category" in quiz selection.
    pub const ALL: CategoryId = CategoryId(0);

    /// Create a new CategoryId.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw identifier.
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for CategoryId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// A question category.
///
/// The label serializes as `type` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique category identifier.
    pub id: CategoryId,
    /// Display label.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Category {
    /// Create a category.
    pub fn new(id: CategoryId, kind: impl Into<String>) -> Self {
        Self {
            id,
            kind: kind.into(),
        }
    }
}

/// Which questions are eligible for a quiz draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    /// Every question in the bank.
    All,
    /// Only questions in one category.
    Only(CategoryId),
}

impl CategoryFilter {
    /// Build a filter from a raw category id, treating `0` as all categories.
    pub fn from_id(id: CategoryId) -> Self {
        if id == CategoryId::ALL {
            Self::All
        } else {
            Self::Only(id)
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Only(id) => write!(f, "{}", id),
        }
    }
}
