//! Question storage backends.

pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;

use async_trait::async_trait;
use crate::types::{Category, CategoryId, NewQuestion, Question, QuestionId};

/// Trait for question storage backends.
///
/// Every listing is ordered by identifier ascending so pagination and
/// search results are stable across calls.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Error type for store operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch every question.
    async fn list_questions(&self) -> Result<Vec<Question>, Self::Error>;

    /// Fetch the questions of one category.
    async fn list_questions_in_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, Self::Error>;

    /// Fetch every category.
    async fn list_categories(&self) -> Result<Vec<Category>, Self::Error>;

    /// Fetch a category by ID.
    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error>;

    /// Store a new question and return it with its assigned identifier.
    async fn create_question(&self, question: NewQuestion) -> Result<Question, Self::Error>;

    /// Delete a question. Returns `false` if no such question exists.
    async fn delete_question(&self, id: QuestionId) -> Result<bool, Self::Error>;

    /// Case-insensitive substring search over question text.
    ///
    /// `%` and `_` in `term` match literally.
    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Self::Error>;

    /// Number of stored questions.
    async fn count_questions(&self) -> Result<usize, Self::Error> {
        Ok(self.list_questions().await?.len())
    }

    /// Whether the backend is reachable.
    async fn is_healthy(&self) -> bool {
        true
    }
}

pub use memory::InMemoryQuestionStore;

#[cfg(feature = "postgres")]
pub use postgres::PostgresQuestionStore;
