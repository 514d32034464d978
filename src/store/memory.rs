//! In-memory question store for testing and local runs.

use std::collections::BTreeMap;
use async_trait::async_trait;
use parking_lot::RwLock;

use crate::types::{Category, CategoryId, NewQuestion, Question, QuestionId};
use super::QuestionStore;

/// Error type for in-memory store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InMemoryError {
    /// Question refers to a category that does not exist.
    #[error("Unknown category: {0}")]
    UnknownCategory(CategoryId),
}

#[derive(Debug, Default)]
struct Tables {
    questions: BTreeMap<QuestionId, Question>,
    categories: BTreeMap<CategoryId, Category>,
    next_id: i64,
}

/// In-memory question store.
///
/// Uses BTreeMap for identifier-ordered iteration.
#[derive(Debug, Default)]
pub struct InMemoryQuestionStore {
    tables: RwLock<Tables>,
}

impl InMemoryQuestionStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the six standard trivia categories.
    pub fn with_default_categories() -> Self {
        let store = Self::new();
        for (id, label) in [
            (1, "Science"),
            (2, "Art"),
            (3, "Geography"),
            (4, "History"),
            (5, "Entertainment"),
            (6, "Sports"),
        ] {
            store.add_category(Category::new(CategoryId::new(id), label));
        }
        store
    }

    /// Add a category to the store.
    pub fn add_category(&self, category: Category) {
        self.tables.write().categories.insert(category.id, category);
    }

    /// Add a question with a caller-chosen identifier.
    ///
    /// Later `create_question` calls continue numbering after the highest
    /// identifier seen.
    pub fn add_question(&self, question: Question) {
        let mut tables = self.tables.write();
        tables.next_id = tables.next_id.max(question.id.get());
        tables.questions.insert(question.id, question);
    }

    /// Get number of questions.
    pub fn num_questions(&self) -> usize {
        self.tables.read().questions.len()
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionStore {
    type Error = InMemoryError;

    async fn list_questions(&self) -> Result<Vec<Question>, Self::Error> {
        Ok(self.tables.read().questions.values().cloned().collect())
    }

    async fn list_questions_in_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, Self::Error> {
        Ok(self.tables.read()
            .questions
            .values()
            .filter(|q| q.category == category)
            .cloned()
            .collect())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        Ok(self.tables.read().categories.values().cloned().collect())
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error> {
        Ok(self.tables.read().categories.get(&id).cloned())
    }

    async fn create_question(&self, question: NewQuestion) -> Result<Question, Self::Error> {
        let mut tables = self.tables.write();
        if !tables.categories.contains_key(&question.category) {
            return Err(InMemoryError::UnknownCategory(question.category));
        }

        tables.next_id += 1;
        let stored = question.with_id(QuestionId::new(tables.next_id));
        tables.questions.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool, Self::Error> {
        Ok(self.tables.write().questions.remove(&id).is_some())
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Self::Error> {
        Ok(self.tables.read()
            .questions
            .values()
            .filter(|q| q.matches(term))
            .cloned()
            .collect())
    }

    async fn count_questions(&self) -> Result<usize, Self::Error> {
        Ok(self.num_questions())
    }
}
