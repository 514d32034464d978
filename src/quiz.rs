//! Non-repeating random quiz selection.
//!
//! The selector picks one question from the candidate pool that the caller
//! has not been served yet. The caller keeps the session state (the ids it
//! has already seen) and sends it with every request.
//!
//! ## Algorithm
//!
//! 1. Build the candidate pool from the category filter (`0` = all)
//! 2. Before each draw: if `|previous| >= |pool|`, report exhaustion
//! 3. Draw an id uniformly from the whole pool (with replacement)
//! 4. Accept it if unseen, otherwise draw again
//!
//! This is rejection sampling over the full pool, not sampling without
//! replacement. The size check in step 2 runs on every iteration and is what
//! bounds the loop: when every pool id has been seen, `previous` holds at
//! least `|pool|` distinct ids.

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::store::QuestionStore;
use crate::types::{CategoryFilter, Question, QuestionId};

/// Result of a quiz draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizOutcome {
    /// An unseen question from the pool.
    Question(Question),
    /// No eligible unseen question remains.
    Exhausted,
}

impl QuizOutcome {
    /// The drawn question, if any.
    pub fn question(&self) -> Option<&Question> {
        match self {
            Self::Question(q) => Some(q),
            Self::Exhausted => None,
        }
    }

    /// Whether selection is exhausted.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::Exhausted)
    }
}

/// Error type for quiz selection.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    /// Request carried no category selector.
    #[error("Quiz category is required")]
    MissingCategory,
    /// Store error.
    #[error("Store error: {0}")]
    StoreError(String),
}

impl QuizError {
    /// Create a store error from any error type.
    pub fn from_store<E: std::error::Error>(e: E) -> Self {
        Self::StoreError(e.to_string())
    }
}

/// Draw one question from `pool` whose id is not in `previous`.
///
/// Returns `None` when `previous` is at least as large as the pool. The
/// check is repeated before every draw.
pub fn select_from_pool<'a, R: Rng>(
    pool: &'a [Question],
    previous: &BTreeSet<QuestionId>,
    rng: &mut R,
) -> Option<&'a Question> {
    loop {
        if previous.len() >= pool.len() {
            return None;
        }

        let candidate = &pool[rng.gen_range(0..pool.len())];
        if !previous.contains(&candidate.id) {
            return Some(candidate);
        }
    }
}

/// Quiz selector backed by a question store.
pub struct QuizSelector<S: QuestionStore> {
    store: Arc<S>,
}

impl<S: QuestionStore + 'static> QuizSelector<S> {
    /// Create a new quiz selector.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Fetch the candidate pool for a category filter, ordered by id.
    pub async fn candidate_pool(&self, filter: CategoryFilter) -> Result<Vec<Question>, QuizError> {
        let pool = match filter {
            CategoryFilter::All => self.store.list_questions().await,
            CategoryFilter::Only(id) => self.store.list_questions_in_category(id).await,
        };
        pool.map_err(QuizError::from_store)
    }

    /// Pick the next unseen question using an entropy-seeded generator.
    ///
    /// A `None` filter is an input error, distinct from exhaustion.
    pub async fn next_question(
        &self,
        filter: Option<CategoryFilter>,
        previous: &[QuestionId],
    ) -> Result<QuizOutcome, QuizError> {
        let mut rng = StdRng::from_entropy();
        self.next_question_with_rng(filter, previous, &mut rng).await
    }

    /// Pick the next unseen question using the given generator.
    pub async fn next_question_with_rng<R: Rng + Send>(
        &self,
        filter: Option<CategoryFilter>,
        previous: &[QuestionId],
        rng: &mut R,
    ) -> Result<QuizOutcome, QuizError> {
        let filter = filter.ok_or(QuizError::MissingCategory)?;
        let pool = self.candidate_pool(filter).await?;
        let previous: BTreeSet<QuestionId> = previous.iter().copied().collect();

        match select_from_pool(&pool, &previous, rng) {
            Some(question) => Ok(QuizOutcome::Question(question.clone())),
            None => {
                tracing::debug!(
                    category = %filter,
                    pool_size = pool.len(),
                    previous_count = previous.len(),
                    "Quiz selection exhausted"
                );
                Ok(QuizOutcome::Exhausted)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryQuestionStore;
    use crate::types::CategoryId;

    fn make_question(id: i64, category: i64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Question {}", id),
            format!("Answer {}", id),
            CategoryId::new(category),
            1,
        )
    }

    fn ids(raw: &[i64]) -> Vec<QuestionId> {
        raw.iter().copied().map(QuestionId::new).collect()
    }

    fn seeded() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_exhausted_pool_returns_none() {
        let pool = vec![make_question(1, 5)];
        let previous: BTreeSet<_> = ids(&[1]).into_iter().collect();
        assert!(select_from_pool(&pool, &previous, &mut seeded()).is_none());
    }

    #[test]
    fn test_empty_pool_is_exhausted() {
        let pool: Vec<Question> = Vec::new();
        assert!(select_from_pool(&pool, &BTreeSet::new(), &mut seeded()).is_none());
    }

    #[test]
    fn test_previous_larger_than_pool_is_exhausted() {
        let pool = vec![make_question(1, 1), make_question(2, 1)];
        let previous: BTreeSet<_> = ids(&[7, 8, 9]).into_iter().collect();
        assert!(select_from_pool(&pool, &previous, &mut seeded()).is_none());
    }

    #[test]
    fn test_draw_skips_previous() {
        let pool: Vec<_> = (1..=5).map(|id| make_question(id, 5)).collect();
        let previous: BTreeSet<_> = ids(&[2]).into_iter().collect();
        let mut rng = seeded();

        for _ in 0..200 {
            let picked = select_from_pool(&pool, &previous, &mut rng).unwrap();
            assert_ne!(picked.id, QuestionId::new(2));
            assert!((1..=5).contains(&picked.id.get()));
        }
    }

    #[test]
    fn test_single_remaining_question_is_found() {
        let pool: Vec<_> = (1..=4).map(|id| make_question(id, 1)).collect();
        let previous: BTreeSet<_> = ids(&[1, 2, 4]).into_iter().collect();
        let picked = select_from_pool(&pool, &previous, &mut seeded()).unwrap();
        assert_eq!(picked.id, QuestionId::new(3));
    }

    fn build_store() -> Arc<InMemoryQuestionStore> {
        let store = InMemoryQuestionStore::with_default_categories();
        for id in 1..=5 {
            store.add_question(make_question(id, 5));
        }
        for id in 6..=8 {
            store.add_question(make_question(id, 1));
        }
        Arc::new(store)
    }

    #[tokio::test]
    async fn test_missing_category_is_an_error() {
        let selector = QuizSelector::new(build_store());
        let result = selector.next_question(None, &[]).await;
        assert!(matches!(result, Err(QuizError::MissingCategory)));
    }

    #[tokio::test]
    async fn test_category_filter_limits_pool() {
        let selector = QuizSelector::new(build_store());
        let filter = Some(CategoryFilter::from_id(CategoryId::new(5)));
        let mut rng = seeded();

        for _ in 0..50 {
            let outcome = selector
                .next_question_with_rng(filter, &ids(&[2]), &mut rng)
                .await
                .unwrap();
            let q = outcome.question().unwrap();
            assert_eq!(q.category, CategoryId::new(5));
            assert!([1, 3, 4, 5].contains(&q.id.get()));
        }
    }

    #[tokio::test]
    async fn test_category_zero_uses_every_question() {
        let selector = QuizSelector::new(build_store());
        let filter = Some(CategoryFilter::from_id(CategoryId::new(0)));
        let seen = ids(&[1, 2, 3, 4, 5, 6, 7]);

        let outcome = selector.next_question(filter, &seen).await.unwrap();
        assert_eq!(outcome.question().unwrap().id, QuestionId::new(8));
    }

    #[tokio::test]
    async fn test_whole_category_played_then_exhausted() {
        let selector = QuizSelector::new(build_store());
        let filter = Some(CategoryFilter::Only(CategoryId::new(1)));
        let mut seen = Vec::new();

        for _ in 0..3 {
            let outcome = selector.next_question(filter, &seen).await.unwrap();
            let q = outcome.question().unwrap();
            assert!(!seen.contains(&q.id));
            seen.push(q.id);
        }

        let outcome = selector.next_question(filter, &seen).await.unwrap();
        assert!(outcome.is_exhausted());
    }

    #[tokio::test]
    async fn test_duplicate_previous_ids_count_once() {
        let selector = QuizSelector::new(build_store());
        let filter = Some(CategoryFilter::Only(CategoryId::new(1)));

        let outcome = selector
            .next_question(filter, &ids(&[6, 6, 6]))
            .await
            .unwrap();
        assert!(!outcome.is_exhausted());
    }

    #[tokio::test]
    async fn test_unknown_category_is_exhausted() {
        let selector = QuizSelector::new(build_store());
        let filter = Some(CategoryFilter::Only(CategoryId::new(42)));

        let outcome = selector.next_question(filter, &[]).await.unwrap();
        assert!(outcome.is_exhausted());
    }
}
