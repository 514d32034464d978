//! Service state management.

use std::sync::Arc;

use crate::catalog::QuestionCatalog;
use crate::store::QuestionStore;
use crate::QUESTIONS_PER_PAGE;

/// Shared service state.
///
/// Built once in `main` around an explicitly constructed store and handed to
/// the router; handlers reach the store only through the catalog.
pub struct ServiceState<S: QuestionStore + 'static> {
    /// Request-level operations over the store.
    pub catalog: Arc<QuestionCatalog<S>>,
}

impl<S: QuestionStore + 'static> ServiceState<S> {
    /// Create service state with the default page size.
    pub fn new(store: S) -> Self {
        Self::with_page_size(store, QUESTIONS_PER_PAGE)
    }

    /// Create service state with a custom page size.
    pub fn with_page_size(store: S, page_size: usize) -> Self {
        Self {
            catalog: Arc::new(QuestionCatalog::with_page_size(Arc::new(store), page_size)),
        }
    }

    /// Create service state from environment variables.
    ///
    /// Reads `QUESTIONS_PER_PAGE`, falling back to the default when unset
    /// or not a positive integer.
    pub fn from_env(store: S) -> Self {
        let page_size = match std::env::var("QUESTIONS_PER_PAGE") {
            Ok(raw) => match raw.parse::<usize>() {
                Ok(size) if size > 0 => size,
                _ => {
                    tracing::warn!(
                        value = %raw,
                        default = QUESTIONS_PER_PAGE,
                        "QUESTIONS_PER_PAGE is not a positive integer, using default"
                    );
                    QUESTIONS_PER_PAGE
                }
            },
            Err(_) => QUESTIONS_PER_PAGE,
        };

        Self::with_page_size(store, page_size)
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        self.catalog.store()
    }
}

impl<S: QuestionStore + 'static> Clone for ServiceState<S> {
    fn clone(&self) -> Self {
        Self {
            catalog: Arc::clone(&self.catalog),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryQuestionStore;

    #[test]
    fn test_default_page_size() {
        let state = ServiceState::new(InMemoryQuestionStore::new());
        assert_eq!(state.catalog.page_size(), QUESTIONS_PER_PAGE);
    }

    #[test]
    fn test_clone_shares_store() {
        let state = ServiceState::with_page_size(InMemoryQuestionStore::with_default_categories(), 5);
        let cloned = state.clone();

        assert!(Arc::ptr_eq(state.store(), cloned.store()));
        assert_eq!(cloned.catalog.page_size(), 5);
    }
}
