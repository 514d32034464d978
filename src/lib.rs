//! # trivia-kernel
//!
//! Question paging and non-repeating quiz selection for a trivia question bank.
//!
//! ## Core Contract
//!
//! 1. Page an identifier-ordered question listing into fixed-size windows
//! 2. Draw a random quiz question the caller has not seen yet, or report that
//!    the category is exhausted
//! 3. Serve both, plus search, creation, deletion and category browsing, over
//!    a pluggable question store
//!
//! ## Architecture
//!
//! ```text
//! HTTP (service) → QuestionCatalog → paginate / QuizSelector
//!                          ↓
//!              QuestionStore (Postgres or Memory)
//! ```
//!
//! ## Guarantees
//!
//! - Listings are ordered by question identifier
//! - Concatenating pages 1, 2, … yields every question exactly once
//! - A quiz draw never returns a previously served question and never loops
//!   once the pool is used up

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod pagination;
pub mod quiz;
pub mod store;
pub mod catalog;

#[cfg(feature = "service")]
pub mod service;

// Re-exports
pub use types::{Question, QuestionId, NewQuestion, Category, CategoryId, CategoryFilter};
pub use error::TriviaError;
pub use pagination::{paginate, parse_page, PageWindow};
pub use quiz::{select_from_pool, QuizSelector, QuizOutcome, QuizError};
pub use store::{QuestionStore, InMemoryQuestionStore};
#[cfg(feature = "postgres")]
pub use store::PostgresQuestionStore;
pub use catalog::{
    QuestionCatalog, CreateQuestionRequest, SearchRequest, QuizRequest, QuizCategory,
    QuestionPage, Deletion, Creation, SearchResults, CategoryQuestions,
};

// Service re-exports (when service feature is enabled)
#[cfg(feature = "service")]
pub use service::{create_router, ServiceState};

/// Page number used when the client does not supply a valid one.
pub const DEFAULT_PAGE: u32 = 1;

/// Default number of questions per listing page.
pub const QUESTIONS_PER_PAGE: usize = 10;
