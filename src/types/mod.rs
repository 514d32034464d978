//! Core types for the trivia kernel.

pub mod question;
pub mod category;

pub use question::{Question, QuestionId, NewQuestion};
pub use category::{Category, CategoryId, CategoryFilter};
