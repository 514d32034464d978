//! Request-level operations over a question store.
//!
//! The catalog turns client requests into store calls, applies pagination and
//! quiz selection, and reports failures as [`TriviaError`]. It has no
//! knowledge of HTTP; the service layer only maps results to JSON bodies.

use std::sync::Arc;

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::error::TriviaError;
use crate::pagination::paginate;
use crate::quiz::{QuizError, QuizOutcome, QuizSelector};
use crate::store::QuestionStore;
use crate::types::{Category, CategoryFilter, CategoryId, NewQuestion, Question, QuestionId};
use crate::QUESTIONS_PER_PAGE;

// ============================================================================
// Request Types
// ============================================================================

/// Body of a question creation request.
///
/// Every field is optional at the wire level so a missing field is reported
/// as unprocessable rather than as a parse failure. Integer fields also
/// accept numeric strings and whole-valued floats.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateQuestionRequest {
    /// Question text.
    #[serde(default)]
    pub question: Option<String>,
    /// Answer text.
    #[serde(default)]
    pub answer: Option<String>,
    /// Category id.
    #[serde(default, deserialize_with = "lenient_int")]
    pub category: Option<i64>,
    /// Difficulty score.
    #[serde(default, deserialize_with = "lenient_int")]
    pub difficulty: Option<i64>,
}

impl CreateQuestionRequest {
    /// Check that every field is present and non-blank.
    pub fn validate(self) -> Result<NewQuestion, TriviaError> {
        let question = required_text(self.question, "question")?;
        let answer = required_text(self.answer, "answer")?;
        let category = self
            .category
            .ok_or_else(|| TriviaError::Unprocessable("category is required".to_string()))?;
        let difficulty = self
            .difficulty
            .ok_or_else(|| TriviaError::Unprocessable("difficulty is required".to_string()))?;
        let difficulty = i32::try_from(difficulty).map_err(|_| {
            TriviaError::Unprocessable(format!("difficulty out of range: {}", difficulty))
        })?;

        Ok(NewQuestion::new(question, answer, CategoryId::new(category), difficulty))
    }
}

/// Body of a search request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    /// Substring to look for. Missing means match everything.
    #[serde(rename = "searchTerm", default)]
    pub search_term: Option<String>,
}

/// Category selector sent with a quiz request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizCategory {
    /// Category id, `0` for all categories.
    #[serde(default, deserialize_with = "lenient_int")]
    pub id: Option<i64>,
    /// Display label, informational only.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Body of a quiz request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizRequest {
    /// Questions already served in this quiz session.
    #[serde(default)]
    pub previous_questions: Vec<QuestionId>,
    /// Category selector.
    #[serde(default)]
    pub quiz_category: Option<QuizCategory>,
}

impl QuizRequest {
    /// Resolve the category filter, `None` if the selector or its id is missing.
    pub fn filter(&self) -> Option<CategoryFilter> {
        self.quiz_category
            .as_ref()
            .and_then(|c| c.id)
            .map(|id| CategoryFilter::from_id(CategoryId::new(id)))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    match Option::<IntOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrText::Int(v)) => Ok(Some(v)),
        Some(IntOrText::Float(v)) => whole_float(v).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected a whole number, got {}", v))
        }),
        Some(IntOrText::Text(s)) => s.trim().parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn whole_float(v: f64) -> Option<i64> {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    let in_range = v >= i64::MIN as f64 && v < -(i64::MIN as f64);
    (v.fract() == 0.0 && in_range).then_some(v as i64)
}

fn required_text(value: Option<String>, field: &str) -> Result<String, TriviaError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(TriviaError::Unprocessable(format!("{} is required", field))),
    }
}

// ============================================================================
// Results
// ============================================================================

/// One page of the question listing.
#[derive(Debug, Clone)]
pub struct QuestionPage {
    /// Questions on the requested page.
    pub questions: Vec<Question>,
    /// Number of questions in the whole bank.
    pub total_questions: usize,
    /// Every category.
    pub categories: Vec<Category>,
}

/// Outcome of a deletion.
#[derive(Debug, Clone)]
pub struct Deletion {
    /// Identifier that was removed.
    pub deleted: QuestionId,
    /// Remaining questions.
    pub questions: Vec<Question>,
    /// Number of remaining questions.
    pub total_questions: usize,
}

/// Outcome of a creation.
#[derive(Debug, Clone)]
pub struct Creation {
    /// Identifier assigned to the new question.
    pub created: QuestionId,
    /// Every question including the new one.
    pub questions: Vec<Question>,
    /// Number of questions in the bank.
    pub total_questions: usize,
}

/// Search hits.
#[derive(Debug, Clone)]
pub struct SearchResults {
    /// Matching questions, identifier ascending.
    pub questions: Vec<Question>,
    /// Number of questions in the whole bank.
    pub total_questions: usize,
}

/// Questions of one category.
#[derive(Debug, Clone)]
pub struct CategoryQuestions {
    /// The category browsed.
    pub category: Category,
    /// Questions in that category.
    pub questions: Vec<Question>,
    /// Number of questions in that category.
    pub total_questions: usize,
}

// ============================================================================
// Catalog
// ============================================================================

/// Catalog of trivia questions.
pub struct QuestionCatalog<S: QuestionStore> {
    store: Arc<S>,
    selector: QuizSelector<S>,
    page_size: usize,
}

impl<S: QuestionStore + 'static> QuestionCatalog<S> {
    /// Create a catalog with the default page size.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_page_size(store, QUESTIONS_PER_PAGE)
    }

    /// Create a catalog with a custom page size.
    pub fn with_page_size(store: Arc<S>, page_size: usize) -> Self {
        Self {
            selector: QuizSelector::new(Arc::clone(&store)),
            store,
            page_size,
        }
    }

    /// Questions per page.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// List every category. Fails if there are none.
    pub async fn categories(&self) -> Result<Vec<Category>, TriviaError> {
        let categories = self.store.list_categories().await.map_err(TriviaError::from_store)?;
        if categories.is_empty() {
            return Err(TriviaError::NotFound("no categories".to_string()));
        }
        Ok(categories)
    }

    /// One page of questions plus every category.
    ///
    /// Fails only when the bank is empty; a page past the end is empty.
    pub async fn questions_page(&self, page: u32) -> Result<QuestionPage, TriviaError> {
        let all = self.store.list_questions().await.map_err(TriviaError::from_store)?;
        if all.is_empty() {
            return Err(TriviaError::NotFound("no questions".to_string()));
        }

        let categories = self.store.list_categories().await.map_err(TriviaError::from_store)?;
        let questions = paginate(&all, page, self.page_size).to_vec();
        debug!(page, returned = questions.len(), total = all.len(), "Question page served");

        Ok(QuestionPage {
            questions,
            total_questions: all.len(),
            categories,
        })
    }

    /// Delete a question. Fails if it does not exist.
    pub async fn delete_question(&self, id: QuestionId) -> Result<Deletion, TriviaError> {
        let removed = self.store.delete_question(id).await.map_err(TriviaError::from_store)?;
        if !removed {
            return Err(TriviaError::NotFound(format!("question {}", id)));
        }
        info!(question_id = %id, "Question deleted");

        let questions = self.store.list_questions().await.map_err(TriviaError::from_store)?;
        Ok(Deletion {
            deleted: id,
            total_questions: questions.len(),
            questions,
        })
    }

    /// Validate and store a new question.
    pub async fn create_question(
        &self,
        request: CreateQuestionRequest,
    ) -> Result<Creation, TriviaError> {
        let new_question = request.validate()?;

        let category = self
            .store
            .get_category(new_question.category)
            .await
            .map_err(TriviaError::from_store)?;
        if category.is_none() {
            return Err(TriviaError::Unprocessable(format!(
                "unknown category {}",
                new_question.category
            )));
        }

        let created = self
            .store
            .create_question(new_question)
            .await
            .map_err(TriviaError::from_store)?;
        info!(question_id = %created.id, category = %created.category, "Question created");

        let questions = self.store.list_questions().await.map_err(TriviaError::from_store)?;
        Ok(Creation {
            created: created.id,
            total_questions: questions.len(),
            questions,
        })
    }

    /// Case-insensitive substring search. Fails if nothing matches.
    pub async fn search(&self, request: SearchRequest) -> Result<SearchResults, TriviaError> {
        let term = request.search_term.unwrap_or_default();
        let questions = self
            .store
            .search_questions(&term)
            .await
            .map_err(TriviaError::from_store)?;
        if questions.is_empty() {
            return Err(TriviaError::NotFound(format!("no match for {:?}", term)));
        }

        let total_questions = self.store.count_questions().await.map_err(TriviaError::from_store)?;
        Ok(SearchResults {
            questions,
            total_questions,
        })
    }

    /// Every question of one category. Fails if the category is unknown.
    pub async fn category_questions(
        &self,
        id: CategoryId,
    ) -> Result<CategoryQuestions, TriviaError> {
        let category = self
            .store
            .get_category(id)
            .await
            .map_err(TriviaError::from_store)?
            .ok_or_else(|| TriviaError::NotFound(format!("category {}", id)))?;

        let questions = self
            .store
            .list_questions_in_category(id)
            .await
            .map_err(TriviaError::from_store)?;

        Ok(CategoryQuestions {
            category,
            total_questions: questions.len(),
            questions,
        })
    }

    /// Draw the next unseen quiz question.
    ///
    /// A missing category and an exhausted pool are both unprocessable.
    pub async fn quiz(&self, request: QuizRequest) -> Result<Question, TriviaError> {
        let outcome = self
            .selector
            .next_question(request.filter(), &request.previous_questions)
            .await
            .map_err(|e| match e {
                QuizError::MissingCategory => TriviaError::Unprocessable(e.to_string()),
                QuizError::StoreError(_) => TriviaError::from_store(e),
            })?;

        match outcome {
            QuizOutcome::Question(question) => Ok(question),
            QuizOutcome::Exhausted => Err(TriviaError::Unprocessable(
                "no unseen questions remain".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_accepts_numeric_strings() {
        let request: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "question": "q",
            "answer": "a",
            "category": "3",
            "difficulty": 2
        }))
        .unwrap();

        let new_question = request.validate().unwrap();
        assert_eq!(new_question.category, CategoryId::new(3));
        assert_eq!(new_question.difficulty, 2);
    }

    #[test]
    fn test_create_request_accepts_whole_floats() {
        let request: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "question": "q",
            "answer": "a",
            "category": 3.0,
            "difficulty": 2.0
        }))
        .unwrap();

        let new_question = request.validate().unwrap();
        assert_eq!(new_question.category, CategoryId::new(3));
        assert_eq!(new_question.difficulty, 2);
    }

    #[test]
    fn test_create_request_rejects_fractional_floats() {
        let result: Result<CreateQuestionRequest, _> = serde_json::from_value(serde_json::json!({
            "question": "q",
            "answer": "a",
            "category": 3.5,
            "difficulty": 2
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_create_request_null_fields_are_unprocessable() {
        let request: CreateQuestionRequest = serde_json::from_value(serde_json::json!({
            "question": null,
            "answer": null,
            "category": null
        }))
        .unwrap();

        assert!(matches!(request.validate(), Err(TriviaError::Unprocessable(_))));
    }

    #[test]
    fn test_blank_text_is_unprocessable() {
        let request = CreateQuestionRequest {
            question: Some("   ".to_string()),
            answer: Some("a".to_string()),
            category: Some(1),
            difficulty: Some(1),
        };
        assert!(matches!(request.validate(), Err(TriviaError::Unprocessable(_))));
    }

    #[test]
    fn test_quiz_request_filter() {
        let request: QuizRequest = serde_json::from_value(serde_json::json!({
            "previous_questions": [2],
            "quiz_category": {"id": "0", "type": "click"}
        }))
        .unwrap();
        assert_eq!(request.filter(), Some(CategoryFilter::All));
        assert_eq!(request.previous_questions, vec![QuestionId::new(2)]);

        let missing: QuizRequest =
            serde_json::from_value(serde_json::json!({"previous_questions": []})).unwrap();
        assert_eq!(missing.filter(), None);

        let null: QuizRequest =
            serde_json::from_value(serde_json::json!({"quiz_category": null})).unwrap();
        assert_eq!(null.filter(), None);
    }
}
