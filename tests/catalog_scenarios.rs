//! Scenario tests for the question catalog.
//!
//! These tests drive the catalog against an in-memory store seeded with a
//! small trivia bank and check both success shapes and error kinds.

use std::collections::BTreeSet;
use std::sync::Arc;

use trivia_kernel::{
    Category, CategoryId, CreateQuestionRequest, InMemoryQuestionStore, Question,
    QuestionCatalog, QuestionId, QuestionStore, QuizCategory, QuizRequest, SearchRequest,
    TriviaError,
};

// ─────────────────────────────────────────────────────────────────────────────
// Test Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn make_question(id: i64, text: &str, category: i64) -> Question {
    Question::new(QuestionId::new(id), text, "answer", CategoryId::new(category), 2)
}

/// 25 questions: ids 1..=25, category cycling through 1..=5, plus one
/// moon question in Science.
fn build_catalog() -> QuestionCatalog<InMemoryQuestionStore> {
    let store = InMemoryQuestionStore::with_default_categories();
    for id in 1..=24 {
        let category = (id - 1) % 5 + 1;
        store.add_question(make_question(id, &format!("Question number {}", id), category));
    }
    store.add_question(make_question(25, "Who was the first to walk on the Moon?", 1));
    QuestionCatalog::new(Arc::new(store))
}

fn quiz(category: Option<i64>, previous: &[i64]) -> QuizRequest {
    QuizRequest {
        previous_questions: previous.iter().copied().map(QuestionId::new).collect(),
        quiz_category: category.map(|id| QuizCategory {
            id: Some(id),
            kind: None,
        }),
    }
}

fn page_ids(questions: &[Question]) -> Vec<i64> {
    questions.iter().map(|q| q.id.get()).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories and Listing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_categories_listed_in_id_order() {
    let catalog = build_catalog();
    let categories = catalog.categories().await.unwrap();

    assert_eq!(categories.len(), 6);
    assert_eq!(categories[0], Category::new(CategoryId::new(1), "Science"));
    assert!(categories.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn test_no_categories_is_not_found() {
    let catalog = QuestionCatalog::new(Arc::new(InMemoryQuestionStore::new()));
    assert!(matches!(catalog.categories().await, Err(TriviaError::NotFound(_))));
}

#[tokio::test]
async fn test_pages_of_ten() {
    let catalog = build_catalog();

    let first = catalog.questions_page(1).await.unwrap();
    assert_eq!(page_ids(&first.questions), (1..=10).collect::<Vec<_>>());
    assert_eq!(first.total_questions, 25);
    assert_eq!(first.categories.len(), 6);

    let third = catalog.questions_page(3).await.unwrap();
    assert_eq!(page_ids(&third.questions), vec![21, 22, 23, 24, 25]);
    assert_eq!(third.total_questions, 25);
}

#[tokio::test]
async fn test_page_past_end_is_empty_not_error() {
    let catalog = build_catalog();
    let page = catalog.questions_page(99).await.unwrap();

    assert!(page.questions.is_empty());
    assert_eq!(page.total_questions, 25);
}

#[tokio::test]
async fn test_empty_bank_is_not_found() {
    let store = InMemoryQuestionStore::with_default_categories();
    let catalog = QuestionCatalog::new(Arc::new(store));

    assert!(matches!(catalog.questions_page(1).await, Err(TriviaError::NotFound(_))));
}

#[tokio::test]
async fn test_custom_page_size() {
    let store = InMemoryQuestionStore::with_default_categories();
    for id in 1..=7 {
        store.add_question(make_question(id, "q", 1));
    }
    let catalog = QuestionCatalog::with_page_size(Arc::new(store), 3);

    let last = catalog.questions_page(3).await.unwrap();
    assert_eq!(page_ids(&last.questions), vec![7]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Create and Delete
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_question() {
    let catalog = build_catalog();
    let request = CreateQuestionRequest {
        question: Some("Who's the first ever to walk on the moon ?".to_string()),
        answer: Some("Neil Armstrong".to_string()),
        category: Some(1),
        difficulty: Some(3),
    };

    let creation = catalog.create_question(request).await.unwrap();
    assert_eq!(creation.created, QuestionId::new(26));
    assert_eq!(creation.total_questions, 26);
    assert_eq!(creation.questions.last().unwrap().answer, "Neil Armstrong");
}

#[tokio::test]
async fn test_create_with_missing_fields_is_unprocessable() {
    let catalog = build_catalog();
    let request = CreateQuestionRequest {
        question: None,
        answer: None,
        category: None,
        difficulty: None,
    };

    assert!(matches!(
        catalog.create_question(request).await,
        Err(TriviaError::Unprocessable(_))
    ));
    assert_eq!(catalog.store().count_questions().await.unwrap(), 25);
}

#[tokio::test]
async fn test_create_in_unknown_category_is_unprocessable() {
    let catalog = build_catalog();
    let request = CreateQuestionRequest {
        question: Some("q".to_string()),
        answer: Some("a".to_string()),
        category: Some(1000),
        difficulty: Some(1),
    };

    assert!(matches!(
        catalog.create_question(request).await,
        Err(TriviaError::Unprocessable(_))
    ));
}

#[tokio::test]
async fn test_delete_question() {
    let catalog = build_catalog();
    let deletion = catalog.delete_question(QuestionId::new(2)).await.unwrap();

    assert_eq!(deletion.deleted, QuestionId::new(2));
    assert_eq!(deletion.total_questions, 24);
    assert!(!page_ids(&deletion.questions).contains(&2));
}

#[tokio::test]
async fn test_delete_missing_question_fails() {
    let catalog = build_catalog();

    assert!(matches!(
        catalog.delete_question(QuestionId::new(3000)).await,
        Err(TriviaError::NotFound(_))
    ));

    catalog.delete_question(QuestionId::new(4)).await.unwrap();
    assert!(matches!(
        catalog.delete_question(QuestionId::new(4)).await,
        Err(TriviaError::NotFound(_))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Search and Category Browsing
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let catalog = build_catalog();
    let results = catalog
        .search(SearchRequest {
            search_term: Some("MOON".to_string()),
        })
        .await
        .unwrap();

    assert_eq!(page_ids(&results.questions), vec![25]);
    assert_eq!(results.total_questions, 25);
}

#[tokio::test]
async fn test_search_results_ordered_by_id() {
    let catalog = build_catalog();
    let results = catalog
        .search(SearchRequest {
            search_term: Some("number 1".to_string()),
        })
        .await
        .unwrap();

    let ids = page_ids(&results.questions);
    assert_eq!(ids, vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
}

#[tokio::test]
async fn test_search_without_match_is_not_found() {
    let catalog = build_catalog();
    let result = catalog
        .search(SearchRequest {
            search_term: Some("afcon".to_string()),
        })
        .await;

    assert!(matches!(result, Err(TriviaError::NotFound(_))));
}

#[tokio::test]
async fn test_missing_search_term_matches_everything() {
    let catalog = build_catalog();
    let results = catalog.search(SearchRequest::default()).await.unwrap();
    assert_eq!(results.questions.len(), 25);
}

#[tokio::test]
async fn test_questions_for_category() {
    let catalog = build_catalog();
    let listing = catalog.category_questions(CategoryId::new(3)).await.unwrap();

    assert_eq!(listing.category.kind, "Geography");
    assert_eq!(page_ids(&listing.questions), vec![3, 8, 13, 18, 23]);
    assert_eq!(listing.total_questions, 5);
}

#[tokio::test]
async fn test_known_category_without_questions_is_empty() {
    let catalog = build_catalog();
    let listing = catalog.category_questions(CategoryId::new(6)).await.unwrap();

    assert!(listing.questions.is_empty());
    assert_eq!(listing.total_questions, 0);
}

#[tokio::test]
async fn test_unknown_category_is_not_found() {
    let catalog = build_catalog();
    assert!(matches!(
        catalog.category_questions(CategoryId::new(100)).await,
        Err(TriviaError::NotFound(_))
    ));
}

// ─────────────────────────────────────────────────────────────────────────────
// Quiz
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_quiz_skips_previous_question() {
    let catalog = build_catalog();

    for _ in 0..50 {
        let question = catalog.quiz(quiz(Some(5), &[5])).await.unwrap();
        assert_eq!(question.category, CategoryId::new(5));
        assert!([10, 15, 20].contains(&question.id.get()));
    }
}

#[tokio::test]
async fn test_quiz_without_category_is_unprocessable() {
    let catalog = build_catalog();
    assert!(matches!(
        catalog.quiz(quiz(None, &[])).await,
        Err(TriviaError::Unprocessable(_))
    ));
}

#[tokio::test]
async fn test_quiz_plays_every_question_once_then_stops() {
    let catalog = build_catalog();
    let mut seen: Vec<i64> = Vec::new();

    for _ in 0..25 {
        let question = catalog.quiz(quiz(Some(0), &seen)).await.unwrap();
        assert!(!seen.contains(&question.id.get()));
        seen.push(question.id.get());
    }

    let distinct: BTreeSet<_> = seen.iter().copied().collect();
    assert_eq!(distinct.len(), 25);

    assert!(matches!(
        catalog.quiz(quiz(Some(0), &seen)).await,
        Err(TriviaError::Unprocessable(_))
    ));
}

#[tokio::test]
async fn test_quiz_on_empty_category_is_unprocessable() {
    let catalog = build_catalog();
    assert!(matches!(
        catalog.quiz(quiz(Some(6), &[])).await,
        Err(TriviaError::Unprocessable(_))
    ));
}
