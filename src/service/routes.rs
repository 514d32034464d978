//! Axum routes for the trivia service.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::catalog::{CreateQuestionRequest, QuizRequest, SearchRequest};
use crate::error::TriviaError;
use crate::pagination::parse_page;
use crate::store::QuestionStore;
use crate::types::{Category, CategoryId, Question, QuestionId};

use super::middleware::record_quiz_draw;
use super::state::ServiceState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query string of the question listing, as raw key/value pairs.
///
/// Values stay raw so that unparseable pages fall back to page 1, and a
/// repeated key resolves to its first occurrence.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PageQuery(Vec<(String, String)>);

impl PageQuery {
    /// First raw value of `page`, if any.
    pub fn page(&self) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == "page")
            .map(|(_, value)| value.as_str())
    }
}

/// Category listing keyed by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesResponse {
    pub success: bool,
    pub categories: BTreeMap<i64, String>,
}

/// One page of questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionsResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub categories: BTreeMap<i64, String>,
    pub current_category: Option<CategoryId>,
}

/// Result of a deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub deleted: QuestionId,
    pub questions: Vec<Question>,
    pub total_questions: usize,
}

/// Result of a creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub created: QuestionId,
}

/// Search hits, or the questions of one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionListResponse {
    pub success: bool,
    pub questions: Vec<Question>,
    pub total_questions: usize,
    pub current_category: Option<CategoryId>,
}

/// The next quiz question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub success: bool,
    pub question: Question,
}

/// Service health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: bool,
}

/// Simple liveness response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivenessResponse {
    pub status: String,
}

/// Structured error body: `{success: false, error: <code>, message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`.
    pub success: bool,
    /// HTTP status code.
    pub error: u16,
    /// Human-readable message.
    pub message: String,
}

impl From<TriviaError> for ErrorResponse {
    fn from(err: TriviaError) -> Self {
        tracing::warn!(
            code = err.status_code(),
            detail = %err.detail(),
            "Request error"
        );
        Self {
            success: false,
            error: err.status_code(),
            message: err.message().to_string(),
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.error).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id.get(), c.kind)).collect()
}

/// Unwrap a JSON body; well-formed JSON of the wrong shape is unprocessable.
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ErrorResponse> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(JsonRejection::JsonDataError(e)) => {
            Err(TriviaError::Unprocessable(e.body_text()).into())
        }
        Err(e) => Err(TriviaError::BadRequest(e.body_text()).into()),
    }
}

/// Unwrap an integer path segment; anything else is an unknown resource.
fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ErrorResponse> {
    id.map(|Path(id)| id)
        .map_err(|e| TriviaError::NotFound(e.body_text()).into())
}

// ============================================================================
// Route Handlers
// ============================================================================

type Shared<S> = State<Arc<ServiceState<S>>>;

/// List every category.
async fn categories_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
) -> Result<Json<CategoriesResponse>, ErrorResponse> {
    let categories = state.catalog.categories().await?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

/// One page of questions with every category.
async fn questions_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<QuestionsResponse>, ErrorResponse> {
    let query = query.map(|Query(query)| query).unwrap_or_default();
    let page = parse_page(query.page());
    let listing = state.catalog.questions_page(page).await?;

    Ok(Json(QuestionsResponse {
        success: true,
        questions: listing.questions,
        total_questions: listing.total_questions,
        categories: category_map(listing.categories),
        current_category: None,
    }))
}

/// Delete one question.
async fn delete_question_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteResponse>, ErrorResponse> {
    let id = QuestionId::new(path_id(id)?);
    let deletion = state.catalog.delete_question(id).await?;

    Ok(Json(DeleteResponse {
        success: true,
        deleted: deletion.deleted,
        questions: deletion.questions,
        total_questions: deletion.total_questions,
    }))
}

/// Create a question.
async fn create_question_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<CreateQuestionRequest>, JsonRejection>,
) -> Result<Json<CreateResponse>, ErrorResponse> {
    let request = json_body(payload)?;
    let creation = state.catalog.create_question(request).await?;

    Ok(Json(CreateResponse {
        success: true,
        questions: creation.questions,
        total_questions: creation.total_questions,
        created: creation.created,
    }))
}

/// Substring search over question text.
async fn search_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<QuestionListResponse>, ErrorResponse> {
    let request = json_body(payload)?;
    let results = state.catalog.search(request).await?;

    Ok(Json(QuestionListResponse {
        success: true,
        questions: results.questions,
        total_questions: results.total_questions,
        current_category: None,
    }))
}

/// Every question of one category.
async fn category_questions_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<QuestionListResponse>, ErrorResponse> {
    let id = CategoryId::new(path_id(id)?);
    let listing = state.catalog.category_questions(id).await?;

    Ok(Json(QuestionListResponse {
        success: true,
        questions: listing.questions,
        total_questions: listing.total_questions,
        current_category: Some(listing.category.id),
    }))
}

/// Draw the next unseen quiz question.
async fn quiz_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<QuizResponse>, ErrorResponse> {
    let request = json_body(payload)?;
    let previous_count = request.previous_questions.len();
    let has_category = request.filter().is_some();

    match state.catalog.quiz(request).await {
        Ok(question) => {
            record_quiz_draw(false, previous_count);
            Ok(Json(QuizResponse {
                success: true,
                question,
            }))
        }
        Err(e) => {
            if has_category && matches!(e, TriviaError::Unprocessable(_)) {
                record_quiz_draw(true, previous_count);
            }
            Err(e.into())
        }
    }
}

/// Health check endpoint.
async fn health_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
) -> Json<HealthResponse> {
    let db_healthy = state.store().is_healthy().await;
    Json(HealthResponse {
        status: if db_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: db_healthy,
    })
}

/// Liveness probe endpoint. Does NOT check dependencies.
async fn liveness_handler() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        status: "alive".to_string(),
    })
}

/// Readiness probe endpoint.
///
/// Returns 200 if the store is reachable, 503 otherwise.
async fn readiness_handler<S: QuestionStore + 'static>(
    State(state): Shared<S>,
) -> Result<Json<LivenessResponse>, (StatusCode, Json<LivenessResponse>)> {
    if state.store().is_healthy().await {
        Ok(Json(LivenessResponse {
            status: "ready".to_string(),
        }))
    } else {
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(LivenessResponse {
                status: "unavailable".to_string(),
            }),
        ))
    }
}

/// Structured 404 for unknown routes.
async fn fallback_handler() -> ErrorResponse {
    TriviaError::NotFound("no such route".to_string()).into()
}

// ============================================================================
// Router Construction
// ============================================================================

/// Create the Axum router for the trivia service.
pub fn create_router<S: QuestionStore + 'static>(state: ServiceState<S>) -> Router {
    let state = Arc::new(state);

    Router::new()
        // Categories
        .route("/categories", get(categories_handler::<S>))
        .route("/categories/:id/questions", get(category_questions_handler::<S>))
        // Questions
        .route("/questions", get(questions_handler::<S>).post(create_question_handler::<S>))
        .route("/questions/:id", delete(delete_question_handler::<S>))
        .route("/search/questions", post(search_handler::<S>))
        // Quiz
        .route("/quizzes", post(quiz_handler::<S>))
        // Health checks
        .route("/health", get(health_handler::<S>))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler::<S>))
        .fallback(fallback_handler)
        .with_state(state)
}
