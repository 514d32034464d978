//! Trivia REST Service
//!
//! Exposes the question catalog as a REST API.
//!
//! ## Endpoints
//!
//! - `GET /categories` - List categories
//! - `GET /questions?page=N` - Paginated questions with categories
//! - `POST /questions` - Create a question
//! - `DELETE /questions/{id}` - Delete a question
//! - `POST /search/questions` - Substring search
//! - `GET /categories/{id}/questions` - Questions of one category
//! - `POST /quizzes` - Next unseen quiz question
//! - `GET /health` - Service health check
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe

pub mod middleware;
pub mod routes;
pub mod state;

pub use middleware::{metrics_middleware, record_quiz_draw};
pub use routes::{create_router, ErrorResponse};
pub use state::ServiceState;
