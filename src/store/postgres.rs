//! PostgreSQL question store for production use.
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
//! - `DB_MIN_CONNECTIONS`: Minimum idle connections (default: 2)
//! - `DB_CONNECT_TIMEOUT_SECS`: Connection timeout (default: 10)
//! - `DB_IDLE_TIMEOUT_SECS`: Idle connection timeout (default: 300)
//! - `DB_MAX_LIFETIME_SECS`: Max connection lifetime (default: 1800)

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Executor, Row};
use std::time::Duration;

use crate::types::{Category, CategoryId, NewQuestion, Question, QuestionId};
use super::QuestionStore;

/// Table definitions for the trivia schema.
///
/// Applied by [`PostgresQuestionStore::ensure_schema`]; every statement is
/// idempotent.
pub const TRIVIA_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id SERIAL PRIMARY KEY,
    type TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS questions (
    id SERIAL PRIMARY KEY,
    question TEXT NOT NULL,
    answer TEXT NOT NULL,
    category INTEGER NOT NULL REFERENCES categories (id),
    difficulty INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_questions_category ON questions (category);
"#;

/// Configuration for PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum connections in pool (default: 10).
    pub max_connections: u32,
    /// Minimum idle connections to keep warm (default: 2).
    pub min_connections: u32,
    /// Connection acquire timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds (default: 300 = 5 min).
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds (default: 1800 = 30 min).
    pub max_lifetime_secs: u64,
}

impl PostgresConfig {
    /// Load configuration from environment variables with production defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/trivia".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

/// Escape `%`, `_` and `\` so a search term matches as a literal substring.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// PostgreSQL question store.
pub struct PostgresQuestionStore {
    pool: PgPool,
}

impl PostgresQuestionStore {
    /// Create a new store with the given configuration.
    pub async fn new(config: PostgresConfig) -> Result<Self, sqlx::Error> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            max_lifetime_secs = config.max_lifetime_secs,
            "Initializing PostgreSQL connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a store from environment variables.
    pub async fn from_env() -> Result<Self, sqlx::Error> {
        Self::new(PostgresConfig::from_env()).await
    }

    /// Create the trivia tables if they do not exist.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        self.pool.execute(TRIVIA_SCHEMA).await?;
        Ok(())
    }

    /// Get pool statistics for monitoring.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max: self.pool.options().get_max_connections(),
        }
    }

    fn parse_question_row(row: &sqlx::postgres::PgRow) -> Result<Question, sqlx::Error> {
        let id: i32 = row.try_get("id")?;
        let question: String = row.try_get("question")?;
        let answer: String = row.try_get("answer")?;
        let category: i32 = row.try_get("category")?;
        let difficulty: i32 = row.try_get("difficulty")?;

        Ok(Question::new(
            QuestionId::new(id.into()),
            question,
            answer,
            CategoryId::new(category.into()),
            difficulty,
        ))
    }

    fn parse_category_row(row: &sqlx::postgres::PgRow) -> Result<Category, sqlx::Error> {
        let id: i32 = row.try_get("id")?;
        let kind: String = row.try_get("type")?;
        Ok(Category::new(CategoryId::new(id.into()), kind))
    }

    fn parse_questions(rows: &[sqlx::postgres::PgRow]) -> Result<Vec<Question>, PostgresError> {
        rows.iter()
            .map(Self::parse_question_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostgresError::from)
    }
}

/// Pool statistics for monitoring.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PoolStats {
    /// Current pool size.
    pub size: u32,
    /// Number of idle connections.
    pub idle: usize,
    /// Maximum pool size.
    pub max: u32,
}

/// Error type for PostgreSQL store.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Identifier does not fit the `INTEGER` column.
    #[error("Identifier out of range: {0}")]
    IdOutOfRange(i64),
}

fn to_column_id(id: i64) -> Result<i32, PostgresError> {
    i32::try_from(id).map_err(|_| PostgresError::IdOutOfRange(id))
}

#[async_trait]
impl QuestionStore for PostgresQuestionStore {
    type Error = PostgresError;

    async fn list_questions(&self) -> Result<Vec<Question>, Self::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, question, answer, category, difficulty
            FROM questions
            ORDER BY id
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        Self::parse_questions(&rows)
    }

    async fn list_questions_in_category(
        &self,
        category: CategoryId,
    ) -> Result<Vec<Question>, Self::Error> {
        let Ok(category) = i32::try_from(category.get()) else {
            return Ok(Vec::new());
        };
        let rows = sqlx::query(
            r#"
            SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE category = $1
            ORDER BY id
            "#
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;

        Self::parse_questions(&rows)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, Self::Error> {
        let rows = sqlx::query("SELECT id, type FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(Self::parse_category_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostgresError::from)
    }

    async fn get_category(&self, id: CategoryId) -> Result<Option<Category>, Self::Error> {
        let Ok(id) = i32::try_from(id.get()) else {
            return Ok(None);
        };
        let row = sqlx::query("SELECT id, type FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(Self::parse_category_row(r)?)),
            None => Ok(None),
        }
    }

    async fn create_question(&self, question: NewQuestion) -> Result<Question, Self::Error> {
        let row = sqlx::query(
            r#"
            INSERT INTO questions (question, answer, category, difficulty)
            VALUES ($1, $2, $3, $4)
            RETURNING id, question, answer, category, difficulty
            "#
        )
        .bind(&question.question)
        .bind(&question.answer)
        .bind(to_column_id(question.category.get())?)
        .bind(question.difficulty)
        .fetch_one(&self.pool)
        .await?;

        let created = Self::parse_question_row(&row)?;
        tracing::debug!(question_id = %created.id, "Question inserted");
        Ok(created)
    }

    async fn delete_question(&self, id: QuestionId) -> Result<bool, Self::Error> {
        let Ok(id) = i32::try_from(id.get()) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn search_questions(&self, term: &str) -> Result<Vec<Question>, Self::Error> {
        let pattern = format!("%{}%", escape_like(term));
        let rows = sqlx::query(
            r#"
            SELECT id, question, answer, category, difficulty
            FROM questions
            WHERE question ILIKE $1 ESCAPE '\'
            ORDER BY id
            "#
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Self::parse_questions(&rows)
    }

    async fn count_questions(&self) -> Result<usize, Self::Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as usize)
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}
