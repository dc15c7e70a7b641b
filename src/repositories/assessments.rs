use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Assessment;

const COLUMNS: &str = "id, course_id, title, questions, created_at";

pub(crate) struct CreateAssessment<'a> {
    pub(crate) id: &'a str,
    pub(crate) course_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) questions: &'a serde_json::Value,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) struct ReplaceAssessment<'a> {
    pub(crate) course_id: Option<&'a str>,
    pub(crate) title: &'a str,
    pub(crate) questions: &'a serde_json::Value,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateAssessment<'_>,
) -> Result<Assessment, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "INSERT INTO tests (id, course_id, title, questions, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(Json(params.questions))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!("SELECT {COLUMNS} FROM tests ORDER BY created_at, id"))
        .fetch_all(pool)
        .await
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!("SELECT {COLUMNS} FROM tests WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_ids(
    pool: &PgPool,
    ids: &[String],
) -> Result<Vec<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!("SELECT {COLUMNS} FROM tests WHERE id = ANY($1)"))
        .bind(ids)
        .fetch_all(pool)
        .await
}

/// Oldest test attached to the course.
pub(crate) async fn find_first_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "SELECT {COLUMNS} FROM tests WHERE course_id = $1 ORDER BY created_at, id LIMIT 1"
    ))
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn replace(
    pool: &PgPool,
    id: &str,
    params: ReplaceAssessment<'_>,
) -> Result<Option<Assessment>, sqlx::Error> {
    sqlx::query_as::<_, Assessment>(&format!(
        "UPDATE tests SET course_id = $1, title = $2, questions = $3
         WHERE id = $4
         RETURNING {COLUMNS}",
    ))
    .bind(params.course_id)
    .bind(params.title)
    .bind(Json(params.questions))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM tests WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}
