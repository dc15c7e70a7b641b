use sqlx::types::Json;
use sqlx::PgPool;

use crate::db::models::Answer;

const COLUMNS: &str =
    "id, test_id, course_id, user_course_id, user_id, answers, created_at, updated_at";

pub(crate) struct SaveAnswer<'a> {
    pub(crate) id: &'a str,
    pub(crate) test_id: &'a str,
    pub(crate) user_id: &'a str,
    pub(crate) course_id: Option<&'a str>,
    pub(crate) user_course_id: Option<&'a str>,
    pub(crate) answers: &'a serde_json::Value,
    pub(crate) now: time::PrimitiveDateTime,
}

/// Outcome of an upsert: the row id and whether the row was freshly inserted.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SavedAnswer {
    pub(crate) id: String,
    pub(crate) inserted: bool,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct StudentRow {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserAnswerRow {
    pub(crate) answer_id: String,
    pub(crate) answers: Json<serde_json::Value>,
    pub(crate) test_title: Option<String>,
    pub(crate) course_title: Option<String>,
}

/// Inserts the answer or overwrites the existing one for the same (test, user) pair in a
/// single statement. `params.id` is only used on insert.
pub(crate) async fn upsert(
    pool: &PgPool,
    params: SaveAnswer<'_>,
) -> Result<SavedAnswer, sqlx::Error> {
    sqlx::query_as::<_, SavedAnswer>(
        "INSERT INTO answers (
            id, test_id, course_id, user_course_id, user_id, answers, created_at, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$7)
         ON CONFLICT ON CONSTRAINT answers_test_user_key DO UPDATE SET
            answers = EXCLUDED.answers,
            course_id = EXCLUDED.course_id,
            user_course_id = EXCLUDED.user_course_id,
            updated_at = EXCLUDED.updated_at
         RETURNING id, (xmax = 0) AS inserted",
    )
    .bind(params.id)
    .bind(params.test_id)
    .bind(params.course_id)
    .bind(params.user_course_id)
    .bind(params.user_id)
    .bind(Json(params.answers))
    .bind(params.now)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_by_user(pool: &PgPool, user_id: &str) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        "SELECT {COLUMNS} FROM answers WHERE user_id = $1 ORDER BY created_at, id"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_user_course(
    pool: &PgPool,
    user_course_id: &str,
) -> Result<Vec<Answer>, sqlx::Error> {
    sqlx::query_as::<_, Answer>(&format!(
        "SELECT {COLUMNS} FROM answers WHERE user_course_id = $1 ORDER BY created_at, id"
    ))
    .bind(user_course_id)
    .fetch_all(pool)
    .await
}

/// Users behind every answer counted toward a teacher, one row per answer. Answers whose user
/// no longer exists drop out of the join.
pub(crate) async fn list_students_for_teacher(
    pool: &PgPool,
    teacher_id: &str,
) -> Result<Vec<StudentRow>, sqlx::Error> {
    sqlx::query_as::<_, StudentRow>(
        "SELECT u.id, u.name, u.email
         FROM answers a
         JOIN users u ON u.id = a.user_id
         WHERE a.user_course_id = $1
         ORDER BY a.created_at, a.id",
    )
    .bind(teacher_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_with_titles_for_user(
    pool: &PgPool,
    user_id: &str,
) -> Result<Vec<UserAnswerRow>, sqlx::Error> {
    sqlx::query_as::<_, UserAnswerRow>(
        "SELECT a.id AS answer_id, a.answers, t.title AS test_title, c.title AS course_title
         FROM answers a
         LEFT JOIN tests t ON t.id = a.test_id
         LEFT JOIN courses c ON c.id = t.course_id
         WHERE a.user_id = $1
         ORDER BY a.created_at, a.id",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
