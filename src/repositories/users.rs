use sqlx::PgPool;

use crate::db::models::User;
use crate::db::types::{PublishStatus, UserRole};

const COLUMNS: &str = "id, name, email, hashed_password, role, publish, token, created_at";

/// Row shape for moderation listings.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct PendingTeacher {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) created_at: time::PrimitiveDateTime,
}

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users ORDER BY created_at, id"))
        .fetch_all(pool)
        .await
}

pub(crate) struct CreateUser<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub hashed_password: String,
    pub role: UserRole,
    pub publish: PublishStatus,
    pub created_at: time::PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (id, name, email, hashed_password, role, publish, created_at)
         VALUES ($1,$2,$3,$4,$5,$6,$7)
         RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.publish)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

/// `None` fields keep the stored value.
#[derive(Debug, Default)]
pub(crate) struct UpdateUser {
    pub name: Option<String>,
    pub email: Option<String>,
    pub hashed_password: Option<String>,
    pub role: Option<UserRole>,
    pub publish: Option<PublishStatus>,
}

pub(crate) async fn update(
    pool: &PgPool,
    id: &str,
    params: UpdateUser,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET
            name = COALESCE($1, name),
            email = COALESCE($2, email),
            hashed_password = COALESCE($3, hashed_password),
            role = COALESCE($4, role),
            publish = COALESCE($5, publish)
         WHERE id = $6",
    )
    .bind(params.name)
    .bind(params.email)
    .bind(params.hashed_password)
    .bind(params.role)
    .bind(params.publish)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub(crate) async fn store_token(pool: &PgPool, id: &str, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET token = $1 WHERE id = $2")
        .bind(token)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}

pub(crate) async fn list_pending_teachers(
    pool: &PgPool,
) -> Result<Vec<PendingTeacher>, sqlx::Error> {
    sqlx::query_as::<_, PendingTeacher>(
        "SELECT id, name, email, created_at FROM users
         WHERE role = $1 AND publish = $2
         ORDER BY created_at, id",
    )
    .bind(UserRole::Teacher)
    .bind(PublishStatus::No)
    .fetch_all(pool)
    .await
}

/// Only rows with the teacher role are touched.
pub(crate) async fn set_teacher_publish(
    pool: &PgPool,
    teacher_id: &str,
    publish: PublishStatus,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("UPDATE users SET publish = $1 WHERE id = $2 AND role = $3")
        .bind(publish)
        .bind(teacher_id)
        .bind(UserRole::Teacher)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}
