use sqlx::PgPool;

use crate::db::models::Course;
use crate::db::types::PublishStatus;

const COURSE_COLUMNS: &str =
    "id, title, description, article, video_link, publish, img, files, created_by, created_at";

pub(crate) struct CreateCourse<'a> {
    pub(crate) id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) description: &'a str,
    pub(crate) article: &'a str,
    pub(crate) video_link: Option<&'a str>,
    pub(crate) publish: Option<PublishStatus>,
    pub(crate) img: Option<&'a str>,
    pub(crate) files: &'a str,
    pub(crate) created_by: Option<&'a str>,
    pub(crate) created_at: time::PrimitiveDateTime,
}

/// Title is always written; every other `None` keeps the stored value.
pub(crate) struct UpdateCourse {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) article: Option<String>,
    pub(crate) video_link: Option<String>,
    pub(crate) publish: Option<PublishStatus>,
    pub(crate) img: Option<String>,
    pub(crate) files: Option<String>,
}

pub(crate) async fn create(pool: &PgPool, params: CreateCourse<'_>) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (
            id, title, description, article, video_link, publish, img, files, created_by, created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.article)
    .bind(params.video_link)
    .bind(params.publish)
    .bind(params.img)
    .bind(params.files)
    .bind(params.created_by)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_creator(
    pool: &PgPool,
    created_by: &str,
) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM courses WHERE created_by = $1 ORDER BY created_at, id"
    ))
    .bind(created_by)
    .fetch_all(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    course_id: &str,
    params: UpdateCourse,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE courses SET
            title = $1,
            description = COALESCE($2, description),
            article = COALESCE($3, article),
            video_link = COALESCE($4, video_link),
            publish = COALESCE($5, publish),
            img = COALESCE($6, img),
            files = COALESCE($7, files)
         WHERE id = $8",
    )
    .bind(params.title)
    .bind(params.description)
    .bind(params.article)
    .bind(params.video_link)
    .bind(params.publish)
    .bind(params.img)
    .bind(params.files)
    .bind(course_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Removes the row and hands it back so its media can be cleaned up.
pub(crate) async fn delete(pool: &PgPool, course_id: &str) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "DELETE FROM courses WHERE id = $1 RETURNING {COURSE_COLUMNS}"
    ))
    .bind(course_id)
    .fetch_optional(pool)
    .await
}
