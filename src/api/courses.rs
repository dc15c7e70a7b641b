use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::ApiError;
use crate::api::validation;
use crate::core::config::Settings;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::PublishStatus;
use crate::repositories;
use crate::schemas::course::{CourseForm, CourseResponse};
use crate::schemas::{CreatedResponse, MessageResponse};
use crate::services::media::{MediaError, Upload};

#[cfg(test)]
mod tests;

/// Room for the text fields around the files.
const FORM_OVERHEAD_BYTES: u64 = 1024 * 1024;

pub(crate) fn router(settings: &Settings) -> Router<AppState> {
    let storage = settings.storage();
    let body_limit = storage.max_upload_bytes() * (storage.max_attachments as u64 + 1)
        + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/teacher/:id", get(teacher_courses))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
        .layer(DefaultBodyLimit::max(usize::try_from(body_limit).unwrap_or(usize::MAX)))
}

async fn create_course(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let form = read_course_form(multipart?, state.settings()).await?;

    let Some(title) = form.title.as_deref() else {
        return Err(ApiError::bad_request("Title is required"));
    };
    let publish = parse_publish(form.publish.as_deref())?;
    check_cover(&state, form.img.as_ref())?;

    let stored = state
        .media()
        .store(form.img.as_ref(), &form.files)
        .await
        .map_err(|e| ApiError::internal(e, "File upload failed"))?;

    let files = stored.joined_files();
    let created = repositories::courses::create(
        state.db(),
        repositories::courses::CreateCourse {
            id: &Uuid::new_v4().to_string(),
            title,
            description: form.description.as_deref().unwrap_or_default(),
            article: form.article.as_deref().unwrap_or_default(),
            video_link: form.video_link.as_deref(),
            publish,
            img: stored.img.as_deref(),
            files: &files,
            created_by: form.created_by.as_deref(),
            created_at: primitive_now_utc(),
        },
    )
    .await;

    let course = match created {
        Ok(course) => course,
        Err(err) => {
            state.media().discard(&stored).await;
            return Err(ApiError::internal(err, "Failed to add course"));
        }
    };

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: course.id, message: "Course added successfully".to_string() }),
    ))
}

/// The record to update is named by the `_id` form field.
async fn update_course(
    Path(_path_id): Path<String>,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let form = read_course_form(multipart?, state.settings()).await?;

    let (Some(course_id), Some(title)) = (form.id.clone(), form.title.clone()) else {
        return Err(ApiError::bad_request("ID and title are required"));
    };
    let publish = parse_publish(form.publish.as_deref())?;
    check_cover(&state, form.img.as_ref())?;

    let existing = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update course"))?;
    if existing.is_none() {
        return Err(ApiError::not_found("Course not found"));
    }

    let stored = state
        .media()
        .store(form.img.as_ref(), &form.files)
        .await
        .map_err(|e| ApiError::internal(e, "File upload failed"))?;

    let files = (!stored.files.is_empty()).then(|| stored.joined_files());
    let updated = repositories::courses::update(
        state.db(),
        &course_id,
        repositories::courses::UpdateCourse {
            title,
            description: form.description,
            article: form.article,
            video_link: form.video_link,
            publish,
            img: stored.img.clone(),
            files,
        },
    )
    .await;

    match updated {
        Ok(0) => {
            state.media().discard(&stored).await;
            Err(ApiError::not_found("Course not found"))
        }
        Ok(_) => Ok(Json(MessageResponse::new("Course updated successfully"))),
        Err(err) => {
            state.media().discard(&stored).await;
            Err(ApiError::internal(err, "Failed to update course"))
        }
    }
}

async fn delete_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let course = repositories::courses::delete(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete course"))?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    state.media().remove_course_media(course.img.as_deref(), course.attachment_names()).await;

    tracing::info!(course_id = %course.id, action = "course_delete", "Course deleted");
    Ok(Json(MessageResponse::new("Course deleted successfully along with associated files")))
}

async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch courses"))?;

    if courses.is_empty() {
        return Err(ApiError::not_found("No courses found"));
    }

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

async fn get_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<CourseResponse>, ApiError> {
    let course = repositories::courses::find_by_id(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch course"))?
        .ok_or_else(|| ApiError::not_found("Course not found"))?;

    Ok(Json(CourseResponse::from_db(course)))
}

async fn teacher_courses(
    Path(teacher_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseResponse>>, ApiError> {
    let courses = repositories::courses::list_by_creator(state.db(), &teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch courses"))?;

    if courses.is_empty() {
        return Err(ApiError::not_found("No courses found for this teacher"));
    }

    Ok(Json(courses.into_iter().map(CourseResponse::from_db).collect()))
}

fn parse_publish(value: Option<&str>) -> Result<Option<PublishStatus>, ApiError> {
    value.map(validation::publish_status).transpose()
}

fn check_cover(state: &AppState, img: Option<&Upload>) -> Result<(), ApiError> {
    let Some(img) = img else {
        return Ok(());
    };

    match state.media().check_cover(&img.bytes) {
        Ok(()) => Ok(()),
        Err(err @ MediaError::CoverTooNarrow(_)) => Err(ApiError::bad_request(err.to_string())),
        Err(err) => Err(ApiError::internal(err, "Image validation failed")),
    }
}

/// Buffers the multipart body. Files stay in memory until every field has been validated.
async fn read_course_form(
    mut multipart: Multipart,
    settings: &Settings,
) -> Result<CourseForm, ApiError> {
    let storage = settings.storage();
    let max_bytes = storage.max_upload_bytes();
    let mut form = CourseForm::default();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::bad_request("Invalid multipart data"))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "img" | "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let mut bytes = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|_| ApiError::bad_request("Failed to read file"))?
                {
                    if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                        return Err(ApiError::bad_request(format!(
                            "File size exceeds {}MB limit",
                            storage.max_upload_size_mb
                        )));
                    }
                    bytes.extend_from_slice(&chunk);
                }

                // Browsers send an empty part for an untouched file input.
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                let upload = Upload { file_name, bytes: bytes.into() };

                if name == "img" {
                    if form.img.is_some() {
                        return Err(ApiError::bad_request("Only one cover image is allowed"));
                    }
                    form.img = Some(upload);
                } else {
                    if form.files.len() >= storage.max_attachments {
                        return Err(ApiError::bad_request(format!(
                            "At most {} files are allowed",
                            storage.max_attachments
                        )));
                    }
                    form.files.push(upload);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|_| ApiError::bad_request("Invalid multipart data"))?;
                let value = Some(value.trim().to_string()).filter(|item| !item.is_empty());

                match name.as_str() {
                    "_id" => form.id = value,
                    "title" => form.title = value,
                    "description" => form.description = value,
                    "article" => form.article = value,
                    "videoLink" => form.video_link = value,
                    "createdBy" => form.created_by = value,
                    "publish" => form.publish = value,
                    _ => {}
                }
            }
        }
    }

    Ok(form)
}
