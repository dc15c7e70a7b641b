use std::collections::HashSet;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::auth;
use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::CurrentAdmin;
use crate::api::validation;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{PublishStatus, UserRole};
use crate::repositories;
use crate::schemas::auth::RegisterRequest;
use crate::schemas::user::{
    PendingTeacherResponse, StudentResponse, TeacherAnalyticsResponse, TeacherStatusUpdate,
    UserAnswerEntry, UserAnswersResponse, UserCreatedResponse, UserResponse,
};
use crate::schemas::{non_empty, MessageResponse};
use crate::services::analytics;


pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(add_user))
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/auth", post(auth::authenticate))
        .route("/answers/:id", get(user_answers))
        .route("/setAdmin/:id", get(set_admin))
        .route("/admin/teachers", get(pending_teachers).post(update_teacher_status))
        .route("/teacher/students/:teacher_id", get(students_for_teacher))
        .route("/teacher/analytics/:id", get(teacher_analytics))
        .route("/:id", get(get_user).put(auth::update_user).delete(delete_user))
}

async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(name), Some(email), Some(password), Some(role)) = (
        non_empty(payload.name),
        non_empty(payload.email),
        non_empty(payload.password),
        non_empty(payload.role),
    ) else {
        return Err(ApiError::bad_request("Name, email, password, and role are required"));
    };

    let role = validation::any_role(&role)?;
    let hashed_password = security::hash_password(&password)
        .map_err(|e| ApiError::internal(e, "Failed to add user"))?;

    let user = repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            name: &name,
            email: &email,
            hashed_password,
            role,
            publish: PublishStatus::Yes,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict("Email is already registered".to_string())
        } else {
            ApiError::internal(e, "Failed to add user")
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User added successfully".to_string(),
            user: UserResponse::from_db(&user),
        }),
    ))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = repositories::users::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch users"))?;

    Ok(Json(users.iter().map(UserResponse::from_db).collect()))
}

async fn get_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserResponse::from_db(&user)))
}

async fn delete_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = repositories::users::delete(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;

    if deleted == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(user_id = %user_id, action = "user_delete", "User deleted");
    Ok(Json(MessageResponse::new("User deleted successfully")))
}

/// Answers joined to their test and course titles; dangling references come back as `null`.
async fn user_answers(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<UserAnswersResponse>, ApiError> {
    let rows = repositories::answers::list_with_titles_for_user(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Internal server error"))?;

    Ok(Json(UserAnswersResponse { answers: rows.into_iter().map(UserAnswerEntry::from).collect() }))
}

async fn set_admin(
    Path(user_id): Path<String>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let updated = repositories::users::update(
        state.db(),
        &user_id,
        repositories::users::UpdateUser { role: Some(UserRole::Admin), ..Default::default() },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update user role"))?;

    if updated == 0 {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!(
        user_id = %user_id,
        admin_id = %admin.id,
        action = "user_promote_admin",
        "User promoted to admin"
    );
    Ok(Json(MessageResponse::new("User role updated to admin successfully")))
}

async fn pending_teachers(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingTeacherResponse>>, ApiError> {
    let teachers = repositories::users::list_pending_teachers(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to retrieve teachers"))?;

    if teachers.is_empty() {
        return Err(ApiError::not_found("No teachers found"));
    }

    Ok(Json(teachers.into_iter().map(PendingTeacherResponse::from).collect()))
}

async fn update_teacher_status(
    State(state): State<AppState>,
    payload: Result<Json<TeacherStatusUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;

    let publish = validation::publish_status(payload.publish.as_deref().unwrap_or_default())?;
    let Some(teacher_id) = non_empty(payload.teacher_id) else {
        return Err(ApiError::not_found("Teacher not found"));
    };

    let updated = repositories::users::set_teacher_publish(state.db(), &teacher_id, publish)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update teacher status"))?;

    if updated == 0 {
        return Err(ApiError::not_found("Teacher not found"));
    }

    tracing::info!(
        teacher_id = %teacher_id,
        publish = ?publish,
        action = "teacher_moderation",
        "Teacher status updated"
    );
    Ok(Json(MessageResponse::new("Teacher status updated successfully")))
}

async fn students_for_teacher(
    Path(teacher_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let rows = repositories::answers::list_students_for_teacher(state.db(), &teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to retrieve students"))?;

    let mut seen = HashSet::new();
    let students: Vec<StudentResponse> = rows
        .into_iter()
        .filter(|row| seen.insert(row.id.clone()))
        .map(StudentResponse::from)
        .collect();

    if students.is_empty() {
        return Err(ApiError::not_found("No students found for this teacher"));
    }

    Ok(Json(students))
}

async fn teacher_analytics(
    Path(teacher_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<TeacherAnalyticsResponse>, ApiError> {
    let answers = repositories::answers::list_by_user_course(state.db(), &teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to retrieve teacher analytics"))?;

    let summary = analytics::summarize(&answers);
    Ok(Json(TeacherAnalyticsResponse {
        active_students: summary.active_students,
        completed_courses: summary.completed_courses,
        average_progress: summary.average_progress,
    }))
}
