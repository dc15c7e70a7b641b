use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::api::errors::{is_unique_violation, ApiError};
use crate::api::guards::BearerClaims;
use crate::api::validation;
use crate::core::security;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::db::types::{PublishStatus, UserRole};
use crate::repositories;
use crate::schemas::auth::{AuthResponse, LoginRequest, LoginResponse, RegisterRequest, SessionUser};
use crate::schemas::user::{UserResponse, UserUpdate};
use crate::schemas::{non_empty, MessageResponse};

const EMAIL_TAKEN: &str = "Email is already registered";

pub(crate) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(name), Some(email), Some(password), Some(role)) = (
        non_empty(payload.name),
        non_empty(payload.email),
        non_empty(payload.password),
        non_empty(payload.role),
    ) else {
        return Err(ApiError::bad_request("All fields are required"));
    };

    let role = validation::registration_role(&role)?;

    let existing = repositories::users::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to register user"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(EMAIL_TAKEN.to_string()));
    }

    let hashed_password = security::hash_password(&password)
        .map_err(|e| ApiError::internal(e, "Failed to register user"))?;

    // Teachers wait for moderation before they are visible.
    let publish = if role == UserRole::Teacher { PublishStatus::No } else { PublishStatus::Yes };

    repositories::users::create(
        state.db(),
        repositories::users::CreateUser {
            id: &Uuid::new_v4().to_string(),
            name: &name,
            email: &email,
            hashed_password,
            role,
            publish,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(EMAIL_TAKEN.to_string())
        } else {
            ApiError::internal(e, "Failed to register user")
        }
    })?;

    Ok((StatusCode::CREATED, Json(MessageResponse::new("User registered successfully"))))
}

pub(crate) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;

    let (Some(email), Some(password)) = (non_empty(payload.email), non_empty(payload.password))
    else {
        return Err(ApiError::bad_request("Email and password are required"));
    };

    let user = repositories::users::find_by_email(state.db(), &email)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to log in user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let verified = security::verify_password(&password, &user.hashed_password)
        .map_err(|_| ApiError::Unauthorized("Incorrect email or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect email or password"));
    }

    let token = security::create_access_token(&user.id, user.role, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to log in user"))?;

    repositories::users::store_token(state.db(), &user.id, &token)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to log in user"))?;

    Ok(Json(LoginResponse {
        message: "User logged in successfully".to_string(),
        user: SessionUser::from_db(&user),
        token,
    }))
}

pub(crate) async fn authenticate(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
) -> Result<Json<AuthResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), &claims.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(AuthResponse { user: UserResponse::from_db(&user) }))
}

pub(crate) async fn update_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(payload) = payload?;

    let user = repositories::users::find_by_id(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Internal server error"))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let hashed_password = match non_empty(payload.password) {
        Some(password) => Some(
            security::hash_password(&password)
                .map_err(|e| ApiError::internal(e, "Internal server error"))?,
        ),
        None => None,
    };

    // Only teachers carry a moderation status that users may change.
    let publish = match non_empty(payload.publish) {
        Some(value) if user.role == UserRole::Teacher => Some(validation::publish_status(&value)?),
        _ => None,
    };

    repositories::users::update(
        state.db(),
        &user.id,
        repositories::users::UpdateUser {
            name: non_empty(payload.name),
            email: non_empty(payload.email),
            hashed_password,
            role: None,
            publish,
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::Conflict(EMAIL_TAKEN.to_string())
        } else {
            ApiError::internal(e, "Internal server error")
        }
    })?;

    Ok(Json(MessageResponse::new("User updated successfully")))
}
