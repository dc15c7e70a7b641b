use serde::{Deserialize, Serialize};

use crate::db::models::User;
use crate::db::types::{PublishStatus, UserRole};
use crate::schemas::user::UserResponse;

/// Shared by `/users/register` and admin `POST /users`.
#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionUser {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) publish: PublishStatus,
}

#[derive(Debug, Serialize)]
pub(crate) struct LoginResponse {
    pub(crate) message: String,
    pub(crate) user: SessionUser,
    pub(crate) token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AuthResponse {
    pub(crate) user: UserResponse,
}

impl SessionUser {
    pub(crate) fn from_db(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            publish: user.publish,
        }
    }
}
