use crate::api::errors::ApiError;
use crate::db::types::{PublishStatus, UserRole};

pub(crate) fn registration_role(value: &str) -> Result<UserRole, ApiError> {
    match UserRole::parse(value) {
        Some(role @ (UserRole::User | UserRole::Teacher)) => Ok(role),
        _ => Err(ApiError::bad_request("Invalid role. Role must be \"user\" or \"teacher\".")),
    }
}

pub(crate) fn any_role(value: &str) -> Result<UserRole, ApiError> {
    UserRole::parse(value).ok_or_else(|| {
        ApiError::bad_request("Invalid role. Role must be \"user\", \"teacher\" or \"admin\".")
    })
}

pub(crate) fn publish_status(value: &str) -> Result<PublishStatus, ApiError> {
    PublishStatus::parse(value).ok_or_else(|| ApiError::bad_request("Invalid publish status"))
}

/// Absent or JSON `null` payloads both count as missing.
pub(crate) fn present_json(value: Option<serde_json::Value>) -> Option<serde_json::Value> {
    value.filter(|item| !item.is_null())
}
