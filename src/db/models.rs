use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

use crate::db::types::{PublishStatus, UserRole};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct User {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) hashed_password: String,
    pub(crate) role: UserRole,
    pub(crate) publish: PublishStatus,
    pub(crate) token: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Course {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) article: String,
    pub(crate) video_link: Option<String>,
    pub(crate) publish: Option<PublishStatus>,
    pub(crate) img: Option<String>,
    /// Comma-joined attachment filenames, empty when there are none.
    pub(crate) files: String,
    pub(crate) created_by: Option<String>,
    pub(crate) created_at: PrimitiveDateTime,
}

/// A row of the `tests` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Assessment {
    pub(crate) id: String,
    pub(crate) course_id: Option<String>,
    pub(crate) title: String,
    pub(crate) questions: Json<serde_json::Value>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Answer {
    pub(crate) id: String,
    pub(crate) test_id: String,
    pub(crate) course_id: Option<String>,
    pub(crate) user_course_id: Option<String>,
    pub(crate) user_id: String,
    pub(crate) answers: Json<serde_json::Value>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl Course {
    pub(crate) fn attachment_names(&self) -> impl Iterator<Item = &str> {
        self.files.split(',').map(str::trim).filter(|name| !name.is_empty())
    }
}
