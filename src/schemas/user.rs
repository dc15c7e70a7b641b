use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::User;
use crate::db::types::{PublishStatus, UserRole};
use crate::repositories::answers::{StudentRow, UserAnswerRow};
use crate::repositories::users::PendingTeacher;

#[derive(Debug, Deserialize)]
pub(crate) struct UserUpdate {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) password: Option<String>,
    #[serde(default)]
    pub(crate) publish: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeacherStatusUpdate {
    #[serde(default, rename = "teacherId")]
    pub(crate) teacher_id: Option<String>,
    #[serde(default)]
    pub(crate) publish: Option<String>,
}

/// Public view of a user; the password hash and session token never leave the server.
#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) role: UserRole,
    pub(crate) publish: PublishStatus,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserCreatedResponse {
    pub(crate) message: String,
    pub(crate) user: UserResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct PendingTeacherResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) name: String,
    pub(crate) email: String,
}

#[derive(Debug, Serialize, PartialEq)]
pub(crate) struct TeacherAnalyticsResponse {
    pub(crate) active_students: usize,
    pub(crate) completed_courses: usize,
    pub(crate) average_progress: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserAnswerEntry {
    pub(crate) answer_id: String,
    pub(crate) answers: serde_json::Value,
    pub(crate) test_title: Option<String>,
    pub(crate) course_title: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserAnswersResponse {
    pub(crate) answers: Vec<UserAnswerEntry>,
}

impl UserResponse {
    pub(crate) fn from_db(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            publish: user.publish,
            created_at: format_primitive(user.created_at),
        }
    }
}

impl From<PendingTeacher> for PendingTeacherResponse {
    fn from(row: PendingTeacher) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            created_at: format_primitive(row.created_at),
        }
    }
}

impl From<StudentRow> for StudentResponse {
    fn from(row: StudentRow) -> Self {
        Self { id: row.id, name: row.name, email: row.email }
    }
}

impl From<UserAnswerRow> for UserAnswerEntry {
    fn from(row: UserAnswerRow) -> Self {
        Self {
            answer_id: row.answer_id,
            answers: row.answers.0,
            test_title: row.test_title,
            course_title: row.course_title,
        }
    }
}
