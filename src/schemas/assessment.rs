use serde::{Deserialize, Serialize};

use crate::core::time::format_primitive;
use crate::db::models::Assessment;

pub(crate) const DEFAULT_TITLE: &str = "Test name";

#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentCreate {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) questions: Option<serde_json::Value>,
}

/// Full replacement body for `PUT /tests/:id`.
#[derive(Debug, Deserialize)]
pub(crate) struct AssessmentUpdate {
    #[serde(default)]
    pub(crate) course_id: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) questions: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerSave {
    #[serde(default)]
    pub(crate) test_id: Option<String>,
    #[serde(default)]
    pub(crate) user_id: Option<String>,
    #[serde(default)]
    pub(crate) course_id: Option<String>,
    #[serde(default)]
    pub(crate) user_course_id: Option<String>,
    #[serde(default)]
    pub(crate) answers: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentResponse {
    pub(crate) id: String,
    pub(crate) course_id: Option<String>,
    pub(crate) title: String,
    pub(crate) questions: serde_json::Value,
    pub(crate) created_at: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct AssessmentUpdatedResponse {
    pub(crate) message: String,
    pub(crate) test: AssessmentResponse,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerSavedResponse {
    pub(crate) message: String,
    pub(crate) id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TestResultResponse {
    pub(crate) id: String,
    pub(crate) test_id: String,
    pub(crate) test_title: String,
    pub(crate) answers: serde_json::Value,
}

impl AssessmentResponse {
    pub(crate) fn from_db(assessment: Assessment) -> Self {
        Self {
            id: assessment.id,
            course_id: assessment.course_id,
            title: assessment.title,
            questions: assessment.questions.0,
            created_at: format_primitive(assessment.created_at),
        }
    }
}
