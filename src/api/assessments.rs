use std::collections::HashMap;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::api::errors::{json_write_error, ApiError};
use crate::api::validation::present_json;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::assessment::{
    AnswerSave, AnswerSavedResponse, AssessmentCreate, AssessmentResponse, AssessmentUpdate,
    AssessmentUpdatedResponse, TestResultResponse, DEFAULT_TITLE,
};
use crate::schemas::{non_empty, CreatedResponse, MessageResponse};


const MISSING_TEST_TITLE: &str = "Test not found";

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tests).post(create_test))
        .route("/save", post(save_answers))
        .route("/course/:id", get(test_for_course))
        .route("/test-results/:userId", get(results_for_user))
        .route("/:id", get(get_test).put(update_test).delete(delete_test))
}

async fn create_test(
    State(state): State<AppState>,
    payload: Result<Json<AssessmentCreate>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(course_id), Some(questions)) =
        (non_empty(payload.course_id), present_json(payload.questions))
    else {
        return Err(ApiError::bad_request("Course ID and questions are required"));
    };
    let title = non_empty(payload.title).unwrap_or_else(|| DEFAULT_TITLE.to_string());

    let test = repositories::assessments::create(
        state.db(),
        repositories::assessments::CreateAssessment {
            id: &Uuid::new_v4().to_string(),
            course_id: &course_id,
            title: &title,
            questions: &questions,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| json_write_error(e, "Failed to add test"))?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse { id: test.id, message: "Test added successfully".to_string() }),
    ))
}

async fn list_tests(
    State(state): State<AppState>,
) -> Result<Json<Vec<AssessmentResponse>>, ApiError> {
    let tests = repositories::assessments::list(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch tests"))?;

    Ok(Json(tests.into_iter().map(AssessmentResponse::from_db).collect()))
}

async fn get_test(
    Path(test_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let test = repositories::assessments::find_by_id(state.db(), &test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch test"))?
        .ok_or_else(|| ApiError::not_found("Test not found"))?;

    Ok(Json(AssessmentResponse::from_db(test)))
}

async fn test_for_course(
    Path(course_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<AssessmentResponse>, ApiError> {
    let test = repositories::assessments::find_first_by_course(state.db(), &course_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch test"))?
        .ok_or_else(|| ApiError::not_found("No test found for this course"))?;

    Ok(Json(AssessmentResponse::from_db(test)))
}

/// Replaces course, title and questions in one write.
async fn update_test(
    Path(test_id): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<AssessmentUpdate>, JsonRejection>,
) -> Result<Json<AssessmentUpdatedResponse>, ApiError> {
    let Json(payload) = payload?;

    let (Some(title), Some(questions)) =
        (non_empty(payload.title), present_json(payload.questions))
    else {
        return Err(ApiError::bad_request("Title and questions are required"));
    };
    let course_id = non_empty(payload.course_id);

    let test = repositories::assessments::replace(
        state.db(),
        &test_id,
        repositories::assessments::ReplaceAssessment {
            course_id: course_id.as_deref(),
            title: &title,
            questions: &questions,
        },
    )
    .await
    .map_err(|e| json_write_error(e, "Failed to update test"))?
    .ok_or_else(|| ApiError::not_found("Test not found"))?;

    Ok(Json(AssessmentUpdatedResponse {
        message: "Test updated successfully".to_string(),
        test: AssessmentResponse::from_db(test),
    }))
}

async fn delete_test(
    Path(test_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<MessageResponse>, ApiError> {
    let deleted = repositories::assessments::delete(state.db(), &test_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete test"))?;

    if deleted == 0 {
        return Err(ApiError::not_found("Test not found"));
    }

    Ok(Json(MessageResponse::new("Test deleted successfully")))
}

async fn save_answers(
    State(state): State<AppState>,
    payload: Result<Json<AnswerSave>, JsonRejection>,
) -> Result<(StatusCode, Json<AnswerSavedResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(test_id), Some(user_id), Some(answers)) = (
        non_empty(payload.test_id),
        non_empty(payload.user_id),
        present_json(payload.answers),
    ) else {
        return Err(ApiError::bad_request("Test ID, user ID, and answers are required"));
    };
    let course_id = non_empty(payload.course_id);
    let user_course_id = non_empty(payload.user_course_id);

    let saved = repositories::answers::upsert(
        state.db(),
        repositories::answers::SaveAnswer {
            id: &Uuid::new_v4().to_string(),
            test_id: &test_id,
            user_id: &user_id,
            course_id: course_id.as_deref(),
            user_course_id: user_course_id.as_deref(),
            answers: &answers,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| json_write_error(e, "Failed to save or update answers"))?;

    let (status, message) = if saved.inserted {
        (StatusCode::CREATED, "Answers saved successfully")
    } else {
        (StatusCode::OK, "Answers updated successfully")
    };

    Ok((status, Json(AnswerSavedResponse { message: message.to_string(), id: saved.id })))
}

/// Two reads joined in memory; answers to deleted tests keep a placeholder title.
async fn results_for_user(
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Vec<TestResultResponse>>, ApiError> {
    let answers = repositories::answers::list_by_user(state.db(), &user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch test results"))?;

    if answers.is_empty() {
        return Err(ApiError::not_found("No test results found for this user"));
    }

    let test_ids: Vec<String> = answers.iter().map(|answer| answer.test_id.clone()).collect();
    let titles: HashMap<String, String> =
        repositories::assessments::find_by_ids(state.db(), &test_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch test results"))?
            .into_iter()
            .map(|test| (test.id, test.title))
            .collect();

    let results = answers
        .into_iter()
        .map(|answer| TestResultResponse {
            test_title: titles
                .get(&answer.test_id)
                .cloned()
                .unwrap_or_else(|| MISSING_TEST_TITLE.to_string()),
            id: answer.id,
            test_id: answer.test_id,
            answers: answer.answers.0,
        })
        .collect();

    Ok(Json(results))
}
