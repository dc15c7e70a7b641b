use std::collections::HashSet;

use crate::db::models::Answer;

/// Aggregate over the answers counted toward one teacher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TeacherAnalytics {
    pub(crate) active_students: usize,
    pub(crate) completed_courses: usize,
    pub(crate) average_progress: f64,
}

/// `average_progress` is the mean length (in chars) of the compact JSON of each answer payload
/// per student, rounded half-to-even to two decimals and multiplied by ten. It is a rough proxy
/// kept for client compatibility, not a measure of course completion.
pub(crate) fn summarize<'a>(answers: impl IntoIterator<Item = &'a Answer>) -> TeacherAnalytics {
    let mut students = HashSet::new();
    let mut courses: HashSet<Option<&str>> = HashSet::new();
    let mut total_length = 0usize;

    for answer in answers {
        students.insert(answer.user_id.as_str());
        courses.insert(answer.course_id.as_deref());
        total_length += serialized_length(&answer.answers.0);
    }

    if students.is_empty() {
        return TeacherAnalytics { active_students: 0, completed_courses: 0, average_progress: 0.0 };
    }

    let mean = total_length as f64 / students.len() as f64;
    TeacherAnalytics {
        active_students: students.len(),
        completed_courses: courses.len(),
        average_progress: round_two_places(mean) * 10.0,
    }
}

fn serialized_length(value: &serde_json::Value) -> usize {
    // Value's Display is the compact encoding.
    value.to_string().chars().count()
}

fn round_two_places(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;
    use serde_json::json;
    use sqlx::types::Json;

    fn answer(user_id: &str, course_id: Option<&str>, answers: serde_json::Value) -> Answer {
        let now = primitive_now_utc();
        Answer {
            id: format!("{user_id}-{}", course_id.unwrap_or("none")),
            test_id: "test".to_string(),
            course_id: course_id.map(str::to_string),
            user_course_id: Some("teacher".to_string()),
            user_id: user_id.to_string(),
            answers: Json(answers),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(
            summary,
            TeacherAnalytics { active_students: 0, completed_courses: 0, average_progress: 0.0 }
        );
    }

    #[test]
    fn counts_distinct_students_and_courses() {
        let answers = vec![
            answer("u1", Some("c1"), json!([1])),
            answer("u1", Some("c2"), json!([1])),
            answer("u2", Some("c1"), json!([1])),
        ];
        let summary = summarize(&answers);
        assert_eq!(summary.active_students, 2);
        assert_eq!(summary.completed_courses, 2);
    }

    #[test]
    fn missing_course_counts_as_one_value() {
        let answers = vec![
            answer("u1", None, json!([])),
            answer("u2", None, json!([])),
            answer("u3", Some("c1"), json!([])),
        ];
        assert_eq!(summarize(&answers).completed_courses, 2);
    }

    #[test]
    fn progress_is_mean_serialized_length_times_ten() {
        // ["a","b"] is 9 chars, {"q":1} is 7 chars; 16 chars over 2 students.
        let answers = vec![
            answer("u1", Some("c1"), json!(["a", "b"])),
            answer("u2", Some("c1"), json!({"q": 1})),
        ];
        assert_eq!(summarize(&answers).average_progress, 80.0);
    }

    #[test]
    fn progress_counts_characters_not_bytes() {
        // "é" is one character but two bytes.
        let answers = vec![answer("u1", None, json!("é"))];
        assert_eq!(summarize(&answers).average_progress, 30.0);
    }

    #[test]
    fn rounding_is_half_to_even() {
        assert_eq!(round_two_places(1.0 / 3.0), 0.33);
        assert_eq!(round_two_places(2.0 / 3.0), 0.67);
        assert_eq!(round_two_places(0.125), 0.12);
        assert_eq!(round_two_places(0.375), 0.38);
    }
}
