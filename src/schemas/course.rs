use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::Course;
use crate::db::types::PublishStatus;
use crate::services::media::Upload;

/// Fields collected from a course multipart body. Text values are trimmed; blank ones are `None`.
#[derive(Debug, Default)]
pub(crate) struct CourseForm {
    pub(crate) id: Option<String>,
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) article: Option<String>,
    pub(crate) video_link: Option<String>,
    pub(crate) created_by: Option<String>,
    pub(crate) publish: Option<String>,
    pub(crate) img: Option<Upload>,
    pub(crate) files: Vec<Upload>,
}

#[derive(Debug, Serialize)]
pub(crate) struct CourseResponse {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) article: String,
    pub(crate) video_link: Option<String>,
    pub(crate) publish: Option<PublishStatus>,
    pub(crate) img: Option<String>,
    pub(crate) files: String,
    pub(crate) created_by: Option<String>,
    pub(crate) created_at: String,
}

impl CourseResponse {
    pub(crate) fn from_db(course: Course) -> Self {
        Self {
            id: course.id,
            title: course.title,
            description: course.description,
            article: course.article,
            video_link: course.video_link,
            publish: course.publish,
            img: course.img,
            files: course.files,
            created_by: course.created_by,
            created_at: format_primitive(course.created_at),
        }
    }
}
