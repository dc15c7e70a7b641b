pub(crate) mod answers;
pub(crate) mod assessments;
pub(crate) mod courses;
pub(crate) mod users;
