//! Resource facades over the REST API
//!
//! Each facade maps a handful of domain verbs onto endpoint templates and
//! leaves transport, pagination and error handling to
//! [`CanvasApi`](crate::client::CanvasApi).

pub mod assignments;
pub mod courses;
pub mod files;
pub mod modules;
pub mod query;
pub mod users;

pub use assignments::Assignments;
pub use courses::Courses;
pub use files::Files;
pub use modules::Modules;
pub use query::{
    AssignmentListQuery, Bucket, CourseListQuery, CourseState, EnrollmentType, IncludeQuery,
    OrderBy, Paging,
};
pub use users::Users;

use serde_json::{Map, Value};

use crate::client::Body;

/// Field bag for create/update bodies
pub type Fields = Map<String, Value>;

/// Empty responses become `null`
pub(crate) fn or_null(body: Option<Value>) -> Value {
    body.unwrap_or(Value::Null)
}

pub(crate) fn json_body(value: Value) -> Option<Body> {
    Some(Body::Json(value))
}

pub(crate) fn fields_body(fields: Fields) -> Option<Body> {
    json_body(Value::Object(fields))
}
