//! Typed query options for list and get operations

use std::collections::BTreeSet;

use compact_str::CompactString;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::Params;

/// Course workflow states accepted by `state[]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CourseState {
    Unpublished,
    Available,
    Completed,
    Deleted,
}

/// Enrollment types accepted by `enrollment_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentType {
    Teacher,
    Student,
    Ta,
    Observer,
    Designer,
}

/// Assignment ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderBy {
    Position,
    Name,
    DueAt,
}

/// Assignment due-date buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Past,
    Overdue,
    Undated,
    Ungraded,
    Unsubmitted,
    Upcoming,
    Future,
}

impl CourseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unpublished => "unpublished",
            Self::Available => "available",
            Self::Completed => "completed",
            Self::Deleted => "deleted",
        }
    }
}

impl EnrollmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Ta => "ta",
            Self::Observer => "observer",
            Self::Designer => "designer",
        }
    }
}

impl OrderBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Position => "position",
            Self::Name => "name",
            Self::DueAt => "due_at",
        }
    }
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Past => "past",
            Self::Overdue => "overdue",
            Self::Undated => "undated",
            Self::Ungraded => "ungraded",
            Self::Unsubmitted => "unsubmitted",
            Self::Upcoming => "upcoming",
            Self::Future => "future",
        }
    }
}

/// Page selection shared by every list query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl Paging {
    pub fn is_set(&self) -> bool {
        self.page.is_some() || self.per_page.is_some()
    }

    fn push_into(&self, params: &mut Params) {
        if let Some(page) = self.page {
            params.push(("page".into(), page.to_string()));
        }
        if let Some(per_page) = self.per_page {
            params.push(("per_page".into(), per_page.to_string()));
        }
    }
}

fn push_list<'a>(params: &mut Params, key: &str, values: impl IntoIterator<Item = &'a str>) {
    let key = format!("{key}[]");
    params.extend(values.into_iter().map(|value| (key.clone(), value.to_string())));
}

/// `include[]` values only
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeQuery {
    pub include: BTreeSet<CompactString>,
}

impl IncludeQuery {
    pub fn new<I, S>(include: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self { include: include.into_iter().map(Into::into).collect() }
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_list(&mut params, "include", self.include.iter().map(|s| s.as_str()));
        params
    }
}

/// Options for listing the caller's courses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseListQuery {
    pub enrollment_type: Option<EnrollmentType>,
    pub enrollment_role: Option<CompactString>,
    pub include: BTreeSet<CompactString>,
    pub state: BTreeSet<CourseState>,
    pub paging: Paging,
}

impl CourseListQuery {
    /// Courses that are currently published and open to students
    pub fn active() -> Self {
        Self::default().with_state(CourseState::Available)
    }

    pub fn with_state(mut self, state: CourseState) -> Self {
        self.state.insert(state);
        self
    }

    pub fn with_include(mut self, include: impl Into<CompactString>) -> Self {
        self.include.insert(include.into());
        self
    }

    pub fn with_enrollment_type(mut self, enrollment_type: EnrollmentType) -> Self {
        self.enrollment_type = Some(enrollment_type);
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        if let Some(enrollment_type) = self.enrollment_type {
            params.push(("enrollment_type".into(), enrollment_type.as_str().into()));
        }
        if let Some(role) = &self.enrollment_role {
            params.push(("enrollment_role".into(), role.to_string()));
        }
        push_list(&mut params, "include", self.include.iter().map(|s| s.as_str()));
        push_list(&mut params, "state", self.state.iter().map(|s| s.as_str()));
        self.paging.push_into(&mut params);
        params
    }
}

/// Options for listing the assignments of a course
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentListQuery {
    pub include: BTreeSet<CompactString>,
    pub order_by: Option<OrderBy>,
    pub bucket: Option<Bucket>,
    pub paging: Paging,
}

impl AssignmentListQuery {
    pub fn with_include(mut self, include: impl Into<CompactString>) -> Self {
        self.include.insert(include.into());
        self
    }

    pub fn with_order_by(mut self, order_by: OrderBy) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_bucket(mut self, bucket: Bucket) -> Self {
        self.bucket = Some(bucket);
        self
    }

    pub fn with_paging(mut self, paging: Paging) -> Self {
        self.paging = paging;
        self
    }

    pub fn to_params(&self) -> Params {
        let mut params = Params::new();
        push_list(&mut params, "include", self.include.iter().map(|s| s.as_str()));
        if let Some(order_by) = self.order_by {
            params.push(("order_by".into(), order_by.as_str().into()));
        }
        if let Some(bucket) = self.bucket {
            params.push(("bucket".into(), bucket.as_str().into()));
        }
        self.paging.push_into(&mut params);
        params
    }
}

/// Merge required fields over caller extras.
///
/// With a `wrapper`, required fields land inside `extras[wrapper]` (created
/// when absent); without one they are written at the top level. Required
/// fields always win.
pub(crate) fn merge_required(
    mut extras: Map<String, Value>,
    wrapper: Option<&str>,
    required: Map<String, Value>,
) -> Value {
    match wrapper {
        Some(key) => {
            let mut inner = match extras.remove(key) {
                Some(Value::Object(map)) => map,
                _ => Map::new(),
            };
            inner.extend(required);
            extras.insert(key.to_string(), Value::Object(inner));
        },
        None => extras.extend(required),
    }
    Value::Object(extras)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn pairs(params: &Params) -> Vec<(&str, &str)> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn course_query_repeats_list_keys() {
        let query = CourseListQuery::active()
            .with_include("term")
            .with_include("total_students")
            .with_enrollment_type(EnrollmentType::Student);

        assert_eq!(
            pairs(&query.to_params()),
            vec![
                ("enrollment_type", "student"),
                ("include[]", "term"),
                ("include[]", "total_students"),
                ("state[]", "available"),
            ]
        );
    }

    #[test]
    fn assignment_query_emits_enums_and_paging() {
        let query = AssignmentListQuery::default()
            .with_order_by(OrderBy::DueAt)
            .with_bucket(Bucket::Upcoming)
            .with_paging(Paging { page: Some(1), per_page: Some(1) });

        assert_eq!(
            pairs(&query.to_params()),
            vec![
                ("order_by", "due_at"),
                ("bucket", "upcoming"),
                ("page", "1"),
                ("per_page", "1"),
            ]
        );
    }

    #[test]
    fn required_fields_override_extras() {
        let extras = object(json!({
            "assignment": {"name": "ignored", "submission_types": ["online_upload"]},
            "notify": true
        }));
        let required = object(json!({"name": "Essay 1"}));

        assert_eq!(
            merge_required(extras, Some("assignment"), required),
            json!({
                "assignment": {"name": "Essay 1", "submission_types": ["online_upload"]},
                "notify": true
            })
        );
    }

    #[test]
    fn top_level_merge_without_wrapper() {
        assert_eq!(
            merge_required(Map::new(), None, object(json!({"name": "Week 1"}))),
            json!({"name": "Week 1"})
        );
    }
}
