//! Due-date helpers shared by the CLI and the MCP tools

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    client::{CanvasClient, Result},
    id::ItemId,
    resources::{AssignmentListQuery, CourseListQuery, IncludeQuery},
};

/// Parse a Canvas timestamp such as `2024-03-28T23:59:59Z`
pub fn parse_due_at(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|due| due.with_timezone(&Utc))
}

/// `Mar 28, 2024 at 11:59 PM`; unparseable input is echoed back
pub fn format_due_date(value: Option<&str>) -> String {
    match value {
        None | Some("") => "No due date".to_string(),
        Some(raw) => parse_due_at(raw)
            .map(|due| due.format("%b %d, %Y at %I:%M %p").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

pub fn due_at(assignment: &Value) -> Option<DateTime<Utc>> {
    assignment
        .get("due_at")
        .and_then(Value::as_str)
        .and_then(parse_due_at)
}

/// Display name of a course, falling back to its code
pub fn course_name(course: &Value) -> String {
    ["name", "course_name", "course_code"]
        .iter()
        .find_map(|key| course.get(key).and_then(Value::as_str))
        .unwrap_or("Unknown Course")
        .to_string()
}

pub fn submission_status(assignment: &Value) -> &'static str {
    let Some(submission) = assignment.get("submission").filter(|s| s.is_object()) else {
        return "Not submitted";
    };
    let present = |key: &str| submission.get(key).is_some_and(|v| !v.is_null());

    if present("graded_at") {
        "Graded"
    } else if present("submitted_at") {
        "Submitted"
    } else {
        "Not submitted"
    }
}

/// Tag an assignment with the course it belongs to
pub fn annotate(assignment: &mut Value, course_name: &str, course_id: &ItemId) {
    if let Value::Object(map) = assignment {
        map.insert("course_name".into(), json!(course_name));
        map.insert("course_id".into(), json!(course_id.as_str()));
    }
}

/// Split assignments into those with a due date, soonest first, and a count
/// of the ones without
pub fn split_by_due_date(assignments: Vec<Value>) -> (Vec<Value>, usize) {
    let (mut dated, undated): (Vec<Value>, Vec<Value>) = assignments
        .into_iter()
        .partition(|assignment| assignment.get("due_at").is_some_and(|due| !due.is_null()));

    dated.sort_by_key(due_at);
    (dated, undated.len())
}

/// Assignment include set used by every due-date view
pub fn due_date_query() -> AssignmentListQuery {
    AssignmentListQuery::default()
        .with_include("due_at")
        .with_include("submission")
}

/// The named course, or every active course when `course_id` is `None`
pub async fn courses_for(client: &CanvasClient, course_id: Option<ItemId>) -> Result<Vec<Value>> {
    match course_id {
        Some(course_id) => Ok(vec![
            client.courses.get(course_id, &IncludeQuery::default()).await?,
        ]),
        None => client.courses.list(&CourseListQuery::active()).try_collect().await,
    }
}

/// Assignments due strictly after `now`, soonest first
pub async fn upcoming_assignments(
    client: &CanvasClient,
    course_id: Option<ItemId>,
    now: DateTime<Utc>,
) -> Result<Vec<Value>> {
    collect_due(client, course_id, &due_date_query(), |due| due > now).await
}

/// Assignments due within `[start, end]`, soonest first
pub async fn assignments_between(
    client: &CanvasClient,
    course_id: Option<ItemId>,
    query: &AssignmentListQuery,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Value>> {
    collect_due(client, course_id, query, |due| due >= start && due <= end).await
}

async fn collect_due(
    client: &CanvasClient,
    course_id: Option<ItemId>,
    query: &AssignmentListQuery,
    keep: impl Fn(DateTime<Utc>) -> bool,
) -> Result<Vec<Value>> {
    let mut matched = Vec::new();

    for course in courses_for(client, course_id).await? {
        let Some(id) = course.get("id").map(ItemId::from) else {
            debug!(course = %course_name(&course), "Skipping course without id");
            continue;
        };
        let name = course_name(&course);

        let mut assignments = client.assignments.list(id.clone(), query);
        while let Some(mut assignment) = assignments.try_next().await? {
            if due_at(&assignment).is_some_and(&keep) {
                annotate(&mut assignment, &name, &id);
                matched.push(assignment);
            }
        }
    }

    matched.sort_by_key(due_at);
    Ok(matched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_canvas_timestamps() {
        assert_eq!(
            format_due_date(Some("2024-03-28T23:59:59Z")),
            "Mar 28, 2024 at 11:59 PM"
        );
        assert_eq!(format_due_date(None), "No due date");
        assert_eq!(format_due_date(Some("next tuesday")), "next tuesday");
    }

    #[test]
    fn course_name_falls_back_to_code() {
        assert_eq!(course_name(&json!({"name": "Biology"})), "Biology");
        assert_eq!(course_name(&json!({"course_code": "BIO101"})), "BIO101");
        assert_eq!(course_name(&json!({})), "Unknown Course");
    }

    #[test]
    fn submission_status_prefers_graded() {
        assert_eq!(submission_status(&json!({})), "Not submitted");
        assert_eq!(
            submission_status(&json!({"submission": {"submitted_at": "2024-03-01T00:00:00Z"}})),
            "Submitted"
        );
        assert_eq!(
            submission_status(&json!({"submission": {
                "submitted_at": "2024-03-01T00:00:00Z",
                "graded_at": "2024-03-02T00:00:00Z"
            }})),
            "Graded"
        );
    }

    #[test]
    fn split_sorts_dated_and_counts_undated() {
        let (dated, undated) = split_by_due_date(vec![
            json!({"name": "Final", "due_at": "2024-05-01T12:00:00Z"}),
            json!({"name": "Reading", "due_at": null}),
            json!({"name": "Quiz", "due_at": "2024-02-01T12:00:00Z"}),
            json!({"name": "Participation"}),
        ]);

        let names: Vec<&str> = dated.iter().map(|a| a["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Quiz", "Final"]);
        assert_eq!(undated, 2);
    }

    #[test]
    fn annotate_adds_course_fields() {
        let mut assignment = json!({"id": 1, "name": "Essay"});
        annotate(&mut assignment, "Biology", &ItemId::new("456"));
        assert_eq!(assignment["course_name"], "Biology");
        assert_eq!(assignment["course_id"], "456");
    }
}
