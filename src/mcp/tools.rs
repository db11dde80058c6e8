//! Tool implementations behind the MCP server.
//!
//! Remote failures never escape a tool: single-object tools answer
//! `{"error": ...}` and list tools `[{"error": ...}]`. Malformed dates are
//! the caller's mistake and are returned as errors instead.

use std::sync::Arc;

use chrono::{Duration, Local, Utc};
use futures::TryStreamExt;
use serde_json::{Value, json};
use tracing::{instrument, warn};

use super::dates::date_range;
use crate::{
    client::{CanvasClient, Result},
    id::ItemId,
    planner::{self, annotate, course_name},
    resources::{AssignmentListQuery, Bucket, CourseListQuery, IncludeQuery, OrderBy, Paging},
};

#[derive(Debug, Clone)]
pub struct CanvasTools {
    client: Arc<CanvasClient>,
}

impl CanvasTools {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { client }
    }

    /// Today's date as `YYYY-MM-DD`
    pub fn get_current_date(&self) -> String {
        Local::now().format("%Y-%m-%d").to_string()
    }

    #[instrument(skip(self))]
    pub async fn get_course_info(&self, course_id: &str) -> Value {
        object_or_error(
            self.client
                .courses
                .get(course_id, &IncludeQuery::default())
                .await,
        )
    }

    /// Active courses; one page when `paging` is set, all of them otherwise
    #[instrument(skip(self))]
    pub async fn list_active_courses(&self, paging: Paging) -> Value {
        let query = CourseListQuery::active().with_paging(paging);
        let courses = if paging.is_set() {
            self.client.courses.list_page(&query).await.map(|page| page.items)
        } else {
            self.client.courses.list(&query).try_collect().await
        };
        list_or_error(courses)
    }

    #[instrument(skip(self))]
    pub async fn get_course_assignments(
        &self,
        course_id: &str,
        paging: Paging,
        order_by: Option<OrderBy>,
        bucket: Option<Bucket>,
    ) -> Value {
        let mut query = planner::due_date_query().with_paging(paging);
        query.order_by = order_by;
        query.bucket = bucket;

        let assignments = if paging.is_set() {
            self.client
                .assignments
                .list_page(course_id, &query)
                .await
                .map(|page| page.items)
        } else {
            self.client.assignments.list(course_id, &query).try_collect().await
        };
        list_or_error(assignments)
    }

    /// The soonest upcoming assignment of a course
    #[instrument(skip(self))]
    pub async fn get_next_assignment(&self, course_id: &str) -> Value {
        let query = planner::due_date_query()
            .with_paging(Paging { page: Some(1), per_page: Some(1) })
            .with_order_by(OrderBy::DueAt)
            .with_bucket(Bucket::Upcoming);

        object_or_error(self.next_assignment(course_id, &query).await)
    }

    async fn next_assignment(&self, course_id: &str, query: &AssignmentListQuery) -> Result<Value> {
        let page = self.client.assignments.list_page(course_id, query).await?;
        let Some(mut assignment) = page.items.into_iter().next() else {
            return Ok(json!({"message": "No upcoming assignments"}));
        };

        let course = self
            .client
            .courses
            .get(course_id, &IncludeQuery::default())
            .await?;
        annotate(&mut assignment, &course_name(&course), &ItemId::from(course_id));
        Ok(assignment)
    }

    /// Upcoming assignments due in the next seven days
    #[instrument(skip(self))]
    pub async fn get_assignments_due_this_week(&self, course_id: Option<&str>) -> Value {
        let now = Utc::now();
        let query = planner::due_date_query().with_bucket(Bucket::Upcoming);
        list_or_error(
            planner::assignments_between(
                &self.client,
                course_id.map(ItemId::from),
                &query,
                now,
                now + Duration::days(7),
            )
            .await,
        )
    }

    #[instrument(skip(self))]
    pub async fn get_upcoming_assignments(&self, course_id: Option<&str>) -> Value {
        list_or_error(
            planner::upcoming_assignments(&self.client, course_id.map(ItemId::from), Utc::now())
                .await,
        )
    }

    /// Assignments due between two `YYYY-MM-DD` dates, both inclusive.
    ///
    /// Date validation failures are returned as `Err`; everything else is
    /// folded into the result value.
    #[instrument(skip(self))]
    pub async fn get_assignments_by_date_range(
        &self,
        start_date: &str,
        end_date: &str,
        course_id: Option<&str>,
    ) -> Result<Value> {
        let (start, end) = date_range(start_date, end_date)?;

        Ok(list_or_error(
            planner::assignments_between(
                &self.client,
                course_id.map(ItemId::from),
                &planner::due_date_query(),
                start,
                end,
            )
            .await,
        ))
    }

    /// Prompt text asking for a summary of one course
    #[instrument(skip(self))]
    pub async fn course_summary_prompt(&self, course_id: &str) -> String {
        let course = self.get_course_info(course_id).await;
        if let Some(error) = course.get("error") {
            return format!("Error: {}", error.as_str().unwrap_or_default());
        }

        let assignments = self
            .get_course_assignments(course_id, Paging::default(), None, None)
            .await;

        let text = |value: &Value, key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or("Unknown")
                .to_string()
        };
        let term = course
            .get("term")
            .map(|term| text(term, "name"))
            .unwrap_or_else(|| "Unknown".to_string());

        let mut prompt = format!(
            "Please provide a summary of the course '{}':\n\n\
             Course Information:\n\
             - Name: {}\n\
             - Code: {}\n\
             - Term: {}\n\n\
             Assignments:\n",
            course_name(&course),
            text(&course, "name"),
            text(&course, "course_code"),
            term,
        );

        for assignment in assignments.as_array().into_iter().flatten() {
            if assignment.get("error").is_some() {
                continue;
            }
            let due = assignment
                .get("due_at")
                .and_then(Value::as_str)
                .unwrap_or("No due date");
            prompt.push_str(&format!("- {} (Due: {})\n", text(assignment, "name"), due));
        }

        prompt
    }
}

fn object_or_error(result: Result<Value>) -> Value {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "Tool call failed");
        json!({"error": e.to_string()})
    })
}

fn list_or_error(result: Result<Vec<Value>>) -> Value {
    match result {
        Ok(items) => Value::Array(items),
        Err(e) => {
            warn!(error = %e, "Tool call failed");
            json!([{"error": e.to_string()}])
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::CanvasError;

    #[test]
    fn errors_are_wrapped_by_shape() {
        let err = || CanvasError::api(404, "The specified resource does not exist.", "");

        assert_eq!(
            object_or_error(Err(err())),
            json!({"error": "Canvas API Error (404): The specified resource does not exist."})
        );
        assert_eq!(
            list_or_error(Err(err())),
            json!([{"error": "Canvas API Error (404): The specified resource does not exist."}])
        );
        assert_eq!(list_or_error(Ok(vec![])), json!([]));
    }
}
