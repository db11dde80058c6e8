use canvas_lms::{
    CanvasClient, ItemId,
    planner::{self, course_name, format_due_date, split_by_due_date, submission_status},
    resources::CourseListQuery,
};
use color_eyre::eyre::Result;
use futures::TryStreamExt;
use serde_json::Value;
use tracing::warn;

use super::{display_field, field};

/// Every active course with its term and all dated assignments
pub async fn run(client: &CanvasClient) -> Result<()> {
    println!("Fetching your courses...");
    let courses: Vec<Value> = client
        .courses
        .list(&CourseListQuery::active().with_include("term"))
        .try_collect()
        .await?;

    if courses.is_empty() {
        println!("No active courses found.");
        return Ok(());
    }
    println!("\nFound {} active courses:\n", courses.len());

    let query = planner::due_date_query();
    for course in &courses {
        println!("Course: {}", course_name(course));
        println!(
            "Term: {}",
            course.get("term").map_or("No term", |term| field(term, "name", "No term"))
        );
        println!("ID: {}", display_field(course, "id", "Unknown ID"));

        let Some(course_id) = course.get("id").filter(|id| !id.is_null()).map(ItemId::from)
        else {
            println!("  Invalid course ID, skipping...");
            continue;
        };

        let assignments: Vec<Value> =
            match client.assignments.list(course_id, &query).try_collect().await {
                Ok(assignments) => assignments,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch assignments");
                    println!("  Error fetching assignments: {e}");
                    println!("{}\n", "-".repeat(80));
                    continue;
                },
            };

        let (dated, undated) = split_by_due_date(assignments);
        if dated.is_empty() {
            println!("  No assignments with due dates found.");
        } else {
            println!("  Assignments:");
            for assignment in &dated {
                println!("    - {}", field(assignment, "name", "Unnamed Assignment"));
                println!(
                    "      Due: {}",
                    format_due_date(assignment.get("due_at").and_then(Value::as_str))
                );
                println!("      Points: {}", display_field(assignment, "points_possible", "N/A"));
                println!("      Status: {}\n", submission_status(assignment));
            }
        }

        if undated > 0 {
            println!("  {undated} assignments without due dates.");
        }
        println!("{}\n", "-".repeat(80));
    }

    Ok(())
}
