use canvas_lms::{
    CanvasClient, ItemId,
    planner::{self, due_at, format_due_date, parse_due_at, submission_status},
};
use chrono::{DateTime, Utc};
use color_eyre::eyre::Result;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{display_field, field};

const AVAILABILITY_QUERY: &str = "{ allCourses { _id name } }";

const UPCOMING_QUERY: &str = r#"
{
  allCourses {
    _id
    name
    term { name }
    assignmentsConnection(first: 100) {
      nodes {
        _id
        name
        dueAt
        pointsPossible
      }
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AllCourses {
    all_courses: Vec<GraphqlCourse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlCourse {
    #[serde(rename = "_id")]
    id: String,
    name: Option<String>,
    term: Option<GraphqlTerm>,
    assignments_connection: Option<GraphqlConnection>,
}

#[derive(Debug, Deserialize)]
struct GraphqlTerm {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphqlConnection {
    #[serde(default)]
    nodes: Vec<GraphqlAssignment>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlAssignment {
    name: Option<String>,
    due_at: Option<String>,
    points_possible: Option<f64>,
}

/// Upcoming assignments over REST, grouped by week
pub async fn run(client: &CanvasClient, course_id: Option<&str>) -> Result<()> {
    match course_id {
        Some(id) => println!("Checking upcoming due dates for course {id}..."),
        None => println!("Checking upcoming due dates across all courses..."),
    }

    let assignments =
        planner::upcoming_assignments(client, course_id.map(ItemId::from), Utc::now()).await?;

    match course_id {
        Some(id) => println!("\n===== UPCOMING ASSIGNMENTS FOR COURSE {id} =====\n"),
        None => println!("\n===== UPCOMING ASSIGNMENTS ACROSS ALL COURSES =====\n"),
    }

    if assignments.is_empty() {
        println!("No upcoming assignments with due dates found.");
        return Ok(());
    }
    println!("Found {} upcoming assignments:\n", assignments.len());

    let weeks = assignments
        .iter()
        .filter_map(|assignment| due_at(assignment).map(|due| (due, assignment)))
        .chunk_by(|(due, _)| due.format("%Y-%U").to_string());

    for (_, week) in &weeks {
        let mut week = week.peekable();
        if let Some((due, _)) = week.peek() {
            println!("\n--- Week of {} ---\n", due.format("%b %d"));
        }
        for (_, assignment) in week {
            println!("{}", format_due_date(assignment.get("due_at").and_then(Value::as_str)));
            println!("Course: {}", field(assignment, "course_name", "Unknown Course"));
            println!("Assignment: {}", field(assignment, "name", "Unnamed Assignment"));
            println!("Points: {}", display_field(assignment, "points_possible", "N/A"));
            println!("Status: {}\n", submission_status(assignment));
        }
    }

    Ok(())
}

/// Upcoming assignments from one GraphQL query, falling back to REST
pub async fn run_graphql(client: &CanvasClient) -> Result<()> {
    println!("Fetching courses and assignments using GraphQL...");

    match client.graphql.query(AVAILABILITY_QUERY, None).await {
        Ok(data) if data.get("allCourses").is_some() => {},
        Ok(data) => {
            println!("GraphQL API doesn't seem to be available with current credentials.");
            println!("{}", serde_json::to_string_pretty(&data)?);
            return fall_back(client).await;
        },
        Err(e) => {
            warn!(error = %e, "GraphQL availability check failed");
            println!("GraphQL query failed: {e}");
            return fall_back(client).await;
        },
    }

    let courses = match client.graphql.query_as::<AllCourses>(UPCOMING_QUERY, None).await {
        Ok(data) => data.all_courses,
        Err(e) => {
            warn!(error = %e, "GraphQL upcoming query failed");
            println!("GraphQL query failed: {e}");
            return fall_back(client).await;
        },
    };

    if courses.is_empty() {
        println!("No courses found with GraphQL API.");
        return Ok(());
    }
    println!("\nFound {} courses\n", courses.len());

    let now = Utc::now();
    let mut upcoming: Vec<(DateTime<Utc>, String, GraphqlAssignment)> = Vec::new();

    for course in courses {
        let course_name = course.name.unwrap_or_else(|| "Unknown Course".to_string());
        let term = course
            .term
            .and_then(|term| term.name)
            .unwrap_or_else(|| "No term".to_string());

        println!("Course: {course_name}");
        println!("Term: {term}");
        println!("ID: {}", course.id);

        let future = course
            .assignments_connection
            .map(|connection| connection.nodes)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|assignment| {
                let due = assignment.due_at.as_deref().and_then(parse_due_at)?;
                (due > now).then_some((due, assignment))
            })
            .sorted_by_key(|(due, _)| *due)
            .collect_vec();

        if future.is_empty() {
            println!("  No upcoming assignments");
        } else {
            println!("  Upcoming Assignments ({}):", future.len());
            for (_, assignment) in &future {
                println!("    - {}", assignment_name(assignment));
                println!("      Due: {}", format_due_date(assignment.due_at.as_deref()));
                println!("      Points: {}\n", points(assignment));
            }
        }
        println!("{}\n", "-".repeat(80));

        upcoming.extend(
            future
                .into_iter()
                .map(|(due, assignment)| (due, course_name.clone(), assignment)),
        );
    }

    if upcoming.is_empty() {
        return Ok(());
    }

    upcoming.sort_by_key(|(due, ..)| *due);
    println!("\n===== ALL UPCOMING ASSIGNMENTS =====\n");
    println!("Total: {} assignments\n", upcoming.len());
    for (_, course_name, assignment) in &upcoming {
        println!("{}", format_due_date(assignment.due_at.as_deref()));
        println!("Course: {course_name}");
        println!("Assignment: {}", assignment_name(assignment));
        println!("Points: {}\n", points(assignment));
    }

    Ok(())
}

async fn fall_back(client: &CanvasClient) -> Result<()> {
    println!("Falling back to REST API...");
    run(client, None).await
}

fn assignment_name(assignment: &GraphqlAssignment) -> &str {
    assignment.name.as_deref().unwrap_or("Unnamed Assignment")
}

fn points(assignment: &GraphqlAssignment) -> String {
    assignment
        .points_possible
        .map(|points| points.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}
