use canvas_lms::{
    CanvasClient,
    resources::{AssignmentListQuery, CourseListQuery, IncludeQuery},
};
use clap::ValueEnum;
use color_eyre::eyre::Result;
use futures::TryStreamExt;
use serde_json::Value;

use super::{display_field, field, print_structure};

const TEST_QUERY: &str = "{ allCourses { _id name } }";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    Me,
    Courses,
    Assignments,
    Modules,
    TestGraphql,
}

pub async fn run(client: &CanvasClient, resource: Resource, id: Option<&str>) -> Result<()> {
    match (resource, id) {
        (Resource::Me, _) => print_structure("Current User", &client.users.get_self().await?),

        (Resource::Courses, Some(id)) => print_structure(
            &format!("Course {id}"),
            &client.courses.get(id, &IncludeQuery::default()).await?,
        ),
        (Resource::Courses, None) => {
            let courses: Vec<Value> = client
                .courses
                .list(&CourseListQuery::default().with_include("term"))
                .try_collect()
                .await?;
            let Some(first) = courses.first() else {
                println!("No courses found.");
                return Ok(());
            };

            println!("Found {} courses.", courses.len());
            print_structure("First Course", first);

            println!("\nAll Courses:");
            for course in &courses {
                let name = field(course, "name", field(course, "course_code", "Unknown"));
                println!("  - {name} (ID: {})", display_field(course, "id", "Unknown ID"));
            }
        },

        (Resource::Assignments, None) => println!("Error: Course ID required for assignments."),
        (Resource::Assignments, Some(course_id)) => {
            let assignments: Vec<Value> = client
                .assignments
                .list(course_id, &AssignmentListQuery::default())
                .try_collect()
                .await?;
            let Some(first) = assignments.first() else {
                println!("No assignments found for course {course_id}.");
                return Ok(());
            };

            println!("Found {} assignments in course {course_id}.", assignments.len());
            print_structure("First Assignment", first);

            println!("\nAll Assignments:");
            for assignment in &assignments {
                println!(
                    "  - {} (ID: {}, Due: {})",
                    field(assignment, "name", "Unnamed"),
                    display_field(assignment, "id", "Unknown ID"),
                    display_field(assignment, "due_at", "No due date"),
                );
            }
        },

        (Resource::Modules, None) => println!("Error: Course ID required for modules."),
        (Resource::Modules, Some(course_id)) => {
            let modules: Vec<Value> = client
                .modules
                .list(course_id, &IncludeQuery::default())
                .try_collect()
                .await?;
            let Some(first) = modules.first() else {
                println!("No modules found for course {course_id}.");
                return Ok(());
            };

            println!("Found {} modules in course {course_id}.", modules.len());
            print_structure("First Module", first);
        },

        (Resource::TestGraphql, _) => print_structure(
            "GraphQL Test Response",
            &client.graphql.query(TEST_QUERY, None).await?,
        ),
    }

    Ok(())
}
