mod common;

use canvas_lms::{ErrorKind, mcp::CanvasMcpServer, resources::Paging};
use chrono::{Duration, Utc};
use rmcp::model::ErrorCode;
use serde_json::{Map, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

use common::shared_client;

fn arguments(value: serde_json::Value) -> Option<Map<String, serde_json::Value>> {
    value.as_object().cloned()
}

async fn mount_course(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 5,
            "name": "Biology",
            "course_code": "BIO101",
            "term": {"name": "Spring 2024"}
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn remote_failures_become_error_values() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": "The specified resource does not exist."
        })))
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let tools = mcp.tools();

    assert_eq!(
        tools.get_course_info("404").await,
        json!({"error": "Canvas API Error (404): The specified resource does not exist."})
    );
    assert_eq!(
        tools.list_active_courses(Paging::default()).await,
        json!([{"error": "Canvas API Error (404): The specified resource does not exist."}])
    );
}

#[tokio::test]
async fn next_assignment_is_annotated_with_course() {
    let server = MockServer::start().await;
    mount_course(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/5/assignments"))
        .and(query_param("page", "1"))
        .and(query_param("per_page", "1"))
        .and(query_param("order_by", "due_at"))
        .and(query_param("bucket", "upcoming"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 31, "name": "Lab report", "due_at": "2030-04-01T23:59:00Z"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let next = mcp.tools().get_next_assignment("5").await;

    assert_eq!(next["name"], "Lab report");
    assert_eq!(next["course_name"], "Biology");
    assert_eq!(next["course_id"], "5");
}

#[tokio::test]
async fn next_assignment_reports_when_nothing_is_due() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/5/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    assert_eq!(
        mcp.tools().get_next_assignment("5").await,
        json!({"message": "No upcoming assignments"})
    );
}

#[tokio::test]
async fn date_range_filters_and_sorts() {
    let server = MockServer::start().await;
    mount_course(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/5/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Late", "due_at": "2024-03-31T23:59:59Z"},
            {"id": 2, "name": "Outside", "due_at": "2024-04-01T00:00:00Z"},
            {"id": 3, "name": "Early", "due_at": "2024-03-01T00:00:00Z"},
            {"id": 4, "name": "Undated", "due_at": null}
        ])))
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let assignments = mcp
        .tools()
        .get_assignments_by_date_range("2024-03-01", "2024-03-31", Some("5"))
        .await
        .unwrap();

    let names: Vec<&str> = assignments
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Early", "Late"]);
    assert_eq!(assignments[0]["course_name"], "Biology");
}

fn names(assignments: &serde_json::Value) -> Vec<&str> {
    assignments
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["name"].as_str().unwrap())
        .collect()
}

async fn mount_relative_assignments(server: &MockServer) {
    let now = Utc::now();
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/5/assignments"))
        .and(query_param("include[]", "submission"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Next month", "due_at": (now + Duration::days(20)).to_rfc3339()},
            {"id": 2, "name": "Yesterday", "due_at": (now - Duration::days(1)).to_rfc3339()},
            {"id": 3, "name": "In two days", "due_at": (now + Duration::days(2)).to_rfc3339()},
            {"id": 4, "name": "Undated", "due_at": null}
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn due_this_week_keeps_the_next_seven_days() {
    let server = MockServer::start().await;
    mount_course(&server).await;
    mount_relative_assignments(&server).await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let assignments = mcp.tools().get_assignments_due_this_week(Some("5")).await;

    assert_eq!(names(&assignments), vec!["In two days"]);
    assert_eq!(assignments[0]["course_name"], "Biology");
    assert_eq!(assignments[0]["course_id"], "5");

    let requests = server.received_requests().await.unwrap();
    let listing = requests
        .iter()
        .find(|request| request.url.path() == "/api/v1/courses/5/assignments")
        .unwrap();
    let query = listing.url.query().unwrap_or_default();
    assert!(query.contains("bucket=upcoming"), "{query}");
    assert!(query.contains("per_page=100"), "{query}");
}

#[tokio::test]
async fn upcoming_drops_past_assignments_and_sorts() {
    let server = MockServer::start().await;
    mount_course(&server).await;
    mount_relative_assignments(&server).await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let assignments = mcp.tools().get_upcoming_assignments(Some("5")).await;

    assert_eq!(names(&assignments), vec!["In two days", "Next month"]);
    assert_eq!(assignments[1]["course_name"], "Biology");
}

#[tokio::test]
async fn week_views_report_failures_as_a_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "errors": "The specified resource does not exist."
        })))
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let expected =
        json!([{"error": "Canvas API Error (404): The specified resource does not exist."}]);

    assert_eq!(mcp.tools().get_assignments_due_this_week(Some("5")).await, expected);
    assert_eq!(mcp.tools().get_upcoming_assignments(None).await, expected);
}

#[tokio::test]
async fn malformed_dates_are_rejected_before_any_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));

    let err = mcp
        .tools()
        .get_assignments_by_date_range("2024/03/01", "2024-03-31", None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("YYYY-MM-DD"));

    let err = mcp
        .tools()
        .get_assignments_by_date_range("2024-04-01", "2024-03-01", None)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("must be before"));

    let err = mcp
        .dispatch(
            "get_assignments_by_date_range",
            arguments(json!({"start_date": "03-01-2024", "end_date": "2024-03-31"})),
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn dispatch_routes_by_name() {
    let server = MockServer::start().await;
    mount_course(&server).await;

    let mcp = CanvasMcpServer::new(shared_client(&server));

    let date = mcp.dispatch("get_current_date", None).await.unwrap();
    assert_eq!(date.as_str().map(str::len), Some(10));

    let course = mcp
        .dispatch("get_course_info", arguments(json!({"course_id": 5})))
        .await
        .unwrap();
    assert_eq!(course["name"], "Biology");

    let err = mcp.dispatch("drop_course", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);

    let err = mcp.dispatch("get_course_info", None).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::INVALID_PARAMS);
}

#[tokio::test]
async fn course_summary_prompt_lists_assignments() {
    let server = MockServer::start().await;
    mount_course(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/v1/courses/5/assignments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "Essay", "due_at": "2024-03-28T23:59:59Z"},
            {"id": 2, "name": "Quiz"}
        ])))
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let prompt = mcp
        .render_prompt("course_summary_prompt", arguments(json!({"course_id": "5"})))
        .await
        .unwrap();

    let text = serde_json::to_value(&prompt.messages[0]).unwrap().to_string();
    assert!(text.contains("Name: Biology"));
    assert!(text.contains("Term: Spring 2024"));
    assert!(text.contains("- Essay (Due: 2024-03-28T23:59:59Z)"));
    assert!(text.contains("- Quiz (Due: No due date)"));
}

#[tokio::test]
async fn course_summary_prompt_reports_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "errors": "Invalid access token."
        })))
        .mount(&server)
        .await;

    let mcp = CanvasMcpServer::new(shared_client(&server));
    let prompt = mcp.tools().course_summary_prompt("5").await;
    assert_eq!(prompt, "Error: Canvas API Error (401): Invalid access token.");
}

#[test]
fn every_tool_is_advertised() {
    let names: Vec<String> = CanvasMcpServer::tool_definitions()
        .into_iter()
        .map(|tool| tool.name.to_string())
        .collect();

    assert_eq!(
        names,
        vec![
            "get_current_date",
            "get_course_info",
            "list_active_courses",
            "get_course_assignments",
            "get_next_assignment",
            "get_assignments_due_this_week",
            "get_upcoming_assignments",
            "get_assignments_by_date_range",
        ]
    );
    assert_eq!(CanvasMcpServer::prompt_definitions().len(), 1);
}
