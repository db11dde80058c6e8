mod common;

use canvas_lms::{CanvasError, ErrorKind};
use serde::Deserialize;
use serde_json::{Map, json};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

use common::{TOKEN, client};

#[tokio::test]
async fn returns_data_and_sends_variables() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .and(header("Authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_json(json!({
            "query": "query($id: ID!) { course(id: $id) { name } }",
            "variables": {"id": "42"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"course": {"name": "Biology"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut variables = Map::new();
    variables.insert("id".into(), json!("42"));

    let data = client(&server)
        .graphql
        .query("query($id: ID!) { course(id: $id) { name } }", Some(variables))
        .await
        .unwrap();
    assert_eq!(data, json!({"course": {"name": "Biology"}}));
}

#[tokio::test]
async fn errors_in_a_200_response_are_api_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": null,
            "errors": [{"message": "Field 'nope' doesn't exist on type 'Query'"}]
        })))
        .mount(&server)
        .await;

    let err = client(&server)
        .graphql
        .query("{ nope }", None)
        .await
        .unwrap_err();

    assert!(matches!(err, CanvasError::Api { status: 200, .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(err.to_string().contains("doesn't exist"));
}

#[tokio::test]
async fn missing_data_is_an_empty_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"errors": []})))
        .mount(&server)
        .await;

    let data = client(&server).graphql.query("{ x }", None).await.unwrap();
    assert_eq!(data, json!({}));
}

#[tokio::test]
async fn query_as_deserializes_data() {
    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Courses {
        all_courses: Vec<Course>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Course {
        #[serde(rename = "_id")]
        id: String,
        name: String,
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"allCourses": [{"_id": "1", "name": "Biology"}]}
        })))
        .mount(&server)
        .await;

    let courses: Courses = client(&server)
        .graphql
        .query_as("{ allCourses { _id name } }", None)
        .await
        .unwrap();
    assert_eq!(
        courses.all_courses,
        vec![Course { id: "1".into(), name: "Biology".into() }]
    );
}
