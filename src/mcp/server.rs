use std::sync::Arc;

use rmcp::{
    Error as McpError, RoleServer, ServerHandler,
    handler::server::tool::schema_for_type,
    model::*,
    service::RequestContext,
};
use schemars::JsonSchema;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument};

use super::tools::CanvasTools;
use crate::{
    client::{CanvasClient, ErrorKind},
    id::ItemId,
    resources::{Bucket, OrderBy, Paging},
};

pub const COURSE_SUMMARY_PROMPT: &str = "course_summary_prompt";

#[derive(Debug, Deserialize, JsonSchema)]
pub struct EmptyRequest {}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CourseRequest {
    /// Canvas course id
    #[schemars(with = "String")]
    pub course_id: ItemId,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct OptionalCourseRequest {
    /// Limit the lookup to one course; all active courses when omitted
    #[schemars(with = "Option<String>")]
    pub course_id: Option<ItemId>,
}

#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct ListCoursesRequest {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct CourseAssignmentsRequest {
    #[schemars(with = "String")]
    pub course_id: ItemId,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub order_by: Option<OrderBy>,
    pub bucket: Option<Bucket>,
}

#[derive(Debug, Deserialize, JsonSchema)]
pub struct DateRangeRequest {
    /// First day, `YYYY-MM-DD`
    pub start_date: String,
    /// Last day, `YYYY-MM-DD`, inclusive
    pub end_date: String,
    #[schemars(with = "Option<String>")]
    pub course_id: Option<ItemId>,
}

/// MCP server exposing Canvas lookups as tools over stdio
#[derive(Debug, Clone)]
pub struct CanvasMcpServer {
    tools: CanvasTools,
}

impl CanvasMcpServer {
    pub fn new(client: Arc<CanvasClient>) -> Self {
        Self { tools: CanvasTools::new(client) }
    }

    pub fn tools(&self) -> &CanvasTools {
        &self.tools
    }

    pub fn tool_definitions() -> Vec<Tool> {
        vec![
            Tool::new(
                "get_current_date",
                "Get today's date in YYYY-MM-DD format",
                schema_for_type::<EmptyRequest>(),
            ),
            Tool::new(
                "get_course_info",
                "Get detailed information about a specific course",
                schema_for_type::<CourseRequest>(),
            ),
            Tool::new(
                "list_active_courses",
                "List all active courses for the current user",
                schema_for_type::<ListCoursesRequest>(),
            ),
            Tool::new(
                "get_course_assignments",
                "Get assignments for a specific course, with optional ordering and bucket filter",
                schema_for_type::<CourseAssignmentsRequest>(),
            ),
            Tool::new(
                "get_next_assignment",
                "Get the next upcoming assignment of a course",
                schema_for_type::<CourseRequest>(),
            ),
            Tool::new(
                "get_assignments_due_this_week",
                "Get assignments due within the next seven days",
                schema_for_type::<OptionalCourseRequest>(),
            ),
            Tool::new(
                "get_upcoming_assignments",
                "Get all assignments with a due date in the future",
                schema_for_type::<OptionalCourseRequest>(),
            ),
            Tool::new(
                "get_assignments_by_date_range",
                "Get assignments due between two dates (YYYY-MM-DD, inclusive)",
                schema_for_type::<DateRangeRequest>(),
            ),
        ]
    }

    pub fn prompt_definitions() -> Vec<Prompt> {
        vec![Prompt::new(
            COURSE_SUMMARY_PROMPT,
            Some("Summarize a course and its assignments"),
            Some(vec![PromptArgument {
                name: "course_id".to_string(),
                description: Some("Canvas course id".to_string()),
                required: Some(true),
            }]),
        )]
    }

    /// Run a tool by name.
    ///
    /// Unknown tools, malformed arguments and invalid dates are rejected
    /// with `invalid_params`; Canvas failures come back inside the value.
    #[instrument(skip(self, arguments))]
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<Value, McpError> {
        let tools = &self.tools;
        let value = match name {
            "get_current_date" => Value::String(tools.get_current_date()),
            "get_course_info" => {
                let request: CourseRequest = parse_arguments(arguments)?;
                tools.get_course_info(request.course_id.as_str()).await
            },
            "list_active_courses" => {
                let request: ListCoursesRequest = parse_arguments(arguments)?;
                tools
                    .list_active_courses(Paging { page: request.page, per_page: request.per_page })
                    .await
            },
            "get_course_assignments" => {
                let request: CourseAssignmentsRequest = parse_arguments(arguments)?;
                tools
                    .get_course_assignments(
                        request.course_id.as_str(),
                        Paging { page: request.page, per_page: request.per_page },
                        request.order_by,
                        request.bucket,
                    )
                    .await
            },
            "get_next_assignment" => {
                let request: CourseRequest = parse_arguments(arguments)?;
                tools.get_next_assignment(request.course_id.as_str()).await
            },
            "get_assignments_due_this_week" => {
                let request: OptionalCourseRequest = parse_arguments(arguments)?;
                tools
                    .get_assignments_due_this_week(request.course_id.as_ref().map(ItemId::as_str))
                    .await
            },
            "get_upcoming_assignments" => {
                let request: OptionalCourseRequest = parse_arguments(arguments)?;
                tools
                    .get_upcoming_assignments(request.course_id.as_ref().map(ItemId::as_str))
                    .await
            },
            "get_assignments_by_date_range" => {
                let request: DateRangeRequest = parse_arguments(arguments)?;
                tools
                    .get_assignments_by_date_range(
                        &request.start_date,
                        &request.end_date,
                        request.course_id.as_ref().map(ItemId::as_str),
                    )
                    .await
                    .map_err(|e| match e.kind() {
                        ErrorKind::Validation => McpError::invalid_params(e.to_string(), None),
                        _ => McpError::internal_error(e.to_string(), None),
                    })?
            },
            other => {
                return Err(McpError::invalid_params(format!("Unknown tool: {other}"), None));
            },
        };

        Ok(value)
    }

    pub async fn render_prompt(
        &self,
        name: &str,
        arguments: Option<JsonObject>,
    ) -> Result<GetPromptResult, McpError> {
        if name != COURSE_SUMMARY_PROMPT {
            return Err(McpError::invalid_params(format!("Unknown prompt: {name}"), None));
        }

        let request: CourseRequest = parse_arguments(arguments)?;
        let text = self
            .tools
            .course_summary_prompt(request.course_id.as_str())
            .await;

        Ok(GetPromptResult {
            description: Some(format!("Summary of course {}", request.course_id)),
            messages: vec![PromptMessage::new_text(PromptMessageRole::User, text)],
        })
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Option<JsonObject>) -> Result<T, McpError> {
    serde_json::from_value(Value::Object(arguments.unwrap_or_default()))
        .map_err(|e| McpError::invalid_params(format!("Invalid arguments: {e}"), None))
}

/// Tool output as text: strings verbatim, everything else as pretty JSON
fn render(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

impl ServerHandler for CanvasMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            instructions: Some(
                "Canvas LMS tools: look up courses and assignments, and find what is due next."
                    .to_string(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            next_cursor: None,
            tools: Self::tool_definitions(),
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        debug!(tool = %request.name, "Tool called");
        let value = self.dispatch(&request.name, request.arguments).await?;
        Ok(CallToolResult::success(vec![Content::text(render(&value))]))
    }

    async fn list_prompts(
        &self,
        _: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: Self::prompt_definitions(),
        })
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.render_prompt(&request.name, request.arguments).await
    }
}
