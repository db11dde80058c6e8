//! Assignments and submissions API

use std::sync::Arc;

use serde_json::{Value, json};

use super::{
    Fields, fields_body, json_body, or_null,
    query::{AssignmentListQuery, IncludeQuery, merge_required},
};
use crate::{
    client::{CanvasApi, ItemStream, Page, Params, Result},
    id::ItemId,
};

#[derive(Debug, Clone)]
pub struct Assignments {
    api: Arc<CanvasApi>,
}

impl Assignments {
    pub fn new(api: Arc<CanvasApi>) -> Self {
        Self { api }
    }

    /// All assignments of a course, across every page
    pub fn list(
        &self,
        course_id: impl Into<ItemId>,
        query: &AssignmentListQuery,
    ) -> ItemStream<'_> {
        let course_id = course_id.into();
        self.api
            .paginate(format!("courses/{course_id}/assignments"), query.to_params())
    }

    /// The single page selected by `query.paging`
    pub async fn list_page(
        &self,
        course_id: impl Into<ItemId>,
        query: &AssignmentListQuery,
    ) -> Result<Page> {
        let course_id = course_id.into();
        self.api
            .get_page(&format!("courses/{course_id}/assignments"), &query.to_params())
            .await
    }

    pub async fn get(
        &self,
        course_id: impl Into<ItemId>,
        assignment_id: impl Into<ItemId>,
        include: &IncludeQuery,
    ) -> Result<Value> {
        let (course_id, assignment_id) = (course_id.into(), assignment_id.into());
        let body = self
            .api
            .get(
                &format!("courses/{course_id}/assignments/{assignment_id}"),
                &include.to_params(),
            )
            .await?;
        Ok(or_null(body))
    }

    pub async fn create(
        &self,
        course_id: impl Into<ItemId>,
        name: &str,
        points_possible: f64,
        extra: Fields,
    ) -> Result<Value> {
        let course_id = course_id.into();
        let mut required = Fields::new();
        required.insert("name".into(), json!(name));
        required.insert("points_possible".into(), json!(points_possible));

        let body = merge_required(extra, Some("assignment"), required);
        let created = self
            .api
            .post(&format!("courses/{course_id}/assignments"), json_body(body))
            .await?;
        Ok(or_null(created))
    }

    pub async fn update(
        &self,
        course_id: impl Into<ItemId>,
        assignment_id: impl Into<ItemId>,
        fields: Fields,
    ) -> Result<Value> {
        let (course_id, assignment_id) = (course_id.into(), assignment_id.into());
        let updated = self
            .api
            .put(
                &format!("courses/{course_id}/assignments/{assignment_id}"),
                fields_body(fields),
            )
            .await?;
        Ok(or_null(updated))
    }

    pub async fn delete(
        &self,
        course_id: impl Into<ItemId>,
        assignment_id: impl Into<ItemId>,
    ) -> Result<Value> {
        let (course_id, assignment_id) = (course_id.into(), assignment_id.into());
        let deleted = self
            .api
            .delete(&format!("courses/{course_id}/assignments/{assignment_id}"))
            .await?;
        Ok(or_null(deleted))
    }

    pub fn list_submissions(
        &self,
        course_id: impl Into<ItemId>,
        assignment_id: impl Into<ItemId>,
    ) -> ItemStream<'_> {
        let (course_id, assignment_id) = (course_id.into(), assignment_id.into());
        self.api.paginate(
            format!("courses/{course_id}/assignments/{assignment_id}/submissions"),
            Params::new(),
        )
    }

    pub async fn get_submission(
        &self,
        course_id: impl Into<ItemId>,
        assignment_id: impl Into<ItemId>,
        user_id: impl Into<ItemId>,
    ) -> Result<Value> {
        let endpoint = submission_endpoint(course_id.into(), assignment_id.into(), user_id.into());
        Ok(or_null(self.api.get(&endpoint, &[]).await?))
    }

    /// Grade or comment on a submission
    pub async fn update_submission(
        &self,
        course_id: impl Into<ItemId>,
        assignment_id: impl Into<ItemId>,
        user_id: impl Into<ItemId>,
        fields: Fields,
    ) -> Result<Value> {
        let endpoint = submission_endpoint(course_id.into(), assignment_id.into(), user_id.into());
        Ok(or_null(self.api.put(&endpoint, fields_body(fields)).await?))
    }
}

fn submission_endpoint(course_id: ItemId, assignment_id: ItemId, user_id: ItemId) -> String {
    format!("courses/{course_id}/assignments/{assignment_id}/submissions/{user_id}")
}
