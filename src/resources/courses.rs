//! Courses API

use std::sync::Arc;

use serde_json::{Value, json};

use super::{
    Fields, fields_body, json_body, or_null,
    query::{CourseListQuery, EnrollmentType, IncludeQuery, merge_required},
};
use crate::{
    client::{CanvasApi, ItemStream, Page, Params, Result},
    id::ItemId,
};

#[derive(Debug, Clone)]
pub struct Courses {
    api: Arc<CanvasApi>,
}

impl Courses {
    pub fn new(api: Arc<CanvasApi>) -> Self {
        Self { api }
    }

    /// Every course the caller is enrolled in that matches `query`
    pub fn list(&self, query: &CourseListQuery) -> ItemStream<'_> {
        self.api.paginate("courses", query.to_params())
    }

    /// One page of [`list`](Self::list)
    pub async fn list_page(&self, query: &CourseListQuery) -> Result<Page> {
        self.api.get_page("courses", &query.to_params()).await
    }

    pub async fn get(&self, course_id: impl Into<ItemId>, include: &IncludeQuery) -> Result<Value> {
        let course_id = course_id.into();
        let body = self
            .api
            .get(&format!("courses/{course_id}"), &include.to_params())
            .await?;
        Ok(or_null(body))
    }

    /// Create a course in the caller's default account
    pub async fn create(
        &self,
        name: &str,
        course_code: Option<&str>,
        extra: Fields,
    ) -> Result<Value> {
        let mut required = Fields::new();
        required.insert("name".into(), json!(name));
        if let Some(code) = course_code {
            required.insert("course_code".into(), json!(code));
        }

        let body = merge_required(extra, Some("course"), required);
        let created = self.api.post("courses", json_body(body)).await?;
        Ok(or_null(created))
    }

    pub async fn update(&self, course_id: impl Into<ItemId>, fields: Fields) -> Result<Value> {
        let course_id = course_id.into();
        let updated = self
            .api
            .put(&format!("courses/{course_id}"), fields_body(fields))
            .await?;
        Ok(or_null(updated))
    }

    pub async fn delete(&self, course_id: impl Into<ItemId>) -> Result<Value> {
        let course_id = course_id.into();
        let deleted = self.api.delete(&format!("courses/{course_id}")).await?;
        Ok(or_null(deleted))
    }

    /// Users enrolled as students
    pub fn list_students(&self, course_id: impl Into<ItemId>) -> ItemStream<'_> {
        let course_id = course_id.into();
        let params: Params = vec![(
            "enrollment_type".into(),
            EnrollmentType::Student.as_str().into(),
        )];
        self.api.paginate(format!("courses/{course_id}/users"), params)
    }

    pub fn list_assignments(&self, course_id: impl Into<ItemId>) -> ItemStream<'_> {
        let course_id = course_id.into();
        self.api
            .paginate(format!("courses/{course_id}/assignments"), Params::new())
    }

    pub fn list_modules(&self, course_id: impl Into<ItemId>) -> ItemStream<'_> {
        let course_id = course_id.into();
        self.api
            .paginate(format!("courses/{course_id}/modules"), Params::new())
    }
}
