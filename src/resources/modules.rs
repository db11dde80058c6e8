//! Modules and module items API

use std::sync::Arc;

use serde_json::{Value, json};

use super::{
    Fields, fields_body, json_body, or_null,
    query::{IncludeQuery, merge_required},
};
use crate::{
    client::{CanvasApi, ItemStream, Params, Result},
    id::ItemId,
};

#[derive(Debug, Clone)]
pub struct Modules {
    api: Arc<CanvasApi>,
}

impl Modules {
    pub fn new(api: Arc<CanvasApi>) -> Self {
        Self { api }
    }

    pub fn list(&self, course_id: impl Into<ItemId>, include: &IncludeQuery) -> ItemStream<'_> {
        let course_id = course_id.into();
        self.api
            .paginate(format!("courses/{course_id}/modules"), include.to_params())
    }

    pub async fn get(
        &self,
        course_id: impl Into<ItemId>,
        module_id: impl Into<ItemId>,
        include: &IncludeQuery,
    ) -> Result<Value> {
        let (course_id, module_id) = (course_id.into(), module_id.into());
        let body = self
            .api
            .get(
                &format!("courses/{course_id}/modules/{module_id}"),
                &include.to_params(),
            )
            .await?;
        Ok(or_null(body))
    }

    pub async fn create(
        &self,
        course_id: impl Into<ItemId>,
        name: &str,
        extra: Fields,
    ) -> Result<Value> {
        let course_id = course_id.into();
        let mut required = Fields::new();
        required.insert("name".into(), json!(name));

        let body = merge_required(extra, Some("module"), required);
        let created = self
            .api
            .post(&format!("courses/{course_id}/modules"), json_body(body))
            .await?;
        Ok(or_null(created))
    }

    pub async fn update(
        &self,
        course_id: impl Into<ItemId>,
        module_id: impl Into<ItemId>,
        fields: Fields,
    ) -> Result<Value> {
        let (course_id, module_id) = (course_id.into(), module_id.into());
        let updated = self
            .api
            .put(
                &format!("courses/{course_id}/modules/{module_id}"),
                fields_body(fields),
            )
            .await?;
        Ok(or_null(updated))
    }

    pub async fn delete(
        &self,
        course_id: impl Into<ItemId>,
        module_id: impl Into<ItemId>,
    ) -> Result<Value> {
        let (course_id, module_id) = (course_id.into(), module_id.into());
        let deleted = self
            .api
            .delete(&format!("courses/{course_id}/modules/{module_id}"))
            .await?;
        Ok(or_null(deleted))
    }

    pub fn list_items(
        &self,
        course_id: impl Into<ItemId>,
        module_id: impl Into<ItemId>,
    ) -> ItemStream<'_> {
        let (course_id, module_id) = (course_id.into(), module_id.into());
        self.api.paginate(
            format!("courses/{course_id}/modules/{module_id}/items"),
            Params::new(),
        )
    }

    pub async fn get_item(
        &self,
        course_id: impl Into<ItemId>,
        module_id: impl Into<ItemId>,
        item_id: impl Into<ItemId>,
    ) -> Result<Value> {
        let (course_id, module_id, item_id) = (course_id.into(), module_id.into(), item_id.into());
        let body = self
            .api
            .get(
                &format!("courses/{course_id}/modules/{module_id}/items/{item_id}"),
                &[],
            )
            .await?;
        Ok(or_null(body))
    }

    /// Add an item pointing at existing content (`File`, `Page`, `Assignment`, ...)
    pub async fn create_item(
        &self,
        course_id: impl Into<ItemId>,
        module_id: impl Into<ItemId>,
        title: &str,
        item_type: &str,
        content_id: impl Into<ItemId>,
        extra: Fields,
    ) -> Result<Value> {
        let (course_id, module_id, content_id) =
            (course_id.into(), module_id.into(), content_id.into());
        let mut required = Fields::new();
        required.insert("title".into(), json!(title));
        required.insert("type".into(), json!(item_type));
        required.insert("content_id".into(), json!(content_id.as_str()));

        let body = merge_required(extra, Some("module_item"), required);
        let created = self
            .api
            .post(
                &format!("courses/{course_id}/modules/{module_id}/items"),
                json_body(body),
            )
            .await?;
        Ok(or_null(created))
    }
}
