//! Files and folders API

use std::sync::Arc;

use reqwest::{Method, multipart};
use serde_json::{Value, json};
use tracing::{debug, info, instrument};

use super::{Fields, fields_body, json_body, or_null, query::merge_required};
use crate::{
    client::{CanvasApi, CanvasError, ItemStream, Params, Result},
    id::ItemId,
};

#[derive(Debug, Clone)]
pub struct Files {
    api: Arc<CanvasApi>,
}

impl Files {
    pub fn new(api: Arc<CanvasApi>) -> Self {
        Self { api }
    }

    pub fn list_course_files(&self, course_id: impl Into<ItemId>) -> ItemStream<'_> {
        let course_id = course_id.into();
        self.api
            .paginate(format!("courses/{course_id}/files"), Params::new())
    }

    pub fn list_user_files(&self, user_id: impl Into<ItemId>) -> ItemStream<'_> {
        let user_id = user_id.into();
        self.api
            .paginate(format!("users/{user_id}/files"), Params::new())
    }

    pub async fn get(&self, file_id: impl Into<ItemId>) -> Result<Value> {
        let file_id = file_id.into();
        Ok(or_null(self.api.get(&format!("files/{file_id}"), &[]).await?))
    }

    pub async fn update(&self, file_id: impl Into<ItemId>, fields: Fields) -> Result<Value> {
        let file_id = file_id.into();
        let updated = self
            .api
            .put(&format!("files/{file_id}"), fields_body(fields))
            .await?;
        Ok(or_null(updated))
    }

    pub async fn delete(&self, file_id: impl Into<ItemId>) -> Result<Value> {
        let file_id = file_id.into();
        Ok(or_null(self.api.delete(&format!("files/{file_id}")).await?))
    }

    /// Upload a file into a folder.
    ///
    /// Canvas hands out a pre-signed upload URL for the file metadata; the
    /// content is then posted there directly, without the bearer token. The
    /// upload host answers with the finished file record. A failure after the
    /// first step leaves a pending upload behind on the server.
    #[instrument(skip(self, parent_folder_id, content), fields(size = content.len()))]
    pub async fn upload(
        &self,
        parent_folder_id: impl Into<ItemId>,
        name: &str,
        content: Vec<u8>,
        content_type: &str,
    ) -> Result<Value> {
        let parent_folder_id = parent_folder_id.into();
        let metadata = json!({
            "name": name,
            "size": content.len(),
            "content_type": content_type,
        });

        let init = self
            .api
            .post(&format!("folders/{parent_folder_id}/files"), json_body(metadata))
            .await?
            .unwrap_or(Value::Null);

        let Some(upload_url) = init.get("upload_url").and_then(Value::as_str) else {
            return Err(CanvasError::config(
                "upload_url",
                "Failed to get upload URL from Canvas API",
            ));
        };
        debug!(upload_url, "Received upload URL");

        let mut form = multipart::Form::new();
        if let Some(Value::Object(upload_params)) = init.get("upload_params") {
            for (key, value) in upload_params {
                let value = match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                form = form.text(key.clone(), value);
            }
        }
        let part = multipart::Part::bytes(content)
            .file_name(name.to_string())
            .mime_str(content_type)?;
        form = form.part("file", part);

        let response = self
            .api
            .anonymous_request(Method::POST, upload_url)?
            .multipart(form)
            .send()
            .await?;
        let uploaded = self.api.handle_response(response).await?;

        info!(name, "File uploaded");
        Ok(or_null(uploaded.body))
    }

    pub fn list_folders(&self, course_id: impl Into<ItemId>) -> ItemStream<'_> {
        let course_id = course_id.into();
        self.api
            .paginate(format!("courses/{course_id}/folders"), Params::new())
    }

    /// Create a folder below `parent_folder_id`
    pub async fn create_folder(
        &self,
        name: &str,
        parent_folder_id: impl Into<ItemId>,
        extra: Fields,
    ) -> Result<Value> {
        let parent_folder_id = parent_folder_id.into();
        let mut required = Fields::new();
        required.insert("name".into(), json!(name));
        required.insert("parent_folder_id".into(), json!(parent_folder_id.as_str()));

        let body = merge_required(extra, None, required);
        Ok(or_null(self.api.post("folders", json_body(body)).await?))
    }
}
