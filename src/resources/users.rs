//! Users API

use std::sync::Arc;

use serde_json::Value;

use super::{Fields, fields_body, or_null, query::CourseListQuery};
use crate::{
    client::{CanvasApi, ItemStream, Params, Result},
    id::ItemId,
};

#[derive(Debug, Clone)]
pub struct Users {
    api: Arc<CanvasApi>,
}

impl Users {
    pub fn new(api: Arc<CanvasApi>) -> Self {
        Self { api }
    }

    /// The user owning the token
    pub async fn get_self(&self) -> Result<Value> {
        Ok(or_null(self.api.get("users/self", &[]).await?))
    }

    pub async fn get(&self, user_id: impl Into<ItemId>) -> Result<Value> {
        let user_id = user_id.into();
        Ok(or_null(self.api.get(&format!("users/{user_id}"), &[]).await?))
    }

    /// Courses of `user_id`; pass [`ItemId::current_user`] for the caller
    pub fn list_courses(
        &self,
        user_id: impl Into<ItemId>,
        query: &CourseListQuery,
    ) -> ItemStream<'_> {
        let user_id = user_id.into();
        self.api
            .paginate(format!("users/{user_id}/courses"), query.to_params())
    }

    pub fn list_enrollments(&self, user_id: impl Into<ItemId>) -> ItemStream<'_> {
        let user_id = user_id.into();
        self.api
            .paginate(format!("users/{user_id}/enrollments"), Params::new())
    }

    pub async fn update(&self, user_id: impl Into<ItemId>, fields: Fields) -> Result<Value> {
        let user_id = user_id.into();
        let updated = self
            .api
            .put(&format!("users/{user_id}"), fields_body(fields))
            .await?;
        Ok(or_null(updated))
    }
}
