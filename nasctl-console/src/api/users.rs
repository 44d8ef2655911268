use super::{execute, fetch, fetch_list};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::accounts::{CreateUserRequest, UpdateUserRequest, User};
use std::sync::Arc;

/// `/users`
#[derive(Clone)]
pub struct UsersApi {
    transport: Arc<dyn Transport>,
}

impl UsersApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<User>> {
        fetch_list(&*self.transport, ApiRequest::get("/users")).await
    }

    pub async fn get(&self, id: u64) -> Result<User> {
        fetch(&*self.transport, ApiRequest::get(format!("/users/{}", id))).await
    }

    pub async fn create(&self, req: &CreateUserRequest) -> Result<User> {
        fetch(&*self.transport, ApiRequest::post("/users").json(req)?).await
    }

    pub async fn update(&self, id: u64, req: &UpdateUserRequest) -> Result<User> {
        let request = ApiRequest::put(format!("/users/{}", id)).json(req)?;
        fetch(&*self.transport, request).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        execute(&*self.transport, ApiRequest::delete(format!("/users/{}", id))).await
    }
}
