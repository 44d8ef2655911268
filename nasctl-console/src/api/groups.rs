use super::{execute, fetch, fetch_list};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::accounts::{AddMemberRequest, CreateGroupRequest, Group, User};
use std::sync::Arc;

/// `/groups`
#[derive(Clone)]
pub struct GroupsApi {
    transport: Arc<dyn Transport>,
}

impl GroupsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Group>> {
        fetch_list(&*self.transport, ApiRequest::get("/groups")).await
    }

    pub async fn get(&self, id: u64) -> Result<Group> {
        fetch(&*self.transport, ApiRequest::get(format!("/groups/{}", id))).await
    }

    pub async fn create(&self, req: &CreateGroupRequest) -> Result<Group> {
        fetch(&*self.transport, ApiRequest::post("/groups").json(req)?).await
    }

    pub async fn update(&self, id: u64, req: &CreateGroupRequest) -> Result<Group> {
        let request = ApiRequest::put(format!("/groups/{}", id)).json(req)?;
        fetch(&*self.transport, request).await
    }

    pub async fn delete(&self, id: u64) -> Result<()> {
        execute(&*self.transport, ApiRequest::delete(format!("/groups/{}", id))).await
    }

    pub async fn members(&self, id: u64) -> Result<Vec<User>> {
        fetch_list(&*self.transport, ApiRequest::get(format!("/groups/{}/members", id))).await
    }

    pub async fn add_member(&self, id: u64, user_id: u64) -> Result<()> {
        let request =
            ApiRequest::post(format!("/groups/{}/members", id)).json(&AddMemberRequest { user_id })?;
        execute(&*self.transport, request).await
    }

    pub async fn remove_member(&self, id: u64, user_id: u64) -> Result<()> {
        let path = format!("/groups/{}/members/{}", id, user_id);
        execute(&*self.transport, ApiRequest::delete(path)).await
    }
}
