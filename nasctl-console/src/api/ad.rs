use super::{execute, fetch};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::system::{AdConfig, AdStatus};
use std::sync::Arc;

/// `/ad`: Active Directory client
#[derive(Clone)]
pub struct AdApi {
    transport: Arc<dyn Transport>,
}

impl AdApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn config(&self) -> Result<AdConfig> {
        fetch(&*self.transport, ApiRequest::get("/ad/config")).await
    }

    pub async fn update_config(&self, config: &AdConfig) -> Result<()> {
        execute(&*self.transport, ApiRequest::put("/ad/config").json(config)?).await
    }

    pub async fn status(&self) -> Result<AdStatus> {
        fetch(&*self.transport, ApiRequest::get("/ad/status")).await
    }

    /// Bind with the stored settings
    pub async fn test_connection(&self) -> Result<()> {
        execute(&*self.transport, ApiRequest::post("/ad/test")).await
    }
}
