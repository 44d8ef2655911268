use super::{execute, fetch};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::system::{UpsConfig, UpsStatus};
use std::sync::Arc;

/// `/ups`
#[derive(Clone)]
pub struct UpsApi {
    transport: Arc<dyn Transport>,
}

impl UpsApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn config(&self) -> Result<UpsConfig> {
        fetch(&*self.transport, ApiRequest::get("/ups/config")).await
    }

    pub async fn update_config(&self, config: &UpsConfig) -> Result<()> {
        execute(&*self.transport, ApiRequest::put("/ups/config").json(config)?).await
    }

    pub async fn status(&self) -> Result<UpsStatus> {
        fetch(&*self.transport, ApiRequest::get("/ups/status")).await
    }
}
