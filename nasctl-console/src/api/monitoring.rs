use super::{execute, fetch};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::system::MonitoringConfig;
use std::sync::Arc;

/// `/monitoring`
#[derive(Clone)]
pub struct MonitoringApi {
    transport: Arc<dyn Transport>,
}

impl MonitoringApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn config(&self) -> Result<MonitoringConfig> {
        fetch(&*self.transport, ApiRequest::get("/monitoring/config")).await
    }

    pub async fn update_config(&self, config: &MonitoringConfig) -> Result<()> {
        let request = ApiRequest::put("/monitoring/config").json(config)?;
        execute(&*self.transport, request).await
    }
}
