use super::{fetch, fetch_list};
use crate::error::Result;
use crate::transport::{ApiRequest, Transport};
use nasctl_common::system::{DnsConfig, NetworkInterface};
use std::sync::Arc;

/// `/network`, read only
#[derive(Clone)]
pub struct NetworkApi {
    transport: Arc<dyn Transport>,
}

impl NetworkApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn interfaces(&self) -> Result<Vec<NetworkInterface>> {
        fetch_list(&*self.transport, ApiRequest::get("/network/interfaces")).await
    }

    pub async fn dns(&self) -> Result<DnsConfig> {
        fetch(&*self.transport, ApiRequest::get("/network/dns")).await
    }
}
