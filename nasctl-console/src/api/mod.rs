//! Typed clients, one per backend area
//!
//! Every client wraps a shared [`Transport`] and turns envelope payloads
//! into the records from `nasctl-common`.

mod ad;
mod backup;
mod groups;
mod monitoring;
mod network;
mod storage;
mod syslib;
mod system;
mod tasks;
mod ups;
mod users;
mod vpn;

pub use ad::AdApi;
pub use backup::BackupApi;
pub use groups::GroupsApi;
pub use monitoring::MonitoringApi;
pub use network::NetworkApi;
pub use storage::StorageApi;
pub use syslib::SyslibApi;
pub use system::SystemApi;
pub use tasks::TasksApi;
pub use ups::UpsApi;
pub use users::UsersApi;
pub use vpn::VpnApi;

use crate::error::{ConsoleError, Result};
use crate::transport::{ApiRequest, Transport};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Send and decode `data` into `T`
pub(crate) async fn fetch<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> Result<T> {
    let data = transport.send(request).await?;
    decode(data)
}

/// Like [`fetch`], but a `null` payload is an empty list
pub(crate) async fn fetch_list<T: DeserializeOwned>(
    transport: &dyn Transport,
    request: ApiRequest,
) -> Result<Vec<T>> {
    match transport.send(request).await? {
        Value::Null => Ok(Vec::new()),
        data => decode(data),
    }
}

/// Send and ignore the payload
pub(crate) async fn execute(transport: &dyn Transport, request: ApiRequest) -> Result<()> {
    transport.send(request).await.map(|_| ())
}

fn decode<T: DeserializeOwned>(data: Value) -> Result<T> {
    serde_json::from_value(data).map_err(|e| ConsoleError::Decode(e.to_string()))
}

/// All clients over one transport
#[derive(Clone)]
pub struct NasApi {
    pub ad: AdApi,
    pub backup: BackupApi,
    pub groups: GroupsApi,
    pub monitoring: MonitoringApi,
    pub network: NetworkApi,
    pub storage: StorageApi,
    pub syslib: SyslibApi,
    pub system: SystemApi,
    pub tasks: TasksApi,
    pub ups: UpsApi,
    pub users: UsersApi,
    pub vpn: VpnApi,
}

impl NasApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            ad: AdApi::new(transport.clone()),
            backup: BackupApi::new(transport.clone()),
            groups: GroupsApi::new(transport.clone()),
            monitoring: MonitoringApi::new(transport.clone()),
            network: NetworkApi::new(transport.clone()),
            storage: StorageApi::new(transport.clone()),
            syslib: SyslibApi::new(transport.clone()),
            system: SystemApi::new(transport.clone()),
            tasks: TasksApi::new(transport.clone()),
            ups: UpsApi::new(transport.clone()),
            users: UsersApi::new(transport.clone()),
            vpn: VpnApi::new(transport),
        }
    }
}
