use super::{execute, fetch, fetch_list};
use crate::error::Result;
use crate::transport::{segment, ApiRequest, Transport};
use nasctl_common::system::{CreatePeerRequest, VpnProtocol, VpnProtocolStatus, WireGuardPeer};
use std::sync::Arc;

/// `/vpn`
#[derive(Clone)]
pub struct VpnApi {
    transport: Arc<dyn Transport>,
}

impl VpnApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// State of every protocol the backend knows
    pub async fn status(&self) -> Result<Vec<VpnProtocolStatus>> {
        fetch_list(&*self.transport, ApiRequest::get("/vpn/status")).await
    }

    pub async fn protocol(&self, protocol: VpnProtocol) -> Result<VpnProtocolStatus> {
        let path = format!("/vpn/protocols/{}", protocol);
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn install(&self, protocol: VpnProtocol) -> Result<()> {
        self.protocol_action(protocol, "install").await
    }

    pub async fn enable(&self, protocol: VpnProtocol) -> Result<()> {
        self.protocol_action(protocol, "enable").await
    }

    pub async fn disable(&self, protocol: VpnProtocol) -> Result<()> {
        self.protocol_action(protocol, "disable").await
    }

    async fn protocol_action(&self, protocol: VpnProtocol, action: &str) -> Result<()> {
        let path = format!("/vpn/protocols/{}/{}", protocol, action);
        execute(&*self.transport, ApiRequest::post(path)).await
    }

    pub async fn list_peers(&self) -> Result<Vec<WireGuardPeer>> {
        fetch_list(&*self.transport, ApiRequest::get("/vpn/wireguard/peers")).await
    }

    pub async fn create_peer(&self, req: &CreatePeerRequest) -> Result<WireGuardPeer> {
        let request = ApiRequest::post("/vpn/wireguard/peers").json(req)?;
        fetch(&*self.transport, request).await
    }

    pub async fn delete_peer(&self, id: &str) -> Result<()> {
        let path = format!("/vpn/wireguard/peers/{}", segment(id));
        execute(&*self.transport, ApiRequest::delete(path)).await
    }
}
