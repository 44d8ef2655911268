use super::{execute, fetch, fetch_list};
use crate::error::Result;
use crate::transport::{segment, ApiRequest, Transport};
use nasctl_common::sharing::{CreateNfsExportRequest, ServiceStatus};
use nasctl_common::syslib::{
    CreateRaidArrayRequest, CreateZfsPoolRequest, RaidArray, SmartInfo, SmartTestType,
    ZfsDataset, ZfsPool, ZfsSnapshot, ZfsSnapshotRequest,
};
use nasctl_common::{NfsExport, SambaShare};
use serde_json::Value;
use std::sync::Arc;

/// `/syslib`: ZFS, RAID, SMART, Samba and NFS
#[derive(Clone)]
pub struct SyslibApi {
    transport: Arc<dyn Transport>,
}

impl SyslibApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Per-subsystem availability, as reported by the backend
    pub async fn health(&self) -> Result<Value> {
        fetch(&*self.transport, ApiRequest::get("/syslib/health")).await
    }

    // ZFS

    pub async fn list_zfs_pools(&self) -> Result<Vec<ZfsPool>> {
        fetch_list(&*self.transport, ApiRequest::get("/syslib/zfs/pools")).await
    }

    pub async fn get_zfs_pool(&self, name: &str) -> Result<ZfsPool> {
        let path = format!("/syslib/zfs/pools/{}", segment(name));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_zfs_pool(&self, req: &CreateZfsPoolRequest) -> Result<()> {
        let request = ApiRequest::post("/syslib/zfs/pools").json(req)?;
        execute(&*self.transport, request).await
    }

    pub async fn destroy_zfs_pool(&self, name: &str) -> Result<()> {
        let path = format!("/syslib/zfs/pools/{}", segment(name));
        execute(&*self.transport, ApiRequest::delete(path)).await
    }

    pub async fn scrub_zfs_pool(&self, name: &str) -> Result<()> {
        let path = format!("/syslib/zfs/pools/{}/scrub", segment(name));
        execute(&*self.transport, ApiRequest::post(path)).await
    }

    pub async fn list_zfs_datasets(&self, pool: &str) -> Result<Vec<ZfsDataset>> {
        let path = format!("/syslib/zfs/pools/{}/datasets", segment(pool));
        fetch_list(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_zfs_snapshot(&self, req: &ZfsSnapshotRequest) -> Result<()> {
        let request = ApiRequest::post("/syslib/zfs/snapshots").json(req)?;
        execute(&*self.transport, request).await
    }

    pub async fn list_zfs_snapshots(&self, dataset: &str) -> Result<Vec<ZfsSnapshot>> {
        let path = format!("/syslib/zfs/datasets/{}/snapshots", segment(dataset));
        fetch_list(&*self.transport, ApiRequest::get(path)).await
    }

    // RAID

    pub async fn list_raid_arrays(&self) -> Result<Vec<RaidArray>> {
        fetch_list(&*self.transport, ApiRequest::get("/syslib/raid/arrays")).await
    }

    pub async fn get_raid_array(&self, name: &str) -> Result<RaidArray> {
        let path = format!("/syslib/raid/arrays/{}", segment(name));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_raid_array(&self, req: &CreateRaidArrayRequest) -> Result<()> {
        let request = ApiRequest::post("/syslib/raid/arrays").json(req)?;
        execute(&*self.transport, request).await
    }

    // SMART

    /// `device` is the kernel name, e.g. `sda`
    pub async fn get_smart_info(&self, device: &str) -> Result<SmartInfo> {
        let path = format!("/syslib/smart/{}", segment(device));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn run_smart_test(&self, device: &str, test: SmartTestType) -> Result<()> {
        let path = format!("/syslib/smart/{}/test", segment(device));
        let request = ApiRequest::post(path).query("type", test.as_str());
        execute(&*self.transport, request).await
    }

    // Samba

    pub async fn samba_status(&self) -> Result<ServiceStatus> {
        fetch(&*self.transport, ApiRequest::get("/syslib/samba/status")).await
    }

    pub async fn restart_samba(&self) -> Result<()> {
        execute(&*self.transport, ApiRequest::post("/syslib/samba/restart")).await
    }

    pub async fn list_samba_shares(&self) -> Result<Vec<SambaShare>> {
        fetch_list(&*self.transport, ApiRequest::get("/syslib/samba/shares")).await
    }

    pub async fn get_samba_share(&self, name: &str) -> Result<SambaShare> {
        let path = format!("/syslib/samba/shares/{}", segment(name));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_samba_share(&self, share: &SambaShare) -> Result<()> {
        let request = ApiRequest::post("/syslib/samba/shares").json(share)?;
        execute(&*self.transport, request).await
    }

    pub async fn update_samba_share(&self, name: &str, share: &SambaShare) -> Result<()> {
        let path = format!("/syslib/samba/shares/{}", segment(name));
        let request = ApiRequest::put(path).json(share)?;
        execute(&*self.transport, request).await
    }

    pub async fn delete_samba_share(&self, name: &str) -> Result<()> {
        let path = format!("/syslib/samba/shares/{}", segment(name));
        execute(&*self.transport, ApiRequest::delete(path)).await
    }

    // NFS

    pub async fn restart_nfs(&self) -> Result<()> {
        execute(&*self.transport, ApiRequest::post("/syslib/nfs/restart")).await
    }

    pub async fn list_nfs_exports(&self) -> Result<Vec<NfsExport>> {
        fetch_list(&*self.transport, ApiRequest::get("/syslib/nfs/exports")).await
    }

    pub async fn create_nfs_export(&self, req: &CreateNfsExportRequest) -> Result<()> {
        let request = ApiRequest::post("/syslib/nfs/exports").json(req)?;
        execute(&*self.transport, request).await
    }

    /// Exports are keyed by path, passed as a query parameter
    pub async fn delete_nfs_export(&self, path: &str) -> Result<()> {
        let request = ApiRequest::delete("/syslib/nfs/exports").query("path", path);
        execute(&*self.transport, request).await
    }
}
