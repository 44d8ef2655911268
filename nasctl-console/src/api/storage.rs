use super::{execute, fetch, fetch_list};
use crate::error::Result;
use crate::transport::{segment, ApiRequest, Transport};
use nasctl_common::storage::{
    CreateShareRequest, CreateVolumeRequest, Disk, DiskLabelRequest, FormatDiskRequest, Share,
    SmartData, StorageStats, Volume,
};
use std::sync::Arc;

/// `/storage`: disks, volumes and managed shares
#[derive(Clone)]
pub struct StorageApi {
    transport: Arc<dyn Transport>,
}

impl StorageApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn stats(&self) -> Result<StorageStats> {
        fetch(&*self.transport, ApiRequest::get("/storage/stats")).await
    }

    // Disks

    pub async fn list_disks(&self) -> Result<Vec<Disk>> {
        fetch_list(&*self.transport, ApiRequest::get("/storage/disks")).await
    }

    pub async fn get_disk(&self, name: &str) -> Result<Disk> {
        let path = format!("/storage/disks/{}", segment(name));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn disk_smart(&self, name: &str) -> Result<SmartData> {
        let path = format!("/storage/disks/{}/smart", segment(name));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn set_disk_label(&self, name: &str, label: &str) -> Result<()> {
        let path = format!("/storage/disks/{}/label", segment(name));
        let body = DiskLabelRequest {
            label: label.to_string(),
        };
        execute(&*self.transport, ApiRequest::put(path).json(&body)?).await
    }

    pub async fn format_disk(&self, req: &FormatDiskRequest) -> Result<()> {
        let request = ApiRequest::post("/storage/disks/format").json(req)?;
        execute(&*self.transport, request).await
    }

    // Volumes

    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        fetch_list(&*self.transport, ApiRequest::get("/storage/volumes")).await
    }

    pub async fn get_volume(&self, id: &str) -> Result<Volume> {
        let path = format!("/storage/volumes/{}", segment(id));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_volume(&self, req: &CreateVolumeRequest) -> Result<Volume> {
        let request = ApiRequest::post("/storage/volumes").json(req)?;
        fetch(&*self.transport, request).await
    }

    pub async fn delete_volume(&self, id: &str) -> Result<()> {
        let path = format!("/storage/volumes/{}", segment(id));
        execute(&*self.transport, ApiRequest::delete(path)).await
    }

    // Managed shares

    pub async fn list_shares(&self) -> Result<Vec<Share>> {
        fetch_list(&*self.transport, ApiRequest::get("/storage/shares")).await
    }

    pub async fn get_share(&self, id: &str) -> Result<Share> {
        let path = format!("/storage/shares/{}", segment(id));
        fetch(&*self.transport, ApiRequest::get(path)).await
    }

    pub async fn create_share(&self, req: &CreateShareRequest) -> Result<()> {
        let request = ApiRequest::post("/storage/shares").json(req)?;
        execute(&*self.transport, request).await
    }

    pub async fn update_share(&self, id: &str, req: &CreateShareRequest) -> Result<()> {
        let path = format!("/storage/shares/{}", segment(id));
        execute(&*self.transport, ApiRequest::put(path).json(req)?).await
    }

    pub async fn delete_share(&self, id: &str) -> Result<()> {
        let path = format!("/storage/shares/{}", segment(id));
        execute(&*self.transport, ApiRequest::delete(path)).await
    }

    pub async fn set_share_enabled(&self, id: &str, enabled: bool) -> Result<()> {
        let action = if enabled { "enable" } else { "disable" };
        let path = format!("/storage/shares/{}/{}", segment(id), action);
        execute(&*self.transport, ApiRequest::post(path)).await
    }
}
