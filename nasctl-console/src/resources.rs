//! Backend collections wired up for panels and dialogs

use crate::api::{BackupApi, GroupsApi, StorageApi, SyslibApi, TasksApi, UsersApi};
use crate::error::{ConsoleError, Result};
use crate::forms::{require, Editable, NfsDraft, SambaDraft};
use crate::panels::{Collection, ListPanel};
use async_trait::async_trait;
use nasctl_common::accounts::{CreateGroupRequest, CreateUserRequest, Group, UpdateUserRequest, User};
use nasctl_common::jobs::{BackupJob, BackupJobRequest, ScheduledTask, TaskRequest};
use nasctl_common::storage::{CreateShareRequest, Disk, Share, Volume};
use nasctl_common::syslib::{RaidArray, ZfsPool};
use nasctl_common::{NfsExport, SambaShare};
use tracing::{info, warn};

// NFS exports

#[derive(Clone)]
pub struct NfsExports {
    api: SyslibApi,
}

impl NfsExports {
    pub fn new(api: SyslibApi) -> Self {
        Self { api }
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.api.delete_nfs_export(path).await?;
        info!(path, "NFS export deleted");
        Ok(())
    }

    pub async fn restart_service(&self) -> Result<()> {
        self.api.restart_nfs().await?;
        info!("NFS server restarted");
        Ok(())
    }
}

#[async_trait]
impl Collection for NfsExports {
    type Item = NfsExport;
    type Key = String;
    const NAME: &'static str = "nfs_exports";

    fn key_of(item: &NfsExport) -> String {
        item.path.clone()
    }

    async fn fetch(&self) -> Result<Vec<NfsExport>> {
        self.api.list_nfs_exports().await
    }
}

#[async_trait]
impl Editable for NfsExports {
    type Draft = NfsDraft;

    fn draft_from(item: &NfsExport) -> NfsDraft {
        NfsDraft::from(item)
    }

    fn validate(draft: &NfsDraft) -> std::result::Result<(), String> {
        draft.validate()
    }

    async fn create(&self, draft: &NfsDraft) -> Result<()> {
        self.api.create_nfs_export(&draft.request()).await?;
        info!(path = %draft.path, "NFS export created");
        Ok(())
    }

    /// There is no update endpoint; the old export is removed and the draft
    /// created in its place. A failed create after the removal comes back
    /// as [`ConsoleError::Removed`].
    async fn update(&self, key: &String, draft: &NfsDraft) -> Result<()> {
        self.api.delete_nfs_export(key).await?;
        if let Err(err) = self.api.create_nfs_export(&draft.request()).await {
            warn!(old_path = %key, path = %draft.path, "Export removed but re-create failed");
            return Err(ConsoleError::Removed(Box::new(err)));
        }
        info!(old_path = %key, path = %draft.path, "NFS export replaced");
        Ok(())
    }
}

impl ListPanel<NfsExports> {
    pub async fn delete(&mut self, path: &str) -> Result<()> {
        let path = path.to_string();
        self.run(move |svc| async move { svc.delete(&path).await }).await
    }

    pub async fn restart_service(&mut self) -> Result<()> {
        self.run(|svc| async move { svc.restart_service().await }).await
    }
}

// Samba shares

#[derive(Clone)]
pub struct SambaShares {
    api: SyslibApi,
}

impl SambaShares {
    pub fn new(api: SyslibApi) -> Self {
        Self { api }
    }

    pub async fn delete(&self, name: &str) -> Result<()> {
        self.api.delete_samba_share(name).await?;
        info!(name, "Samba share deleted");
        Ok(())
    }

    pub async fn restart_service(&self) -> Result<()> {
        self.api.restart_samba().await?;
        info!("Samba restarted");
        Ok(())
    }
}

#[async_trait]
impl Collection for SambaShares {
    type Item = SambaShare;
    type Key = String;
    const NAME: &'static str = "samba_shares";

    fn key_of(item: &SambaShare) -> String {
        item.name.clone()
    }

    async fn fetch(&self) -> Result<Vec<SambaShare>> {
        self.api.list_samba_shares().await
    }
}

#[async_trait]
impl Editable for SambaShares {
    type Draft = SambaDraft;

    fn draft_from(item: &SambaShare) -> SambaDraft {
        SambaDraft::from(item)
    }

    fn validate(draft: &SambaDraft) -> std::result::Result<(), String> {
        draft.validate()
    }

    async fn create(&self, draft: &SambaDraft) -> Result<()> {
        self.api.create_samba_share(&draft.to_share()).await?;
        info!(name = %draft.name, "Samba share created");
        Ok(())
    }

    async fn update(&self, key: &String, draft: &SambaDraft) -> Result<()> {
        self.api.update_samba_share(key, &draft.to_share()).await?;
        info!(name = %key, "Samba share updated");
        Ok(())
    }
}

impl ListPanel<SambaShares> {
    pub async fn delete(&mut self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.run(move |svc| async move { svc.delete(&name).await }).await
    }

    pub async fn restart_service(&mut self) -> Result<()> {
        self.run(|svc| async move { svc.restart_service().await }).await
    }
}

// Managed shares

#[derive(Clone)]
pub struct ManagedShares {
    api: StorageApi,
}

impl ManagedShares {
    pub fn new(api: StorageApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for ManagedShares {
    type Item = Share;
    type Key = String;
    const NAME: &'static str = "shares";

    fn key_of(item: &Share) -> String {
        item.id.clone()
    }

    async fn fetch(&self) -> Result<Vec<Share>> {
        self.api.list_shares().await
    }
}

#[async_trait]
impl Editable for ManagedShares {
    type Draft = CreateShareRequest;

    fn draft_from(item: &Share) -> CreateShareRequest {
        CreateShareRequest {
            name: item.name.clone(),
            volume_id: item.volume_id.clone(),
            path: Some(item.path.clone()),
            share_type: Some(item.share_type),
            description: item.description.clone(),
            read_only: item.read_only,
            browseable: item.browseable,
            guest_ok: item.guest_ok,
            valid_users: item.valid_users.clone(),
            valid_groups: item.valid_groups.clone(),
        }
    }

    fn validate(draft: &CreateShareRequest) -> std::result::Result<(), String> {
        require(&draft.name, "Share name is required")?;
        if draft.share_type.is_none() {
            return Err("Share type is required".to_string());
        }
        let has_path = draft.path.as_deref().is_some_and(|p| !p.trim().is_empty());
        if !has_path && draft.volume_id.is_none() {
            return Err("A path or a volume is required".to_string());
        }
        Ok(())
    }

    async fn create(&self, draft: &CreateShareRequest) -> Result<()> {
        self.api.create_share(draft).await?;
        info!(name = %draft.name, "Share created");
        Ok(())
    }

    async fn update(&self, key: &String, draft: &CreateShareRequest) -> Result<()> {
        self.api.update_share(key, draft).await?;
        info!(id = %key, "Share updated");
        Ok(())
    }
}

impl ListPanel<ManagedShares> {
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |svc| async move { svc.api.delete_share(&id).await }).await
    }

    pub async fn set_enabled(&mut self, id: &str, enabled: bool) -> Result<()> {
        let id = id.to_string();
        self.run(move |svc| async move { svc.api.set_share_enabled(&id, enabled).await })
            .await
    }
}

// ZFS pools

#[derive(Clone)]
pub struct ZfsPools {
    api: SyslibApi,
}

impl ZfsPools {
    pub fn new(api: SyslibApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for ZfsPools {
    type Item = ZfsPool;
    type Key = String;
    const NAME: &'static str = "zfs_pools";

    fn key_of(item: &ZfsPool) -> String {
        item.name.clone()
    }

    async fn fetch(&self) -> Result<Vec<ZfsPool>> {
        self.api.list_zfs_pools().await
    }
}

impl ListPanel<ZfsPools> {
    pub async fn scrub(&mut self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.run(move |svc| async move {
            svc.api.scrub_zfs_pool(&name).await?;
            info!(pool = %name, "Scrub started");
            Ok(())
        })
        .await
    }

    pub async fn destroy(&mut self, name: &str) -> Result<()> {
        let name = name.to_string();
        self.run(move |svc| async move {
            svc.api.destroy_zfs_pool(&name).await?;
            info!(pool = %name, "Pool destroyed");
            Ok(())
        })
        .await
    }
}

// RAID arrays

#[derive(Clone)]
pub struct RaidArrays {
    api: SyslibApi,
}

impl RaidArrays {
    pub fn new(api: SyslibApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for RaidArrays {
    type Item = RaidArray;
    type Key = String;
    const NAME: &'static str = "raid_arrays";

    fn key_of(item: &RaidArray) -> String {
        item.name.clone()
    }

    async fn fetch(&self) -> Result<Vec<RaidArray>> {
        self.api.list_raid_arrays().await
    }
}

// Disks

#[derive(Clone)]
pub struct Disks {
    api: StorageApi,
}

impl Disks {
    pub fn new(api: StorageApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for Disks {
    type Item = Disk;
    type Key = String;
    const NAME: &'static str = "disks";

    fn key_of(item: &Disk) -> String {
        item.name.clone()
    }

    async fn fetch(&self) -> Result<Vec<Disk>> {
        self.api.list_disks().await
    }
}

impl ListPanel<Disks> {
    pub async fn set_label(&mut self, name: &str, label: &str) -> Result<()> {
        let name = name.to_string();
        let label = label.to_string();
        self.run(move |svc| async move {
            svc.api.set_disk_label(&name, &label).await?;
            info!(disk = %name, label = %label, "Disk label set");
            Ok(())
        })
        .await
    }
}

// Volumes

#[derive(Clone)]
pub struct Volumes {
    api: StorageApi,
}

impl Volumes {
    pub fn new(api: StorageApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for Volumes {
    type Item = Volume;
    type Key = String;
    const NAME: &'static str = "volumes";

    fn key_of(item: &Volume) -> String {
        item.id.clone()
    }

    async fn fetch(&self) -> Result<Vec<Volume>> {
        self.api.list_volumes().await
    }
}

impl ListPanel<Volumes> {
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |svc| async move { svc.api.delete_volume(&id).await }).await
    }
}

// Users

#[derive(Clone)]
pub struct Users {
    api: UsersApi,
}

impl Users {
    pub fn new(api: UsersApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for Users {
    type Item = User;
    type Key = u64;
    const NAME: &'static str = "users";

    fn key_of(item: &User) -> u64 {
        item.id
    }

    async fn fetch(&self) -> Result<Vec<User>> {
        self.api.list().await
    }
}

#[async_trait]
impl Editable for Users {
    type Draft = CreateUserRequest;

    fn draft_from(item: &User) -> CreateUserRequest {
        CreateUserRequest {
            username: item.username.clone(),
            email: item.email.clone(),
            password: String::new(),
            full_name: item.full_name.clone(),
            role: item.role,
        }
    }

    fn validate(draft: &CreateUserRequest) -> std::result::Result<(), String> {
        require(&draft.username, "Username is required")?;
        require(&draft.email, "Email is required")
    }

    async fn create(&self, draft: &CreateUserRequest) -> Result<()> {
        let user = self.api.create(draft).await?;
        info!(id = user.id, username = %user.username, "User created");
        Ok(())
    }

    async fn update(&self, key: &u64, draft: &CreateUserRequest) -> Result<()> {
        self.api.update(*key, &UpdateUserRequest::from(draft.clone())).await?;
        info!(id = key, "User updated");
        Ok(())
    }
}

impl ListPanel<Users> {
    pub async fn delete(&mut self, id: u64) -> Result<()> {
        self.run(move |svc| async move { svc.api.delete(id).await }).await
    }
}

// Groups

#[derive(Clone)]
pub struct Groups {
    api: GroupsApi,
}

impl Groups {
    pub fn new(api: GroupsApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for Groups {
    type Item = Group;
    type Key = u64;
    const NAME: &'static str = "groups";

    fn key_of(item: &Group) -> u64 {
        item.id
    }

    async fn fetch(&self) -> Result<Vec<Group>> {
        self.api.list().await
    }
}

#[async_trait]
impl Editable for Groups {
    type Draft = CreateGroupRequest;

    fn draft_from(item: &Group) -> CreateGroupRequest {
        CreateGroupRequest {
            name: item.name.clone(),
            description: item.description.clone(),
        }
    }

    fn validate(draft: &CreateGroupRequest) -> std::result::Result<(), String> {
        require(&draft.name, "Group name is required")
    }

    async fn create(&self, draft: &CreateGroupRequest) -> Result<()> {
        let group = self.api.create(draft).await?;
        info!(id = group.id, name = %group.name, "Group created");
        Ok(())
    }

    async fn update(&self, key: &u64, draft: &CreateGroupRequest) -> Result<()> {
        self.api.update(*key, draft).await?;
        info!(id = key, "Group updated");
        Ok(())
    }
}

impl ListPanel<Groups> {
    pub async fn delete(&mut self, id: u64) -> Result<()> {
        self.run(move |svc| async move { svc.api.delete(id).await }).await
    }

    pub async fn add_member(&mut self, id: u64, user_id: u64) -> Result<()> {
        self.run(move |svc| async move { svc.api.add_member(id, user_id).await })
            .await
    }

    pub async fn remove_member(&mut self, id: u64, user_id: u64) -> Result<()> {
        self.run(move |svc| async move { svc.api.remove_member(id, user_id).await })
            .await
    }
}

// Backup jobs

#[derive(Clone)]
pub struct BackupJobs {
    api: BackupApi,
}

impl BackupJobs {
    pub fn new(api: BackupApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for BackupJobs {
    type Item = BackupJob;
    type Key = String;
    const NAME: &'static str = "backup_jobs";

    fn key_of(item: &BackupJob) -> String {
        item.id.clone()
    }

    async fn fetch(&self) -> Result<Vec<BackupJob>> {
        self.api.list_jobs().await
    }
}

#[async_trait]
impl Editable for BackupJobs {
    type Draft = BackupJobRequest;

    fn draft_from(item: &BackupJob) -> BackupJobRequest {
        BackupJobRequest::from(item)
    }

    fn validate(draft: &BackupJobRequest) -> std::result::Result<(), String> {
        require(&draft.name, "Job name is required")?;
        require(&draft.source, "Source is required")?;
        require(&draft.destination, "Destination is required")
    }

    async fn create(&self, draft: &BackupJobRequest) -> Result<()> {
        let job = self.api.create_job(draft).await?;
        info!(id = %job.id, name = %job.name, "Backup job created");
        Ok(())
    }

    async fn update(&self, key: &String, draft: &BackupJobRequest) -> Result<()> {
        self.api.update_job(key, draft).await?;
        info!(id = %key, "Backup job updated");
        Ok(())
    }
}

impl ListPanel<BackupJobs> {
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |svc| async move { svc.api.delete_job(&id).await }).await
    }

    pub async fn run_now(&mut self, id: &str) -> Result<()> {
        let id = id.to_string();
        self.run(move |svc| async move {
            let history = svc.api.run_job(&id).await?;
            info!(job = %id, run = %history.id, "Backup started");
            Ok(())
        })
        .await
    }
}

// Scheduled tasks

#[derive(Clone)]
pub struct ScheduledTasks {
    api: TasksApi,
}

impl ScheduledTasks {
    pub fn new(api: TasksApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl Collection for ScheduledTasks {
    type Item = ScheduledTask;
    type Key = u64;
    const NAME: &'static str = "tasks";

    fn key_of(item: &ScheduledTask) -> u64 {
        item.id
    }

    async fn fetch(&self) -> Result<Vec<ScheduledTask>> {
        self.api.list().await
    }
}

#[async_trait]
impl Editable for ScheduledTasks {
    type Draft = TaskRequest;

    fn draft_from(item: &ScheduledTask) -> TaskRequest {
        TaskRequest::from(item)
    }

    fn validate(draft: &TaskRequest) -> std::result::Result<(), String> {
        require(&draft.name, "Task name is required")?;
        require(&draft.cron_expression, "Cron expression is required")?;
        require(&draft.task_type, "Task type is required")
    }

    async fn create(&self, draft: &TaskRequest) -> Result<()> {
        let task = self.api.create(draft).await?;
        info!(id = task.id, name = %task.name, "Task created");
        Ok(())
    }

    async fn update(&self, key: &u64, draft: &TaskRequest) -> Result<()> {
        self.api.update(*key, draft).await?;
        info!(id = key, "Task updated");
        Ok(())
    }
}

impl ListPanel<ScheduledTasks> {
    pub async fn delete(&mut self, id: u64) -> Result<()> {
        self.run(move |svc| async move { svc.api.delete(id).await }).await
    }

    pub async fn run_now(&mut self, id: u64) -> Result<()> {
        self.run(move |svc| async move { svc.api.run_now(id).await }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nasctl_common::storage::ShareType;

    #[test]
    fn test_managed_share_validation() {
        let mut draft = CreateShareRequest {
            name: "docs".to_string(),
            ..Default::default()
        };
        assert_eq!(
            ManagedShares::validate(&draft),
            Err("Share type is required".to_string())
        );

        draft.share_type = Some(ShareType::Smb);
        assert_eq!(
            ManagedShares::validate(&draft),
            Err("A path or a volume is required".to_string())
        );

        draft.path = Some("/srv/docs".to_string());
        assert!(ManagedShares::validate(&draft).is_ok());
    }

    #[test]
    fn test_task_validation() {
        let mut draft = TaskRequest {
            name: "cleanup".to_string(),
            ..Default::default()
        };
        assert_eq!(
            ScheduledTasks::validate(&draft),
            Err("Cron expression is required".to_string())
        );
        draft.cron_expression = "0 3 * * *".to_string();
        assert!(ScheduledTasks::validate(&draft).is_ok());
    }

    #[test]
    fn test_user_draft_from_item_has_blank_password() {
        let user: User = serde_json::from_str(
            r#"{"id":5,"username":"carol","email":"carol@example.com","role":"guest"}"#,
        )
        .unwrap();
        let draft = Users::draft_from(&user);
        assert!(draft.password.is_empty());
        assert!(Users::validate(&draft).is_ok());
        assert_eq!(Users::key_of(&user), 5);
    }
}
