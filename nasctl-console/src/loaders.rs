//! Data loaders: one call, `Ok(data)` or the message to show

use crate::api::{GroupsApi, StorageApi, SyslibApi, UsersApi};
use crate::error::ConsoleError;
use crate::panels::Collection;
use nasctl_common::accounts::{Group, User};
use nasctl_common::storage::{Disk, StorageStats};
use nasctl_common::syslib::{RaidArray, SmartInfo, ZfsPool};
use nasctl_common::{NfsExport, SambaShare};

pub type LoadResult<T> = std::result::Result<T, String>;

fn message(err: ConsoleError) -> String {
    err.user_message()
}

/// Fetch any collection
pub async fn load<C: Collection>(collection: &C) -> LoadResult<Vec<C::Item>> {
    collection.fetch().await.map_err(message)
}

pub async fn load_nfs_exports(api: &SyslibApi) -> LoadResult<Vec<NfsExport>> {
    api.list_nfs_exports().await.map_err(message)
}

pub async fn load_samba_shares(api: &SyslibApi) -> LoadResult<Vec<SambaShare>> {
    api.list_samba_shares().await.map_err(message)
}

pub async fn load_raid_arrays(api: &SyslibApi) -> LoadResult<Vec<RaidArray>> {
    api.list_raid_arrays().await.map_err(message)
}

pub async fn load_zfs_pools(api: &SyslibApi) -> LoadResult<Vec<ZfsPool>> {
    api.list_zfs_pools().await.map_err(message)
}

pub async fn load_smart(api: &SyslibApi, device: &str) -> LoadResult<SmartInfo> {
    api.get_smart_info(device).await.map_err(message)
}

pub async fn load_disks(api: &StorageApi) -> LoadResult<Vec<Disk>> {
    api.list_disks().await.map_err(message)
}

pub async fn load_storage_stats(api: &StorageApi) -> LoadResult<StorageStats> {
    api.stats().await.map_err(message)
}

pub async fn load_users(api: &UsersApi) -> LoadResult<Vec<User>> {
    api.list().await.map_err(message)
}

pub async fn load_groups(api: &GroupsApi) -> LoadResult<Vec<Group>> {
    api.list().await.map_err(message)
}
