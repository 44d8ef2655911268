//! List panel fetch/act/re-fetch cycle against a fake backend

mod common;

use common::{api, sample_exports, sample_pools, sample_shares, FakeTransport};
use nasctl_console::loaders;
use nasctl_console::resources::{Disks, NfsExports, SambaShares, ScheduledTasks, ZfsPools};
use nasctl_console::{ListPanel, Method};
use serde_json::json;
use std::sync::Arc;

const EXPORTS: &str = "/syslib/nfs/exports";

#[tokio::test]
async fn test_successful_delete_refetches_exactly_once() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, EXPORTS, sample_exports());
    fake.respond(Method::Delete, EXPORTS, json!({"message": "NFS export deleted"}));

    let mut panel = ListPanel::new(Arc::new(NfsExports::new(api(&fake).syslib)));
    assert!(panel.mount().await);
    assert_eq!(panel.items().len(), 2);
    fake.clear_log();

    panel.delete("/srv/backup").await.unwrap();

    let requests = fake.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::Delete);
    assert_eq!(
        requests[0].query,
        vec![("path".to_string(), "/srv/backup".to_string())]
    );
    assert_eq!(fake.count(Method::Get, EXPORTS), 1);
}

#[tokio::test]
async fn test_failed_delete_shows_error_without_refetch() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, EXPORTS, sample_exports());
    fake.reject(Method::Delete, EXPORTS, "Failed to delete export");

    let mut panel = ListPanel::new(Arc::new(NfsExports::new(api(&fake).syslib)));
    panel.mount().await;
    fake.clear_log();

    let result = panel.delete("/srv/media").await;
    assert!(result.is_err());
    assert_eq!(panel.error(), Some("Failed to delete export"));
    assert_eq!(panel.items().len(), 2);
    assert_eq!(fake.count(Method::Get, EXPORTS), 0);
}

#[tokio::test]
async fn test_restart_service_then_refetch() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/syslib/samba/shares", sample_shares());
    fake.respond(
        Method::Post,
        "/syslib/samba/restart",
        json!({"message": "Samba restarted successfully"}),
    );

    let mut panel = ListPanel::new(Arc::new(SambaShares::new(api(&fake).syslib)));
    panel.mount().await;
    panel.restart_service().await.unwrap();

    assert_eq!(fake.count(Method::Post, "/syslib/samba/restart"), 1);
    assert_eq!(fake.count(Method::Get, "/syslib/samba/shares"), 2);
    let share = panel.find(&"media".to_string()).unwrap();
    assert!(share.valid_groups.is_empty());
    assert!(share.recycle_bin);
}

#[tokio::test]
async fn test_zfs_scrub_and_destroy() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/syslib/zfs/pools", sample_pools());
    fake.respond(
        Method::Post,
        "/syslib/zfs/pools/tank/scrub",
        json!({"message": "ZFS pool scrub started"}),
    );
    fake.reject(Method::Delete, "/syslib/zfs/pools/tank", "pool is busy");

    let mut panel = ListPanel::new(Arc::new(ZfsPools::new(api(&fake).syslib)));
    panel.mount().await;

    panel.scrub("tank").await.unwrap();
    assert_eq!(fake.count(Method::Get, "/syslib/zfs/pools"), 2);

    assert!(panel.destroy("tank").await.is_err());
    assert_eq!(panel.error(), Some("pool is busy"));
    assert_eq!(fake.count(Method::Get, "/syslib/zfs/pools"), 2);
}

#[tokio::test]
async fn test_disk_label_sends_body() {
    let fake = FakeTransport::new();
    fake.respond(
        Method::Get,
        "/storage/disks",
        json!([{"name": "sdb", "path": "/dev/sdb", "type": "ssd", "status": "healthy"}]),
    );
    fake.respond(Method::Put, "/storage/disks/sdb/label", json!(null));

    let mut panel = ListPanel::new(Arc::new(Disks::new(api(&fake).storage)));
    panel.mount().await;
    panel.set_label("sdb", "Fast scratch").await.unwrap();

    let put = fake
        .requests()
        .into_iter()
        .find(|r| r.method == Method::Put)
        .unwrap();
    assert_eq!(put.body.unwrap(), json!({"label": "Fast scratch"}));
    assert_eq!(fake.count(Method::Get, "/storage/disks"), 2);
}

#[tokio::test]
async fn test_tasks_panel_unwraps_page() {
    let fake = FakeTransport::new();
    fake.respond(
        Method::Get,
        "/tasks",
        json!({
            "tasks": [{"id": 4, "name": "cleanup", "taskType": "cleanup", "cronExpression": "0 3 * * *", "enabled": true}],
            "total": 1,
            "offset": 0,
            "limit": 50
        }),
    );
    fake.respond(Method::Post, "/tasks/4/run", json!({"message": "Task started"}));

    let mut panel = ListPanel::new(Arc::new(ScheduledTasks::new(api(&fake).tasks)));
    panel.mount().await;
    assert_eq!(panel.items()[0].cron_expression, "0 3 * * *");

    panel.run_now(4).await.unwrap();
    assert_eq!(fake.count(Method::Get, "/tasks"), 2);
}

#[tokio::test]
async fn test_null_collection_is_empty() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, "/syslib/raid/arrays", json!(null));

    let arrays = loaders::load_raid_arrays(&api(&fake).syslib).await.unwrap();
    assert!(arrays.is_empty());
}

#[tokio::test]
async fn test_loaders_return_message() {
    let fake = FakeTransport::new();
    fake.reject(Method::Get, "/syslib/zfs/pools", "ZFS not available");
    fake.respond(Method::Get, "/syslib/smart/sda", json!({"device": "/dev/sda", "smart_status": "PASSED"}));

    let nas = api(&fake);
    assert_eq!(
        loaders::load_zfs_pools(&nas.syslib).await.unwrap_err(),
        "ZFS not available"
    );
    assert!(loaders::load_smart(&nas.syslib, "sda").await.unwrap().passed());

    let err = loaders::load_users(&nas.users).await.unwrap_err();
    assert_eq!(err, "Request failed: 404 Not Found - no route for GET /users");
}

#[tokio::test]
async fn test_generic_load() {
    let fake = FakeTransport::new();
    fake.respond(Method::Get, EXPORTS, sample_exports());

    let exports = loaders::load(&NfsExports::new(api(&fake).syslib)).await.unwrap();
    assert_eq!(exports[1].export_line(), "/srv/backup 10.0.0.5(ro,sync,no_subtree_check)");
}
