//! HTTP client against a mock server

use mockito::{Matcher, Server};
use nasctl_common::sharing::CreateNfsExportRequest;
use nasctl_common::NfsExport;
use nasctl_console::{ApiClient, ConsoleError, NasApi};
use serde_json::json;
use std::sync::Arc;

fn nas(client: &Arc<ApiClient>) -> NasApi {
    NasApi::new(client.clone())
}

#[tokio::test]
async fn test_list_decodes_envelope_data() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/syslib/nfs/exports")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "success": true,
                "data": [{"path": "/srv/media", "clients": ["*"], "options": ["rw", "async"]}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let exports = nas(&client).syslib.list_nfs_exports().await.unwrap();

    mock.assert_async().await;
    assert_eq!(exports.len(), 1);
    assert_eq!(exports[0].export_line(), "/srv/media *(rw,async)");
}

#[tokio::test]
async fn test_rejection_carries_server_message() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/syslib/nfs/exports")
        .with_status(400)
        .with_body(
            json!({"success": false, "error": {"code": 400, "message": "Path already exists"}})
                .to_string(),
        )
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let mut export = NfsExport::new("/srv/media");
    export.clients.push("*".to_string());
    let req = CreateNfsExportRequest::from(&export);
    let err = nas(&client).syslib.create_nfs_export(&req).await.unwrap_err();

    assert_eq!(
        err,
        ConsoleError::Rejected {
            code: Some(400),
            message: "Path already exists".to_string()
        }
    );
    assert_eq!(err.user_message(), "Path already exists");
}

#[tokio::test]
async fn test_bearer_token_is_sent() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v1/users")
        .match_header("authorization", "Bearer abc")
        .with_status(200)
        .with_body(r#"{"success":true,"data":[]}"#)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    client.set_token("abc".to_string()).await;
    let users = nas(&client).users.list().await.unwrap();

    mock.assert_async().await;
    assert!(users.is_empty());
}

#[tokio::test]
async fn test_nfs_delete_encodes_path_query() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("DELETE", "/api/v1/syslib/nfs/exports")
        .match_query(Matcher::UrlEncoded(
            "path".into(),
            "/srv/my media".into(),
        ))
        .with_status(200)
        .with_body(r#"{"success":true,"data":{"message":"NFS export deleted"}}"#)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    nas(&client)
        .syslib
        .delete_nfs_export("/srv/my media")
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_envelope_error_body() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/api/v1/syslib/zfs/pools")
        .with_status(502)
        .with_body("Bad Gateway")
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let err = nas(&client).syslib.list_zfs_pools().await.unwrap_err();

    match err {
        ConsoleError::Request(message) => {
            assert!(message.starts_with("502"));
            assert!(message.ends_with("Bad Gateway"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_installs_token() {
    let mut server = Server::new_async().await;
    let login = server
        .mock("POST", "/api/v1/auth/login")
        .match_body(Matcher::Json(json!({"username": "admin", "password": "secret"})))
        .with_status(200)
        .with_body(
            json!({
                "success": true,
                "data": {
                    "requires2FA": false,
                    "accessToken": "tok-1",
                    "refreshToken": "ref-1",
                    "user": {"id": 1, "username": "admin", "role": "admin"}
                }
            })
            .to_string(),
        )
        .create_async()
        .await;
    let me = server
        .mock("GET", "/api/v1/auth/me")
        .match_header("authorization", "Bearer tok-1")
        .with_status(200)
        .with_body(r#"{"success":true,"data":{"id":1,"username":"admin","role":"admin"}}"#)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let api = nas(&client);
    api.system.login_with(&client, "admin", "secret").await.unwrap();
    assert_eq!(client.get_token().await.as_deref(), Some("tok-1"));

    let user = api.system.me().await.unwrap();
    assert_eq!(user.username, "admin");

    login.assert_async().await;
    me.assert_async().await;
}

#[tokio::test]
async fn test_login_requiring_second_factor_is_refused() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/api/v1/auth/login")
        .with_status(200)
        .with_body(r#"{"success":true,"data":{"requires2FA":true,"userId":7}}"#)
        .create_async()
        .await;

    let client = Arc::new(ApiClient::new(&server.url()).unwrap());
    let err = nas(&client)
        .system
        .login_with(&client, "admin", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, ConsoleError::Validation(_)));
    assert_eq!(client.get_token().await, None);
}
