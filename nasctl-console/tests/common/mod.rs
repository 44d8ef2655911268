//! Common test utilities and helpers

#![allow(dead_code)]

use async_trait::async_trait;
use nasctl_console::{ApiRequest, ConsoleError, Method, NasApi, Result, Transport};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// In-memory backend: canned replies per route, every request recorded
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<(Method, String), Result<Value>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Reply `success: true` with `data`
    pub fn respond(&self, method: Method, path: &str, data: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(data));
    }

    /// Reply `success: false` with `message`
    pub fn reject(&self, method: Method, path: &str, message: &str) {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Err(ConsoleError::rejected(message)),
        );
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value> {
        let key = (request.method, request.path.clone());
        self.log.lock().unwrap().push(request);

        let reply = self.routes.lock().unwrap().get(&key).cloned();
        reply.unwrap_or_else(|| {
            Err(ConsoleError::Request(format!(
                "404 Not Found - no route for {} {}",
                key.0, key.1
            )))
        })
    }
}

/// Typed clients over `fake`
pub fn api(fake: &Arc<FakeTransport>) -> NasApi {
    NasApi::new(fake.clone())
}

pub fn sample_exports() -> Value {
    json!([
        {
            "path": "/srv/media",
            "clients": ["192.168.1.0/24"],
            "options": ["rw", "sync", "no_subtree_check"],
            "read_only": false,
            "sync": true,
            "no_root_squash": false,
            "subtree": false
        },
        {
            "path": "/srv/backup",
            "clients": ["10.0.0.5"],
            "options": ["ro", "sync", "no_subtree_check"],
            "read_only": true,
            "sync": true,
            "no_root_squash": false,
            "subtree": false
        }
    ])
}

pub fn sample_shares() -> Value {
    json!([
        {
            "name": "media",
            "path": "/srv/media",
            "comment": "Family media",
            "valid_users": ["alice"],
            "valid_groups": null,
            "read_only": false,
            "browseable": true,
            "guest_ok": false,
            "recycle_bin": true
        }
    ])
}

pub fn sample_pools() -> Value {
    json!([
        {
            "name": "tank",
            "size": 4000000000000u64,
            "allocated": 1000000000000u64,
            "free": 3000000000000u64,
            "capacity": 25.0,
            "health": "ONLINE"
        }
    ])
}
