use super::{execute, fetch};
use crate::client::ApiClient;
use crate::error::{ConsoleError, Result};
use crate::transport::{ApiRequest, Transport};
use nasctl_common::accounts::{LoginRequest, LoginResponse, User};
use nasctl_common::system::SystemInfo;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// `/system` and `/auth`
#[derive(Clone)]
pub struct SystemApi {
    transport: Arc<dyn Transport>,
}

impl SystemApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub async fn info(&self) -> Result<SystemInfo> {
        fetch(&*self.transport, ApiRequest::get("/system/info")).await
    }

    /// Version payload, shape varies between releases
    pub async fn version(&self) -> Result<Value> {
        fetch(&*self.transport, ApiRequest::get("/system/version")).await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse =
            fetch(&*self.transport, ApiRequest::post("/auth/login").json(&body)?).await?;

        if response.requires_2fa {
            info!(username, "Login requires a second factor");
        } else {
            info!(username, "Logged in");
        }
        Ok(response)
    }

    /// Log in and install the access token on `client`
    pub async fn login_with(
        &self,
        client: &ApiClient,
        username: &str,
        password: &str,
    ) -> Result<LoginResponse> {
        let response = self.login(username, password).await?;
        if response.requires_2fa {
            return Err(ConsoleError::Validation(
                "Two-factor authentication is required for this account".to_string(),
            ));
        }
        match response.access_token {
            Some(ref token) => client.set_token(token.clone()).await,
            None => return Err(ConsoleError::Decode("login response has no access token".to_string())),
        }
        Ok(response)
    }

    pub async fn logout(&self) -> Result<()> {
        execute(&*self.transport, ApiRequest::post("/auth/logout")).await
    }

    pub async fn me(&self) -> Result<User> {
        fetch(&*self.transport, ApiRequest::get("/auth/me")).await
    }
}
