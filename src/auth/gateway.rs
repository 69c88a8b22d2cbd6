//! 认证网关客户端
//!
//! 认证网关负责用户注册和登录，本服务只消费它签发的令牌。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, warn};

use super::{AuthError, LocalTokenIssuer};
use crate::config::AuthConfig;

/// 登录凭据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// 从 `LOGIN_TEST_USER` / `LOGIN_TEST_PASSWORD` 读取凭据
    pub fn from_env() -> Result<Self, AuthError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// 用给定的查找函数读取凭据，缺少任一变量时返回 [`AuthError::MissingCredentials`]
    pub fn from_env_with<F>(lookup: F) -> Result<Self, AuthError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let username = lookup("LOGIN_TEST_USER")
            .ok_or_else(|| AuthError::MissingCredentials("LOGIN_TEST_USER".to_string()))?;
        let password = lookup("LOGIN_TEST_PASSWORD")
            .ok_or_else(|| AuthError::MissingCredentials("LOGIN_TEST_PASSWORD".to_string()))?;
        Ok(Self::new(username, password))
    }
}

/// 令牌签发能力：给定凭据，产出可被校验的令牌
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn issue(&self, credentials: &Credentials) -> Result<String, AuthError>;
}

#[async_trait]
impl TokenIssuer for LocalTokenIssuer {
    async fn issue(&self, credentials: &Credentials) -> Result<String, AuthError> {
        if credentials.username.is_empty() || credentials.password.is_empty() {
            return Err(AuthError::LoginFailed("用户名和密码不能为空".to_string()));
        }
        self.issue_for(&credentials.username)
    }
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// 通过 HTTP 调用认证网关的 `/register` 与 `/login`
#[derive(Clone)]
pub struct AuthGatewayClient {
    client: reqwest::Client,
    base_url: String,
}

impl AuthGatewayClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        Self::new(
            config.gateway_url.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 注册用户，网关拒绝时返回 [`AuthError::RegisterRejected`]
    pub async fn register(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("/register"))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::RegisterRejected(status.as_u16()));
        }
        Ok(())
    }

    /// 登录并返回令牌
    pub async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let response = self
            .client
            .post(self.url("/login"))
            .json(credentials)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::LoginFailed(format!("网关返回状态码 {}", status)));
        }

        let body: LoginResponse = response.json().await?;
        if body.token.is_empty() {
            return Err(AuthError::LoginFailed("网关返回了空令牌".to_string()));
        }
        Ok(body.token)
    }
}

#[async_trait]
impl TokenIssuer for AuthGatewayClient {
    /// 先注册后登录；注册失败（通常是用户已存在）只记录日志，登录失败直接返回错误
    async fn issue(&self, credentials: &Credentials) -> Result<String, AuthError> {
        match self.register(credentials).await {
            Ok(()) => info!("✓ 用户 {} 注册成功", credentials.username),
            Err(e) => warn!("用户 {} 注册失败，按已存在处理: {}", credentials.username, e),
        }

        let token = self.login(credentials).await?;
        info!("✓ 用户 {} 登录成功", credentials.username);
        Ok(token)
    }
}
