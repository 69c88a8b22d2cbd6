//! 认证：令牌校验与令牌签发

pub mod gateway;
pub mod token;

pub use gateway::{AuthGatewayClient, Credentials, TokenIssuer};
pub use token::{bearer_token, Claims, JwtVerifier, LocalTokenIssuer, TokenVerifier};

/// 认证错误类型
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("缺少认证令牌")]
    MissingToken,
    #[error("无效的令牌: {0}")]
    InvalidToken(String),
    #[error("令牌签发失败: {0}")]
    Issue(String),
    #[error("缺少凭据环境变量: {0}")]
    MissingCredentials(String),
    #[error("注册被拒绝，状态码 {0}")]
    RegisterRejected(u16),
    #[error("登录失败: {0}")]
    LoginFailed(String),
    #[error("认证网关请求失败: {0}")]
    Gateway(#[from] reqwest::Error),
}
