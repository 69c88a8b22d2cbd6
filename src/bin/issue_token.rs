//! 令牌获取工具
//!
//! 使用 `LOGIN_TEST_USER` / `LOGIN_TEST_PASSWORD` 向认证网关注册并登录，
//! 打印可直接用于 `Authorization: Bearer` 的令牌。
//! 传入 `local` 参数时改用共享密钥在本地签发，不访问网关。

use product_service::auth::{AuthGatewayClient, Credentials, LocalTokenIssuer, TokenIssuer};
use product_service::config::load_config;
use product_service::infrastructure::logger::Logger;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    Logger::init(&config.logging);

    let credentials = Credentials::from_env()?;
    let args: Vec<String> = env::args().collect();

    let issuer: Box<dyn TokenIssuer> = match args.get(1).map(String::as_str) {
        Some("local") => Box::new(LocalTokenIssuer::from_config(&config.auth)),
        Some(other) => {
            print_usage();
            anyhow::bail!("未知参数: {}", other);
        }
        None => Box::new(AuthGatewayClient::from_config(&config.auth)?),
    };

    let token = issuer.issue(&credentials).await?;
    println!("{}", token);
    Ok(())
}

fn print_usage() {
    println!("用法: issue_token [local]");
    println!();
    println!("  (无参数)  通过认证网关注册并登录");
    println!("  local     使用 JWT_SECRET 在本地签发令牌");
}
