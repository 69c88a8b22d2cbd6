//! 核心中间件模块

use axum::{
    extract::{Request, State},
    http::header::USER_AGENT,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{debug, info};

use super::error::CoreError;
use crate::app::product::handler::AppState;
use crate::auth::{bearer_token, Claims};

/// 请求日志中间件，记录方法、路径、状态码和耗时
pub async fn request_logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let response = next.run(req).await;

    info!(
        %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = start.elapsed().as_millis() as u64,
        user_agent = %user_agent,
        "request completed"
    );

    response
}

/// 认证中间件
///
/// 校验 `Authorization: Bearer <token>`，通过后把 [`Claims`] 放进请求扩展，
/// 处理器可以用 `Extension<Claims>` 取出。失败时请求不会到达处理器和存储。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, CoreError> {
    let token = bearer_token(req.headers())?;
    let claims: Claims = state.verifier.verify(token)?;

    debug!("Authenticated request for subject: {}", claims.sub);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
