//! 产品资源：模型、业务服务与 HTTP 处理器

pub mod handler;
pub mod model;
pub mod service;

use axum::{middleware, routing::get, Router};

use crate::core::middleware::auth_middleware;
use handler::AppState;

/// 产品路由，所有端点都需要 Bearer 令牌
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handler::list_products).post(handler::create_product),
        )
        .route("/:id", get(handler::get_product))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}
