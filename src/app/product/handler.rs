//! 产品处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use std::sync::Arc;
use tracing::info;

use super::{
    model::{CreateProductRequest, Product},
    service::ProductService,
};
use crate::auth::{Claims, TokenVerifier};
use crate::core::error::CoreError;

#[derive(Clone)]
pub struct AppState {
    pub product_service: ProductService,
    pub verifier: Arc<dyn TokenVerifier>,
}

pub async fn create_product(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), CoreError> {
    let Json(request) = payload?;
    let product = state.product_service.create_product(request).await?;
    info!("用户 {} 创建了产品 {}", claims.sub, product.id);
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, CoreError> {
    let products = state.product_service.list_products().await?;
    Ok(Json(products))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>, CoreError> {
    let product = state.product_service.get_product(&id).await?;
    Ok(Json(product))
}
