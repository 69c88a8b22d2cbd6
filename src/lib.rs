//! # 产品服务
//!
//! 以 Bearer 令牌保护的产品资源服务，提供创建、列表和按标识查询三个操作：
//! - `POST /`     创建产品，返回 201
//! - `GET /`      列出全部产品
//! - `GET /:id`   按标识查询产品
//!
//! 令牌由外部认证网关签发，本服务用共享密钥校验。

pub mod app;
pub mod application;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::product::model::{CreateProductRequest, Product};
pub use application::{LifecycleError, ProductApp};
pub use config::Config;
