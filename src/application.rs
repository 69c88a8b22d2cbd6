//! 产品服务应用对象
//!
//! 存储连接 (`connect` / `disconnect`) 与网络监听 (`start` / `stop`) 相互独立，
//! 典型顺序为 connect → start → 处理请求 → stop → disconnect。

use axum::{middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::{net::TcpListener, sync::oneshot, sync::Mutex, task::JoinHandle};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::app::product::{self, handler::AppState, service::ProductService};
use crate::auth::TokenVerifier;
use crate::config::{Config, ConfigError};
use crate::core::middleware::request_logging_middleware;
use crate::infrastructure::store::{ProductStore, StoreError};

/// 生命周期错误类型
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    #[error("服务已在运行: {0}")]
    AlreadyRunning(SocketAddr),
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    #[error("存储错误: {0}")]
    Store(#[from] StoreError),
    #[error("监听失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("服务任务异常退出: {0}")]
    Join(#[from] tokio::task::JoinError),
}

struct RunningServer {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<std::io::Result<()>>,
}

pub struct ProductApp {
    config: Config,
    store: Arc<dyn ProductStore>,
    state: AppState,
    server: Mutex<Option<RunningServer>>,
}

impl ProductApp {
    pub fn new(
        config: Config,
        store: Arc<dyn ProductStore>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        let state = AppState {
            product_service: ProductService::new(Arc::clone(&store)),
            verifier,
        };

        Self {
            config,
            store,
            state,
            server: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 完整的 HTTP 处理器，可直接用于进程内测试
    pub fn router(&self) -> Router {
        product::routes(self.state.clone())
            .layer(middleware::from_fn(request_logging_middleware))
            .layer(TraceLayer::new_for_http())
            .layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.http.timeout_seconds,
            )))
    }

    /// 建立存储连接
    pub async fn connect(&self) -> Result<(), LifecycleError> {
        self.store.connect().await?;
        Ok(())
    }

    /// 断开存储连接
    pub async fn disconnect(&self) -> Result<(), LifecycleError> {
        self.store.disconnect().await?;
        Ok(())
    }

    /// 开始监听，返回实际绑定的地址；配置无效（如缺少 JWT 密钥）时拒绝启动
    pub async fn start(&self) -> Result<SocketAddr, LifecycleError> {
        self.config.validate()?;

        let mut server = self.server.lock().await;
        if let Some(running) = server.as_ref() {
            return Err(LifecycleError::AlreadyRunning(running.addr));
        }

        let listener = TcpListener::bind(self.config.http.socket_addr()?).await?;
        let addr = listener.local_addr()?;
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();
        let app = self.router();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
        });

        info!("🚀 产品服务运行在 http://{}", addr);
        *server = Some(RunningServer {
            addr,
            shutdown,
            handle,
        });
        Ok(addr)
    }

    /// 停止监听，未运行时什么也不做
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let Some(running) = self.server.lock().await.take() else {
            return Ok(());
        };

        if running.shutdown.send(()).is_err() {
            warn!("服务任务已提前退出");
        }

        match running.handle.await? {
            Ok(()) => {
                info!("产品服务已停止: {}", running.addr);
                Ok(())
            }
            Err(e) => {
                error!("产品服务异常退出: {}", e);
                Err(e.into())
            }
        }
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().await.as_ref().map(|running| running.addr)
    }

    pub async fn is_serving(&self) -> bool {
        self.server.lock().await.is_some()
    }
}
