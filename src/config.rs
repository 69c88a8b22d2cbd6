use serde::{Deserialize, Serialize};
use std::fs;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;
use tracing::info;

/// 产品服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP 服务配置
    pub http: HttpConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 认证配置
    pub auth: AuthConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// HTTP 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// 绑定地址
    pub bind_address: String,
    /// HTTP 服务端口，0 表示由系统分配
    pub port: u16,
    /// 请求超时时间（秒）
    pub timeout_seconds: u64,
}

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// 连接串，未设置时使用内存存储
    pub url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    /// 获取连接超时时间（秒）
    pub acquire_timeout_seconds: u64,
}

/// 认证配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 与认证网关共享的 JWT 密钥，必须通过配置文件或 `JWT_SECRET` 提供
    pub jwt_secret: String,
    /// 令牌签发方
    pub issuer: String,
    /// 本地签发令牌的有效期（秒）
    pub token_expires_in_seconds: i64,
    /// 认证网关地址
    pub gateway_url: String,
    /// 调用认证网关的超时时间（秒）
    pub timeout_seconds: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别 (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3001,
            timeout_seconds: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_seconds: 8,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "auth-gateway".to_string(),
            token_expires_in_seconds: 3600,
            gateway_url: "http://localhost:3000".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl HttpConfig {
    /// 监听地址
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!("无效的绑定地址: {}", self.bind_address))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

impl Config {
    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?;

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(e.to_string()))?;
        }

        fs::write(path.as_ref(), content).map_err(|e| ConfigError::FileWrite(e.to_string()))?;

        Ok(())
    }

    /// 用进程环境变量覆盖配置
    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// 用给定的查找函数覆盖配置，便于测试时不触碰进程环境
    pub fn apply_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("PRODUCT_BIND_ADDRESS") {
            self.http.bind_address = addr;
        }
        if let Some(port) = lookup("PRODUCT_PORT") {
            self.http.port = port
                .parse()
                .map_err(|_| ConfigError::Validation(format!("无效的端口: {}", port)))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(issuer) = lookup("JWT_ISSUER") {
            self.auth.issuer = issuer;
        }
        if let Some(url) = lookup("AUTH_GATEWAY_URL") {
            self.auth.gateway_url = url;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(self)
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 验证HTTP配置
        self.http.socket_addr()?;
        if self.http.timeout_seconds == 0 {
            return Err(ConfigError::Validation("请求超时时间必须大于0".to_string()));
        }

        // 验证数据库配置
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation("最大连接数必须大于0".to_string()));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::Validation(
                "最小连接数不能大于最大连接数".to_string(),
            ));
        }

        // 验证认证配置
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Validation(
                "JWT 密钥不能为空，请设置 JWT_SECRET".to_string(),
            ));
        }
        if self.auth.issuer.is_empty() {
            return Err(ConfigError::Validation("令牌签发方不能为空".to_string()));
        }

        // 验证日志级别
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "无效的日志级别: {}，有效值: {:?}",
                self.logging.level, valid_levels
            )));
        }

        Ok(())
    }
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("文件写入错误: {0}")]
    FileWrite(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置序列化错误: {0}")]
    Serialize(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
}

/// 从 `.env`、配置文件和环境变量加载配置
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();

    let config_paths = ["config.toml", "./config/config.toml"];

    let mut config = Config::default();
    for path in &config_paths {
        if Path::new(path).exists() {
            info!("从配置文件加载: {}", path);
            config = Config::load_from_file(path)?;
            break;
        }
    }

    let config = config.apply_env()?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.auth.jwt_secret = "unit-test-secret".to_string();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.http.port, 3001);
        assert_eq!(config.auth.gateway_url, "http://localhost:3000");
        assert!(config.database.url.is_none());
        assert!(config.auth.jwt_secret.is_empty());
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_default_secret_is_rejected() {
        assert!(matches!(
            Config::default().validate(),
            Err(ConfigError::Validation(_))
        ));

        let mut config = Config::default();
        config.auth.jwt_secret = "   ".to_string();
        assert!(config.validate().is_err());

        let config = Config::default()
            .apply_env_from(|key| (key == "JWT_SECRET").then(|| "from-env".to_string()))
            .unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = valid_config();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.auth.jwt_secret.clear();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.http.bind_address = "not-an-ip".to_string();
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.database.min_connections = 50;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_save_load() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.http.port = 4100;
        config.database.url = Some("postgres://localhost/products".to_string());
        config.save_to_file(&config_path).unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.http.port, 4100);
        assert_eq!(loaded.database.url, config.database.url);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "[http]\nport = 8088\n").unwrap();

        let loaded = Config::load_from_file(&config_path).unwrap();
        assert_eq!(loaded.http.port, 8088);
        assert_eq!(loaded.http.bind_address, "0.0.0.0");
        assert_eq!(loaded.auth.issuer, "auth-gateway");
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("PRODUCT_PORT", "9000"),
            ("DATABASE_URL", "postgres://db/products"),
            ("JWT_SECRET", "s3cret"),
            ("LOG_LEVEL", "debug"),
        ]
        .into_iter()
        .collect();

        let config = Config::default()
            .apply_env_from(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.http.port, 9000);
        assert_eq!(config.database.url.as_deref(), Some("postgres://db/products"));
        assert_eq!(config.auth.jwt_secret, "s3cret");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_env_invalid_port() {
        let result = Config::default().apply_env_from(|key| {
            (key == "PRODUCT_PORT").then(|| "eighty".to_string())
        });
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
