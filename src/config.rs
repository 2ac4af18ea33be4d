use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost/procurement";
const DEFAULT_MAX_CONNECTIONS: u32 = 20;

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

// 日志里不打印密钥
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

type Builder = ConfigBuilder<DefaultState>;

impl AppConfig {
    /// 加载配置: 默认值 < config.{toml,yaml,json} < APP__* 环境变量 < 旧式环境变量
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::with_defaults()?
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"));

        Self::apply_legacy_env(builder)?.build()?.try_deserialize()
    }

    /// 仅从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::apply_legacy_env(Self::with_defaults()?)?
            .build()?
            .try_deserialize()
    }

    fn with_defaults() -> Result<Builder, ConfigError> {
        Config::builder()
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", DEFAULT_PORT as i64)?
            .set_default("database.url", DEFAULT_DATABASE_URL)?
            .set_default("database.max_connections", DEFAULT_MAX_CONNECTIONS as i64)
    }

    fn apply_legacy_env(builder: Builder) -> Result<Builder, ConfigError> {
        let port = match std::env::var("SERVER_PORT").ok() {
            Some(p) => Some(p.parse::<i64>().map_err(|e| {
                ConfigError::Message(format!("invalid SERVER_PORT {p:?}: {e}"))
            })?),
            None => None,
        };

        builder
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", port)?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("auth.jwt_secret", std::env::var("JWT_SECRET").ok())
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_layered_values() {
        let config = AppConfig::with_defaults()
            .unwrap()
            .set_override("server.port", 9090)
            .unwrap()
            .set_override("auth.jwt_secret", "s3cret")
            .unwrap()
            .build()
            .unwrap();

        let app: AppConfig = config.try_deserialize().unwrap();
        assert_eq!(app.listen_addr(), "127.0.0.1:9090");
        assert_eq!(app.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(app.database.max_connections, 20);
        assert_eq!(app.auth.jwt_secret, "s3cret");
        assert!(!format!("{:?}", app).contains("s3cret"));
    }

    #[test]
    fn missing_secret_is_an_error() {
        let config = AppConfig::with_defaults().unwrap().build().unwrap();
        assert!(config.try_deserialize::<AppConfig>().is_err());
    }
}
