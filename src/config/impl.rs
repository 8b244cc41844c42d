use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

// config.toml 中的占位密钥
const DEFAULT_JWT_SECRET: &str = "change-me-in-production";

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("TUTORHUB")
                    .separator("_")
                    .try_parsing(true),
            );

        // 支持从环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("cache.redis.url", std::env::var("REDIS_URL").ok())?
            .set_override_option(
                "cache.redis.key_prefix",
                std::env::var("REDIS_KEY_PREFIX").ok(),
            )?
            .set_override_option("cache.default_ttl", std::env::var("REDIS_TTL").ok())?
            .set_override_option(
                "revenue.default_currency",
                std::env::var("DEFAULT_CURRENCY").ok(),
            )?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;

        // 处理工作线程数
        if app_config.server.workers == 0 {
            app_config.server.workers = num_cpus::get().min(app_config.server.max_workers);
        }

        app_config.validate()?;

        Ok(app_config)
    }

    /// 校验业务相关的配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.is_production() && self.jwt.secret == DEFAULT_JWT_SECRET {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT_SECRET) in production".to_string(),
            ));
        }
        let scheduling = &self.scheduling;
        if scheduling.max_recurrence_days <= 0 || scheduling.max_recurrence_days > 366 {
            return Err(ConfigError::Message(
                "scheduling.max_recurrence_days must be within 1..=366".to_string(),
            ));
        }
        if scheduling.max_calendar_days <= 0 || scheduling.max_calendar_days > 366 {
            return Err(ConfigError::Message(
                "scheduling.max_calendar_days must be within 1..=366".to_string(),
            ));
        }
        if scheduling.student_cancel_cutoff_hours < 0 {
            return Err(ConfigError::Message(
                "scheduling.student_cancel_cutoff_hours must not be negative".to_string(),
            ));
        }
        let currency = &self.revenue.default_currency;
        if let Err(msg) = crate::utils::validate::validate_currency(currency) {
            return Err(ConfigError::Message(format!(
                "revenue.default_currency '{currency}': {msg}"
            )));
        }
        Ok(())
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn sample() -> AppConfig {
        Config::builder()
            .add_source(File::from_str(
                include_str!("../../config.toml"),
                FileFormat::Toml,
            ))
            .build()
            .and_then(|c| c.try_deserialize::<AppConfig>())
            .expect("bundled config.toml must deserialize")
    }

    #[test]
    fn test_bundled_config_is_valid() {
        let config = sample();
        assert!(config.validate().is_ok());
        assert_eq!(config.revenue.default_currency, "USD");
    }

    #[test]
    fn test_rejects_lowercase_currency() {
        let mut config = sample();
        config.revenue.default_currency = "usd".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_recurrence_window() {
        let mut config = sample();
        config.scheduling.max_recurrence_days = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_production_requires_real_secret() {
        let mut config = sample();
        config.app.environment = "production".to_string();
        assert!(config.validate().is_err());
        config.jwt.secret = "a-long-random-deployment-secret".to_string();
        assert!(config.validate().is_ok());
    }
}
