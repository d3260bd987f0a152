use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// 包含基础设施配置：
/// - server: 对外短链域名（用于 crawler 预览页的 canonical URL）
/// - database: 数据库连接配置
/// - alias: 别名生成配置
/// - redirect: 跳转策略配置
/// - analytics: 分析统计配置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub alias: AliasConfig,
    #[serde(default)]
    pub redirect: RedirectConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > config.toml > 默认值
    /// ENV 前缀：DL，分隔符：__
    /// 示例：DL__DATABASE__DATABASE_URL=sqlite://links.db
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        dotenvy::dotenv().ok();

        let path = "config.toml";

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("DL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Public base URL prepended to aliases in preview pages,
    /// e.g. "https://s.example.com"
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
}

/// 别名生成配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasConfig {
    /// Generated alias length (62^6 combinations at the default)
    #[serde(default = "default_alias_length")]
    pub length: usize,
    /// Generate-and-check attempts before giving up with AliasSpaceExhausted
    #[serde(default = "default_alias_max_retries")]
    pub max_retries: u32,
}

/// 跳转策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedirectConfig {
    /// When false, platform override URLs are ignored and every redirect
    /// goes to the original URL so native universal-link interception can
    /// take over.
    #[serde(default = "default_true")]
    pub platform_overrides_enabled: bool,
    #[serde(default = "default_site_name")]
    pub site_name: String,
    #[serde(default)]
    pub default_title: String,
    #[serde(default)]
    pub default_description: String,
}

/// 分析统计配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Click log retention window for clean_old_data
    #[serde(default = "default_retention_days")]
    pub retention_days: u64,
    /// Default cap on raw click rows returned per report
    #[serde(default = "default_recent_limit")]
    pub default_recent_limit: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "plain" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Log file path; empty or absent means stdout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_database_url() -> String {
    "sqlite://data/deeplinker.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    8
}

fn default_alias_length() -> usize {
    6
}

fn default_alias_max_retries() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_site_name() -> String {
    "Deeplinker".to_string()
}

fn default_retention_days() -> u64 {
    365
}

fn default_recent_limit() -> u64 {
    1000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "plain".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
        }
    }
}

impl Default for AliasConfig {
    fn default() -> Self {
        Self {
            length: default_alias_length(),
            max_retries: default_alias_max_retries(),
        }
    }
}

impl Default for RedirectConfig {
    fn default() -> Self {
        Self {
            platform_overrides_enabled: default_true(),
            site_name: default_site_name(),
            default_title: String::new(),
            default_description: String::new(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            default_recent_limit: default_recent_limit(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
        }
    }
}
