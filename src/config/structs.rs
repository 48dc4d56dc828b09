use std::path::Path;

use serde::{Deserialize, Serialize};

/// 默认外部 mmdb 路径（容器内路径，宿主机挂载 ipinfo_lite.mmdb）
pub const DEFAULT_EXTERNAL_DB_PATH: &str = "/dashboard/data/ipinfo_lite.mmdb";

/// ipinfo.io token 的环境变量名
pub const IPINFO_TOKEN_ENV: &str = "IPINFO_TOKEN";

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - database: 外部 mmdb 路径
/// - remote: ipinfo.io 查询配置
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：GEOIP，分隔符：__
    /// 示例：GEOIP__REMOTE__ENABLED=false
    ///
    /// 未配置 `remote.token` 时读取 `IPINFO_TOKEN`
    pub fn load(path: &str) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("GEOIP")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config = match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if Path::new(path).exists() {
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
        };

        config.remote.token = config
            .remote
            .resolved_token(std::env::var(IPINFO_TOKEN_ENV).ok());
        config
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 本地数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 外部 mmdb 路径，存在且可打开时优先于内置数据库
    #[serde(default = "default_external_path")]
    pub external_path: String,
}

/// ipinfo.io 查询配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_remote_enabled")]
    pub enabled: bool,
    /// 请求地址为 `{base_url}/{ip}/country`
    #[serde(default = "default_remote_base_url")]
    pub base_url: String,
    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
    /// 可选 token，用于提高限额；为空时匿名请求
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl RemoteConfig {
    /// 配置中的 token 优先，其次是环境变量，空字符串视为未配置
    pub fn resolved_token(&self, env_token: Option<String>) -> Option<String> {
        self.token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| env_token.filter(|t| !t.trim().is_empty()))
            .map(|t| t.trim().to_string())
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions for static config
// ============================================================

fn default_external_path() -> String {
    DEFAULT_EXTERNAL_DB_PATH.to_string()
}

fn default_remote_enabled() -> bool {
    true
}

fn default_remote_base_url() -> String {
    "https://ipinfo.io".to_string()
}

fn default_remote_timeout_secs() -> u64 {
    crate::services::geoip::HTTP_TIMEOUT_SECS
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            external_path: default_external_path(),
        }
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            enabled: default_remote_enabled(),
            base_url: default_remote_base_url(),
            timeout_secs: default_remote_timeout_secs(),
            token: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
