use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 可选配置文件 (不存在时忽略)
pub const CONFIG_FILE: &str = "invoice-finder";
/// 环境变量前缀，层级分隔符为 `__`，例如 `FINDER__SERVER__PORT=9001`
pub const ENV_PREFIX: &str = "FINDER";

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub finder: FinderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_concurrent_searches: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// 已上传源文件所在目录 (由上传方写入)
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub default_tolerance: i64,
    pub default_max_invoices: i64,
    /// 单次搜索的截止时间，0 表示不限时
    pub search_timeout_secs: u64,
    /// 0 表示扫描全表
    pub header_scan_rows: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 9001,
                max_concurrent_searches: 4,
            },
            finder: FinderConfig {
                upload_dir: PathBuf::from("uploads"),
                output_dir: PathBuf::from("outputs"),
                default_tolerance: crate::models::DEFAULT_TOLERANCE,
                default_max_invoices: crate::models::DEFAULT_MAX_INVOICES as i64,
                search_timeout_secs: 300,
                header_scan_rows: 0,
            },
        }
    }
}

impl AppConfig {
    /// 默认值 < 配置文件 < 环境变量
    pub fn from_env() -> Result<Self, config::ConfigError> {
        let defaults = Self::default();

        config::Config::builder()
            .set_default("server.host", defaults.server.host)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "server.max_concurrent_searches",
                defaults.server.max_concurrent_searches as i64,
            )?
            .set_default(
                "finder.upload_dir",
                defaults.finder.upload_dir.to_string_lossy().into_owned(),
            )?
            .set_default(
                "finder.output_dir",
                defaults.finder.output_dir.to_string_lossy().into_owned(),
            )?
            .set_default("finder.default_tolerance", defaults.finder.default_tolerance)?
            .set_default("finder.default_max_invoices", defaults.finder.default_max_invoices)?
            .set_default(
                "finder.search_timeout_secs",
                defaults.finder.search_timeout_secs as i64,
            )?
            .set_default("finder.header_scan_rows", defaults.finder.header_scan_rows as i64)?
            .add_source(config::File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_request_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.finder.default_tolerance, 100);
        assert_eq!(config.finder.default_max_invoices, 5);
        assert_eq!(config.server.port, 9001);
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let config = AppConfig::from_env().unwrap();
        assert!(config.server.max_concurrent_searches >= 1);
        assert!(config.finder.default_max_invoices >= 1);
    }
}
