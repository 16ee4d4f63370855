//! # Configuration Loader / 配置加载器
//!
//! Reads the TOML client configuration. Missing sections and fields take
//! their defaults; a missing file means "all defaults".
//! 读取 TOML 客户端配置，缺失的字段使用默认值。

use std::path::{Path, PathBuf};

use anyhow::Context;
use bd_core::ClientConfig;
use tracing::info;

/// `<config dir>/bizdesk/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("bizdesk").join("config.toml"))
}

/// Load configuration from a TOML file
/// 从 TOML 文件加载配置
///
/// # Errors / 错误
///
/// Returns error if the file exists but cannot be read, or is not valid TOML
/// for [`ClientConfig`].
pub fn load_config(config_path: &Path) -> anyhow::Result<ClientConfig> {
    if !config_path.exists() {
        info!(path = %config_path.display(), "Config file not found, using defaults");
        return Ok(ClientConfig::default());
    }

    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    ClientConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}
