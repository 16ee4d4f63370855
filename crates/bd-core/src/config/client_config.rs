//! Client configuration DTO
//! 客户端配置 DTO
//!
//! Mirrors the on-disk TOML layout. Every section is optional in the file;
//! missing sections and fields take their defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Root configuration
/// 根配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub list: ListConfig,
}

/// Backend endpoint settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every resource path is joined onto, e.g. `https://erp.example.com/api/`
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Headers attached to every request (`Accept`, tenant headers, ...)
    pub default_headers: BTreeMap<String, String>,
}

/// Query cache settings
/// 查询缓存配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// How long a fetched page counts as fresh
    pub stale_time_ms: u64,

    /// Keep the previous key's data visible while a new key loads
    pub keep_previous_data: bool,

    /// Upper bound on cached keys
    pub max_entries: usize,
}

/// List screen settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub default_per_page: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Accept".to_string(), "application/json".to_string());
        Self {
            base_url: "http://localhost:8000/api/".to_string(),
            timeout_secs: 30,
            default_headers,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: 30_000,
            keep_previous_data: true,
            max_entries: 200,
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_per_page: 15,
        }
    }
}

impl ClientConfig {
    /// Parse a TOML document.
    /// 解析 TOML 文本。
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
