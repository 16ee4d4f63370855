//! Host bootstrap: configuration loading, tracing setup and dependency wiring.
//! 启动引导：配置加载、日志初始化与依赖装配。

pub mod config;
pub mod tracing;
pub mod wiring;

pub use config::{default_config_path, load_config};
pub use wiring::{wire_dependencies, AppDeps, WiringError};
