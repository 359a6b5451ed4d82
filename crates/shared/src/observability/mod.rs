//! 可观测性模块
//!
//! 所有命令行工具通过单一入口点初始化日志输出。

pub mod tracing;

use crate::config::ObservabilityConfig;
use ::tracing::info;
use anyhow::Result;

/// 统一初始化可观测性
///
/// # Example
///
/// ```ignore
/// use rule_shared::config::AppConfig;
///
/// fn main() -> anyhow::Result<()> {
///     let config = AppConfig::load("rule-codec")?;
///     rule_shared::observability::init(&config.service_name, &config.observability)?;
///     Ok(())
/// }
/// ```
pub fn init(service_name: &str, config: &ObservabilityConfig) -> Result<()> {
    tracing::init(config)?;

    info!(
        service = %service_name,
        log_level = %config.log_level,
        log_format = %config.log_format,
        "Observability initialized"
    );

    Ok(())
}
