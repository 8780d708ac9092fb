//! 日志订阅者装配。
//!
//! # 教案式说明
//! - **意图（Why）**：引导层只通过 `tracing` 宏输出事件，是否输出、输出到哪里由宿主决定；
//!   不愿自行组装订阅者的宿主调用一次 [`install`] 即可看到完整的引导过程；
//! - **逻辑（How）**：以 [`RuntimeOptions`] 构建 `EnvFilter` 与 `fmt` 订阅者，设置为全局默认；
//! - **契约（What）**：进程内已存在全局订阅者（包括第二次调用本函数）时返回
//!   [`TelemetryError::SubscriberAlreadySet`]，不会覆盖现有订阅者；过滤规则非法时不做任何修改。

use tracing::dispatcher;
use tracing_subscriber::EnvFilter;
use thiserror::Error;

use crate::config::RuntimeOptions;

/// 订阅者装配失败。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TelemetryError {
    /// 全局订阅者已存在。
    #[error("a global tracing subscriber is already set")]
    SubscriberAlreadySet,
    /// 过滤规则无法解析。
    #[error("invalid log filter `{filter}`: {source}")]
    InvalidFilter {
        filter: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// 设置全局订阅者失败。
    #[error("failed to set the global tracing subscriber: {0}")]
    SetGlobalDefault(#[from] dispatcher::SetGlobalDefaultError),
}

/// 按配置安装全局 `fmt` 订阅者。
pub fn install(options: &RuntimeOptions) -> Result<(), TelemetryError> {
    if dispatcher::has_been_set() {
        return Err(TelemetryError::SubscriberAlreadySet);
    }
    let filter =
        EnvFilter::try_new(&options.log_filter).map_err(|source| TelemetryError::InvalidFilter {
            filter: options.log_filter.clone(),
            source,
        })?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(options.ansi)
        .with_target(options.with_target)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::debug!(
        target: kindle_core::observability::targets::RUNTIME,
        filter = %options.log_filter,
        "telemetry installed"
    );
    Ok(())
}
