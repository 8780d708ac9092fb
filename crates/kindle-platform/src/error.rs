//! 平台能力面的错误域。
//!
//! ## 角色定位（Why）
//! - 统一描述“能力缺失”“参数非法”“操作系统调用失败”三类问题，供运行时出口与嵌入方直接 `?` 传播；
//! - 依赖 `std` 的变体仅在 `std` Feature 下出现，`no_std` 构建中的枚举保持 `Copy` 友好的小体积。

#[cfg(feature = "std")]
use std::{io, path::PathBuf, string::String};

use thiserror::Error;

/// 平台能力面错误。
///
/// # 教案式说明
/// - **意图 (Why)**：调用方需要区分“本构建根本没有该能力”与“有能力但这次调用失败”，前者应在集成期修正配置，
///   后者属于运行期故障；
/// - **契约 (What)**：`Unsupported.capability` 为能力的稳定短名称（与 [`crate::Capabilities`] 的名称表一致）；
///   `Io` 携带触发失败的路径与原始 [`io::Error`]；
/// - **设计权衡 (Trade-offs)**：动态加载失败只保留加载器给出的文本，`dlerror` 没有结构化错误码可用。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlatformError {
    /// 当前构建不提供该能力。
    #[error("platform capability `{capability}` is not available in this build")]
    Unsupported { capability: &'static str },

    /// 节拍源频率为 0。
    #[error("tick source frequency must be greater than zero")]
    InvalidFrequency,

    /// 节拍源只能安装一次。
    #[error("a tick source has already been installed")]
    TickSourceAlreadyInstalled,

    /// 宽字符序列中出现无法解码的码元。
    #[error("invalid wide-character code unit at index {index}")]
    InvalidWideText { index: usize },

    /// 文件系统调用失败。
    #[cfg(feature = "std")]
    #[error("{operation} `{}` failed: {source}", path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// 名称中包含内部 NUL，无法传给 C 接口。
    #[cfg(feature = "std")]
    #[error("name `{name}` contains an interior NUL byte")]
    InvalidName { name: String },

    /// 动态库加载失败。
    #[cfg(feature = "std")]
    #[error("failed to load dynamic library `{origin}`: {detail}")]
    Load { origin: String, detail: String },

    /// 符号解析失败。
    #[cfg(feature = "std")]
    #[error("symbol `{name}` not found: {detail}")]
    SymbolNotFound { name: String, detail: String },
}

impl PlatformError {
    /// 是否为“能力缺失”类错误。
    pub fn is_unsupported(&self) -> bool {
        matches!(self, PlatformError::Unsupported { .. })
    }
}
