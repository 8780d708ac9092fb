#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![doc = "kindle-platform: 托管运行时依赖的操作系统设施，在构建期按目标选定。"]
#![doc = ""]
#![doc = "== 能力清单 =="]
#![doc = "1. 单调时钟：宿主使用 `Instant`，裸机安装板级计数器。"]
#![doc = "2. 文件元数据与目录枚举：仅 `std` 构建。"]
#![doc = "3. 动态库符号解析：仅当构建脚本检测到 `dlfcn` 加载器（`cfg(kindle_has_dlopen)`）。"]
#![doc = "4. 宽字符文本：码元宽度与平台 `wchar_t` 一致。"]
#![doc = ""]
#![doc = "能力集合由 [`PlatformDescriptor::NATIVE`] 描述；缺失的能力不编译对应模块，也不提供模拟实现。"]
#![doc = ""]
#![doc = "== 构建组合 =="]
#![doc = "描述符测试需在以下组合下各跑一次：默认 Feature、`--no-default-features`、"]
#![doc = "`--no-default-features --features alloc`、`--features kindle-core/bare-metal`。"]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod capability;
pub mod clock;
#[cfg(feature = "std")]
pub mod dir;
#[cfg(kindle_has_dlopen)]
pub mod dynlib;
pub mod error;
#[cfg(feature = "std")]
pub mod fs;
#[cfg(feature = "alloc")]
pub mod text;

pub use capability::{Capabilities, PlatformDescriptor};
#[cfg(feature = "std")]
pub use clock::HostClock;
pub use clock::{
    MonotonicClock, TickClock, clock_source_ready, install_tick_source, monotonic_now,
};
#[cfg(feature = "std")]
pub use dir::{DirectoryEntry, ReadDirectory, read_directory};
#[cfg(kindle_has_dlopen)]
pub use dynlib::DynamicLibrary;
pub use error::PlatformError;
#[cfg(feature = "std")]
pub use fs::{FileKind, FileStatus, file_status, link_status};
#[cfg(feature = "alloc")]
pub use text::{WideChar, from_wide, from_wide_lossy, to_wide};

/// 本构建是否编译了 `dynlib` 模块（动态库符号解析）。
pub const HAS_DYNAMIC_LOADING: bool = cfg!(kindle_has_dlopen);

/// 本构建是否编译了 `text` 模块（宽字符转换）。
pub const HAS_WIDE_TEXT: bool = cfg!(feature = "alloc");

// 裸机档位没有加载器：构建脚本与 `NativeProfile` 一旦不一致，在编译期失败。
const _: () = assert!(
    !(HAS_DYNAMIC_LOADING
        && matches!(
            kindle_core::NATIVE_TARGET,
            kindle_core::TargetClass::BareMetal
        ))
);
