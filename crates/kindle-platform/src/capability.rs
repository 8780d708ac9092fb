//! 平台能力描述符：把“本构建能用哪些操作系统设施”固化为构建期常量。
//!
//! # 模块定位（Why）
//! - 托管运行时的上层代码（时钟、文件、目录、动态库、宽字符）需要在编译期知道哪些设施存在，
//!   而不是在每次调用时探测；
//! - 描述符同时服务于两类调用方：运行时代码查询 [`PlatformDescriptor::NATIVE`]，
//!   探测工具与构建脚本对任意目标三元组调用 [`PlatformDescriptor::for_triple`]。
//!
//! # 判定规则（How）
//! 1. 目标类别给出上限：宿主目标具备全部能力，裸机目标没有加载器，因此不含动态加载；
//! 2. 本地描述符再按构建事实收窄：动态加载以构建脚本输出的 `kindle_has_dlopen` 为准，
//!    文件元数据与目录枚举需要 `std`，宽字符转换需要 `alloc`。
//!
//! # 契约说明（What）
//! - 所有构造函数均为 `const fn`，描述符可直接用于 `const` 上下文；
//! - 能力短名称与 [`crate::PlatformError::Unsupported`] 中的名称一致。

use core::fmt;

use bitflags::bitflags;
use kindle_core::{NATIVE_TARGET, TargetClass};

use crate::error::PlatformError;

bitflags! {
    /// 平台能力位集。
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// 单调时钟。
        ///
        /// 表示本构建能够提供单调时钟：`std` 构建直接可读；非 `std` 构建需先由板级代码调用
        /// [`crate::install_tick_source`]，安装前读取返回 [`PlatformError::Unsupported`]，
        /// 可用 [`crate::clock_source_ready`] 区分“可安装”与“已可读”。
        const MONOTONIC_CLOCK = 1 << 0;
        /// 文件元数据查询。
        const FILE_METADATA = 1 << 1;
        /// 动态库加载与符号解析。
        const DYNAMIC_LOADING = 1 << 2;
        /// 目录枚举。
        const DIRECTORY_ENUMERATION = 1 << 3;
        /// 宽字符文本转换。
        const WIDE_TEXT = 1 << 4;
    }
}

/// 单个能力位与其稳定短名称。
const NAMES: [(Capabilities, &str); 5] = [
    (Capabilities::MONOTONIC_CLOCK, "monotonic_clock"),
    (Capabilities::FILE_METADATA, "file_metadata"),
    (Capabilities::DYNAMIC_LOADING, "dynamic_loading"),
    (Capabilities::DIRECTORY_ENUMERATION, "directory_enumeration"),
    (Capabilities::WIDE_TEXT, "wide_text"),
];

impl Capabilities {
    /// 能力的稳定短名称；组合位返回其中编号最小的能力名。
    pub fn label(self) -> Option<&'static str> {
        NAMES
            .iter()
            .find(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
    }
}

/// 操作系统名称片段，出现即视为类 Unix 宿主（具备 `dlfcn`）。
const UNIX_LIKE_OS: [&str; 11] = [
    "linux", "android", "darwin", "ios", "freebsd", "netbsd", "openbsd", "dragonfly", "solaris",
    "illumos", "haiku",
];

/// 某一目标的能力描述符。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformDescriptor {
    class: TargetClass,
    capabilities: Capabilities,
}

impl PlatformDescriptor {
    /// 本构建的描述符。
    pub const NATIVE: PlatformDescriptor = PlatformDescriptor::native();

    /// 目标类别给出的能力上限。
    pub const fn for_class(class: TargetClass) -> Self {
        let capabilities = match class {
            TargetClass::Hosted => Capabilities::all(),
            TargetClass::BareMetal => Capabilities::all().difference(Capabilities::DYNAMIC_LOADING),
        };
        Self {
            class,
            capabilities,
        }
    }

    /// 任意目标三元组的描述符。
    ///
    /// # 契约说明（What）
    /// - 类别判定沿用 [`TargetClass::classify_triple`]；
    /// - 宿主目标仅在操作系统片段属于类 Unix 家族时保留动态加载，
    ///   与构建脚本“目标族含 `unix`”的规则一致；
    /// - 不考虑 Feature：探测的是目标本身，而不是某次构建。
    pub fn for_triple(triple: &str) -> Self {
        let class = TargetClass::classify_triple(triple);
        let mut descriptor = Self::for_class(class);
        let unix_like = triple
            .split('-')
            .skip(1)
            .any(|segment| UNIX_LIKE_OS.iter().any(|os| segment.starts_with(os)));
        if !unix_like {
            descriptor.capabilities = descriptor
                .capabilities
                .difference(Capabilities::DYNAMIC_LOADING);
        }
        descriptor
    }

    const fn native() -> Self {
        let mut descriptor = Self::for_class(NATIVE_TARGET);
        if !crate::HAS_DYNAMIC_LOADING {
            descriptor.capabilities = descriptor
                .capabilities
                .difference(Capabilities::DYNAMIC_LOADING);
        }
        if !cfg!(feature = "std") {
            descriptor.capabilities = descriptor
                .capabilities
                .difference(Capabilities::FILE_METADATA.union(Capabilities::DIRECTORY_ENUMERATION));
        }
        if !crate::HAS_WIDE_TEXT {
            descriptor.capabilities = descriptor.capabilities.difference(Capabilities::WIDE_TEXT);
        }
        descriptor
    }

    /// 目标类别。
    pub const fn class(&self) -> TargetClass {
        self.class
    }

    /// 能力位集。
    pub const fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// 是否具备全部给定能力。
    pub const fn supports(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    /// 要求具备给定能力，缺失时返回首个缺失能力的 [`PlatformError::Unsupported`]。
    pub fn require(&self, capability: Capabilities) -> Result<(), PlatformError> {
        let missing = capability.difference(self.capabilities);
        match missing.label() {
            None => Ok(()),
            Some(name) => {
                tracing::debug!(
                    target: kindle_core::observability::targets::PLATFORM,
                    capability = name,
                    class = self.class.as_str(),
                    "capability unavailable"
                );
                Err(PlatformError::Unsupported { capability: name })
            }
        }
    }

    /// 已具备能力的短名称，按位序输出。
    pub fn capability_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        NAMES
            .iter()
            .filter(|(flag, _)| self.capabilities.contains(*flag))
            .map(|(_, name)| *name)
    }
}

impl fmt::Display for PlatformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.class)?;
        for (index, name) in self.capability_names().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hosted_class_has_every_capability() {
        let hosted = PlatformDescriptor::for_class(TargetClass::Hosted);
        assert_eq!(hosted.capabilities(), Capabilities::all());
        assert!(hosted.require(Capabilities::DYNAMIC_LOADING).is_ok());
    }

    #[test]
    fn bare_metal_class_lacks_a_loader() {
        let bare = PlatformDescriptor::for_class(TargetClass::BareMetal);
        assert!(!bare.supports(Capabilities::DYNAMIC_LOADING));
        assert!(bare.supports(Capabilities::MONOTONIC_CLOCK | Capabilities::WIDE_TEXT));
        match bare.require(Capabilities::DYNAMIC_LOADING) {
            Err(PlatformError::Unsupported { capability }) => {
                assert_eq!(capability, "dynamic_loading");
            }
            other => panic!("expected unsupported, got {other:?}"),
        }
    }

    #[test]
    fn triples_map_to_expected_matrix() {
        let linux = PlatformDescriptor::for_triple("x86_64-unknown-linux-gnu");
        assert_eq!(linux.class(), TargetClass::Hosted);
        assert!(linux.supports(Capabilities::DYNAMIC_LOADING));

        let mac = PlatformDescriptor::for_triple("aarch64-apple-darwin");
        assert!(mac.supports(Capabilities::DYNAMIC_LOADING));

        let windows = PlatformDescriptor::for_triple("x86_64-pc-windows-msvc");
        assert_eq!(windows.class(), TargetClass::Hosted);
        assert!(!windows.supports(Capabilities::DYNAMIC_LOADING));
        assert!(windows.supports(Capabilities::WIDE_TEXT));

        let cortex = PlatformDescriptor::for_triple("thumbv7em-none-eabihf");
        assert_eq!(cortex.class(), TargetClass::BareMetal);
        assert!(!cortex.supports(Capabilities::DYNAMIC_LOADING));
    }

    #[test]
    fn native_descriptor_follows_build_facts() {
        let native = PlatformDescriptor::NATIVE;
        assert_eq!(native.class(), NATIVE_TARGET);
        assert_eq!(
            native.supports(Capabilities::DYNAMIC_LOADING),
            crate::HAS_DYNAMIC_LOADING
        );
        assert_eq!(
            native.supports(Capabilities::FILE_METADATA),
            cfg!(feature = "std")
        );
        assert_eq!(
            native.supports(Capabilities::DIRECTORY_ENUMERATION),
            cfg!(feature = "std")
        );
        assert_eq!(native.supports(Capabilities::WIDE_TEXT), crate::HAS_WIDE_TEXT);
        assert!(native.supports(Capabilities::MONOTONIC_CLOCK));
    }

    /// 在 `--features kindle-core/bare-metal` 与 `--no-default-features` 下同样成立：
    /// 描述符只声明本构建实际编译了的设施。
    #[test]
    fn native_descriptor_never_outruns_compiled_modules() {
        let native = PlatformDescriptor::NATIVE;
        if NATIVE_TARGET == TargetClass::BareMetal {
            assert!(!crate::HAS_DYNAMIC_LOADING, "裸机档位不得编译动态加载");
            assert!(!native.supports(Capabilities::DYNAMIC_LOADING));
        }
        if !cfg!(feature = "alloc") {
            assert!(!native.supports(Capabilities::WIDE_TEXT));
        }
        if !cfg!(feature = "std") {
            assert!(!native.supports(Capabilities::FILE_METADATA));
            assert!(!native.supports(Capabilities::DIRECTORY_ENUMERATION));
            assert!(!native.supports(Capabilities::DYNAMIC_LOADING));
        }
        let ceiling = PlatformDescriptor::for_class(native.class()).capabilities();
        assert!(native.capabilities().difference(ceiling).is_empty());
    }

    #[test]
    fn names_and_display_are_stable() {
        let bare = PlatformDescriptor::for_class(TargetClass::BareMetal);
        let names: Vec<_> = bare.capability_names().collect();
        assert_eq!(
            names,
            [
                "monotonic_clock",
                "file_metadata",
                "directory_enumeration",
                "wide_text"
            ]
        );
        assert_eq!(
            bare.to_string(),
            "bare-metal [monotonic_clock, file_metadata, directory_enumeration, wide_text]"
        );
        assert_eq!(Capabilities::empty().label(), None);
    }
}
