//! 目标档位：构建期决定运行时引导需要多少“手工排序”。
//!
//! # 设计总览（Why）
//! - 宿主操作系统的加载器会替运行时完成线程子系统与核心运行时的静态构造；
//!   裸机目标没有加载器，必须由生命周期控制器显式、按固定顺序调用两段引导例程。
//! - 该差异在构建期即可确定，因此以零尺寸策略类型 [`Hosted`] / [`BareMetal`] 表达，
//!   控制器通过关联常量分支，编译后不留任何运行期判断。
//!
//! # 选择规则（How）
//! - `target_os = "none"`、`target_arch = "xtensa"` 或启用 `bare-metal` Feature 时，
//!   [`NativeProfile`] 解析为 [`BareMetal`]；其余情况为 [`Hosted`]。
//! - [`TargetClass::classify_triple`] 对任意目标三元组给出同样的判定，供构建脚本与探测工具复用。

use core::fmt;

/// 目标类别。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TargetClass {
    /// 通用操作系统宿主，加载器负责子系统的静态初始化。
    Hosted,
    /// 无宿主操作系统的受限目标，需要显式排序子系统引导。
    BareMetal,
}

impl TargetClass {
    /// 是否需要在静态构造链之前显式执行“线程子系统 → 核心运行时”的引导。
    pub const fn requires_explicit_bootstrap(self) -> bool {
        matches!(self, TargetClass::BareMetal)
    }

    /// 目标上是否可能存在动态链接加载器。
    ///
    /// 裸机目标无条件返回 `false`；宿主目标是否真的具备 `dlopen` 由平台层在构建期进一步确认。
    pub const fn may_have_loader(self) -> bool {
        matches!(self, TargetClass::Hosted)
    }

    /// 稳定的短名称，用于日志字段与探测输出。
    pub const fn as_str(self) -> &'static str {
        match self {
            TargetClass::Hosted => "hosted",
            TargetClass::BareMetal => "bare-metal",
        }
    }

    /// 依据目标三元组判定类别。
    ///
    /// # 契约说明（What）
    /// - 架构段以 `xtensa` 开头（ESP32 系列）视为裸机，即便 OS 段为 `espidf`；
    /// - 任一段为 `none`（如 `thumbv7em-none-eabihf`）视为裸机；
    /// - 末段为 `elf`（如 `xtensa-esp32s3-elf`、`riscv64-unknown-elf`）视为裸机；
    /// - 其余（包括空串与无法识别的写法）一律视为宿主目标。
    pub fn classify_triple(triple: &str) -> TargetClass {
        let triple = triple.trim();
        let mut segments = triple.split('-');
        let arch = segments.next().unwrap_or_default();
        if arch.starts_with("xtensa") {
            return TargetClass::BareMetal;
        }

        let rest: &str = triple.get(arch.len()..).unwrap_or_default();
        let mut last = arch;
        for segment in rest.split('-').filter(|segment| !segment.is_empty()) {
            if segment == "none" {
                return TargetClass::BareMetal;
            }
            last = segment;
        }

        if last == "elf" && last != arch {
            TargetClass::BareMetal
        } else {
            TargetClass::Hosted
        }
    }
}

impl fmt::Display for TargetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 构建期选定的目标策略。
///
/// # 契约说明（What）
/// - `CLASS`：策略对应的目标类别；
/// - `WAIT_FOR_TRANSITION`：当调用方观察到另一线程正处于启动/关闭过渡态时，是否让步等待其完成。
///   宿主目标等待，以保证 `startup()` 返回即代表运行时已构造完毕；
///   裸机目标立即返回，避免高优先级任务自旋饿死持有过渡态的低优先级任务。
pub trait TargetProfile: Send + Sync + 'static {
    /// 目标类别。
    const CLASS: TargetClass;
    /// 过渡态竞争时是否等待。
    const WAIT_FOR_TRANSITION: bool;
}

/// 宿主操作系统档位。
#[derive(Clone, Copy, Debug, Default)]
pub struct Hosted;

impl TargetProfile for Hosted {
    const CLASS: TargetClass = TargetClass::Hosted;
    const WAIT_FOR_TRANSITION: bool = true;
}

/// 裸机档位。
#[derive(Clone, Copy, Debug, Default)]
pub struct BareMetal;

impl TargetProfile for BareMetal {
    const CLASS: TargetClass = TargetClass::BareMetal;
    const WAIT_FOR_TRANSITION: bool = false;
}

/// 当前构建目标对应的档位。
#[cfg(any(target_os = "none", target_arch = "xtensa", feature = "bare-metal"))]
pub type NativeProfile = BareMetal;

/// 当前构建目标对应的档位。
#[cfg(not(any(target_os = "none", target_arch = "xtensa", feature = "bare-metal")))]
pub type NativeProfile = Hosted;

/// 当前构建目标的类别常量。
pub const NATIVE_TARGET: TargetClass = <NativeProfile as TargetProfile>::CLASS;
