#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![doc = "kindle-rt: 进程级运行时实例与宿主出口。"]
#![doc = ""]
#![doc = "== 组成 =="]
#![doc = "1. `RUNTIME`：进程唯一的生命周期控制器，档位为构建期选定的 `NativeProfile`。"]
#![doc = "2. 引导镜像安装：宿主在首次启动前提供一次镜像，首次启动后镜像冻结。"]
#![doc = "3. C ABI：`kindle_runtime_startup` / `kindle_runtime_shutdown` 等出口，供编译器生成的宿主链接。"]
#![doc = "4. `std` 下的配置加载（TOML + 环境变量）与日志订阅者装配。"]
#![doc = ""]
#![doc = "Loom 模型检查只针对 `kindle-core`：`RUNTIME` 需要 `const` 构造，不参与 `--cfg kindle_loom` 构建。"]
#![doc = ""]
#![doc = "== 构建与测试组合 =="]
#![doc = "- 宿主：`cargo test -p kindle-rt`。"]
#![doc = "- 裸机引导顺序（宿主机上强制裸机档位，仍带 `std`）：`cargo test -p kindle-rt --features bare-metal`，"]
#![doc = "  `ffi_exports` 此时断言“线程 → 运行时 → 静态构造”的完整日志。"]
#![doc = "- 裸机静态库（无 `std`）：`cargo build -p kindle-rt --no-default-features --features bare-metal --profile bare-metal`，"]
#![doc = "  该档位 `panic = \"abort\"`，panic 进入本 crate 的停机出口。"]
#![doc = "- Loom：`RUSTFLAGS=\"--cfg kindle_loom\" cargo test -p kindle-core --features loom-model --test loom_lifecycle`。"]

pub mod ffi;
pub mod image;

#[cfg(feature = "std")]
pub mod config;
#[cfg(feature = "std")]
pub mod telemetry;

use kindle_core::{LifecycleController, LifecycleOutcome, LifecycleState};

pub use image::{InstallError, InstalledImage, install_boot_image, is_image_frozen};
pub use kindle_core::{BootImage, Hook, InitializerChain, StaticChain, StaticInitializer};
pub use kindle_platform::PlatformDescriptor;

/// 进程级运行时实例。
pub static RUNTIME: LifecycleController<InstalledImage> = LifecycleController::new(InstalledImage);

/// 启动运行时；已激活时被吸收。
pub fn startup() -> LifecycleOutcome {
    RUNTIME.startup()
}

/// 关闭运行时；未激活时被吸收。
pub fn shutdown() -> LifecycleOutcome {
    RUNTIME.shutdown()
}

/// 当前激活状态。
pub fn state() -> LifecycleState {
    RUNTIME.state()
}

/// 已完成的激活周期数。
pub fn generation() -> usize {
    RUNTIME.generation()
}

/// 本构建的平台能力描述符。
pub const fn platform() -> PlatformDescriptor {
    PlatformDescriptor::NATIVE
}

/// 非 `std` 静态库的 panic 出口。
///
/// 裸机目标没有宿主进程可以回收，停在原地自旋，交给看门狗或调试器处理。
/// 生命周期控制器的毒化依赖栈展开，`panic = "abort"` 下不会发生。
#[cfg(all(feature = "panic-halt", not(feature = "std"), not(test)))]
#[panic_handler]
fn halt_on_panic(_info: &core::panic::PanicInfo<'_>) -> ! {
    loop {
        core::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn bare_metal_feature_brings_a_panic_exit() {
        if cfg!(feature = "bare-metal") {
            assert!(cfg!(feature = "panic-halt"), "裸机静态库必须自带 panic 出口");
        }
    }

    #[test]
    fn platform_matches_runtime_profile() {
        let platform = super::platform();
        assert_eq!(platform.class(), kindle_core::NATIVE_TARGET);
        assert_eq!(
            platform.supports(kindle_platform::Capabilities::DYNAMIC_LOADING),
            kindle_platform::HAS_DYNAMIC_LOADING
        );
    }
}
