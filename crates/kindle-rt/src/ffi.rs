//! C ABI 出口。
//!
//! # 模块定位（Why）
//! - 编译器生成的宿主程序以 C 调用约定驱动运行时：在任何运行时 API 之前调用一次 `kindle_runtime_startup`，
//!   最后调用一次 `kindle_runtime_shutdown`；
//! - 静态构造 / 析构链由编译器生成为 C 符号，经 [`KindleBootImage`] 表交给运行时。
//!
//! # 契约说明（What）
//! - 启动 / 关闭出口没有返回值，重复调用被吸收；需要诊断时读取 `kindle_runtime_state`；
//! - `kindle_runtime_install_image` 返回 [`KINDLE_INSTALL_OK`]、[`KINDLE_INSTALL_ALREADY_INSTALLED`]
//!   或 [`KINDLE_INSTALL_INVALID`]；
//! - 协作者 panic 不会跨越 C 边界展开：`extern "C"` 函数中的 panic 直接终止进程。

#![allow(unsafe_code)]

use kindle_core::{BootImage, Hook, StaticChain};

use crate::image::{InstallError, install_boot_image};

/// 安装成功。
pub const KINDLE_INSTALL_OK: i32 = 0;
/// 已安装或已被首次启动冻结。
pub const KINDLE_INSTALL_ALREADY_INSTALLED: i32 = 1;
/// 表为空指针或缺少静态构造入口。
pub const KINDLE_INSTALL_INVALID: i32 = 2;

/// C 宿主提供的引导表；每一项都可以为空指针，`construct_statics` 除外。
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct KindleBootImage {
    pub thread_bootstrap: Option<extern "C" fn()>,
    pub runtime_bootstrap: Option<extern "C" fn()>,
    pub construct_statics: Option<extern "C" fn()>,
    pub destruct_statics: Option<extern "C" fn()>,
    pub shutdown_runtime: Option<extern "C" fn()>,
}

impl KindleBootImage {
    /// 转换为 [`BootImage`]，静态链采用聚合形式。
    pub fn to_boot_image(&self) -> Result<BootImage, InstallError> {
        let construct = self
            .construct_statics
            .ok_or(InstallError::MissingConstructor)?;
        let mut image = BootImage::new(StaticChain::Aggregate {
            construct: Hook::Foreign(construct),
            destruct: self.destruct_statics.map(Hook::Foreign),
        });
        if let Some(hook) = self.thread_bootstrap {
            image = image.with_thread_bootstrap(Hook::Foreign(hook));
        }
        if let Some(hook) = self.runtime_bootstrap {
            image = image.with_runtime_bootstrap(Hook::Foreign(hook));
        }
        if let Some(hook) = self.shutdown_runtime {
            image = image.with_shutdown_hook(Hook::Foreign(hook));
        }
        Ok(image)
    }
}

/// 启动运行时（幂等）。
#[unsafe(no_mangle)]
pub extern "C" fn kindle_runtime_startup() {
    crate::startup();
}

/// 关闭运行时（幂等）。
#[unsafe(no_mangle)]
pub extern "C" fn kindle_runtime_shutdown() {
    crate::shutdown();
}

/// 当前激活状态：0 Stopped，1 Starting，2 Running，3 Stopping，4 Poisoned。
#[unsafe(no_mangle)]
pub extern "C" fn kindle_runtime_state() -> u8 {
    crate::state().as_u8()
}

/// 安装 C 宿主提供的引导表，须在首次启动前调用。
#[unsafe(no_mangle)]
pub extern "C" fn kindle_runtime_install_image(image: Option<&KindleBootImage>) -> i32 {
    let result = image
        .ok_or(InstallError::MissingConstructor)
        .and_then(KindleBootImage::to_boot_image)
        .and_then(install_boot_image);
    match result {
        Ok(()) => KINDLE_INSTALL_OK,
        Err(InstallError::AlreadyInstalled) => KINDLE_INSTALL_ALREADY_INSTALLED,
        Err(_) => KINDLE_INSTALL_INVALID,
    }
}
