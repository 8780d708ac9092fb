//! 进程级引导镜像的安装与冻结。
//!
//! # 模块定位（Why）
//! - 进程级控制器是 `static`，其协作者必须在编译期确定类型；镜像内容却由宿主在运行期（`main` 之前或之初）提供；
//! - [`InstalledImage`] 是零尺寸的间接层：控制器第一次调用钩子时读取已安装的镜像，此后镜像不可替换。
//!
//! # 契约说明（What）
//! - [`install_boot_image`] 校验后安装，进程内至多成功一次；
//! - 首次 `startup` 会冻结镜像：若此前未安装，冻结为 [`BootImage::EMPTY`] 并输出 `warn`；
//!   因此每一对构造 / 析构看到的都是同一份镜像；
//! - 冻结之后再安装返回 [`InstallError::AlreadyInstalled`]。

use kindle_core::{BootImage, RegistryError, RuntimeHooks, observability::targets};
use spin::Once;
use thiserror::Error;

static IMAGE: Once<BootImage> = Once::new();

/// 镜像安装失败。
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum InstallError {
    /// 镜像已安装，或首次启动已冻结了空镜像。
    #[error("a boot image is already installed or was frozen by the first startup")]
    AlreadyInstalled,
    /// 初始化表未通过校验。
    #[error("boot image rejected: {0}")]
    Invalid(#[from] RegistryError),
    /// C 宿主提供的表为空指针或缺少静态构造入口。
    #[error("boot image table is null or lacks a static constructor")]
    MissingConstructor,
}

/// 校验并安装进程级引导镜像。
pub fn install_boot_image(image: BootImage) -> Result<(), InstallError> {
    image.validate()?;
    let mut installed = false;
    IMAGE.call_once(|| {
        installed = true;
        image
    });
    if !installed {
        tracing::warn!(target: targets::RUNTIME, "boot image installation rejected: already installed");
        return Err(InstallError::AlreadyInstalled);
    }
    tracing::debug!(target: targets::RUNTIME, "boot image installed");
    Ok(())
}

/// 是否已有镜像生效（显式安装或被首次启动冻结）。
pub fn is_image_frozen() -> bool {
    IMAGE.is_completed()
}

/// 进程级控制器的协作者：把每个钩子转发给已冻结的镜像。
#[derive(Clone, Copy, Debug, Default)]
pub struct InstalledImage;

impl InstalledImage {
    fn image(&self) -> &'static BootImage {
        IMAGE.call_once(|| {
            tracing::warn!(
                target: targets::RUNTIME,
                "no boot image installed before startup; running with an empty image"
            );
            BootImage::EMPTY
        })
    }
}

impl RuntimeHooks for InstalledImage {
    fn thread_bootstrap(&self) {
        self.image().thread_bootstrap();
    }

    fn runtime_bootstrap(&self) {
        self.image().runtime_bootstrap();
    }

    fn construct_statics(&self) {
        self.image().construct_statics();
    }

    fn shutdown_runtime(&self) {
        self.image().shutdown_runtime();
    }

    fn destruct_statics(&self) {
        self.image().destruct_statics();
    }
}
