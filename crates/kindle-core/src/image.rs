//! 引导镜像：生命周期控制器驱动的五类协作者的构建期汇总。
//!
//! # 模块定位（Why）
//! - 托管运行时的引导由五段不透明过程组成：线程子系统引导、核心运行时引导、通用静态构造链、
//!   运行时关闭钩子、通用静态析构链；
//! - [`BootImage`] 将它们固化为一个 `const` 可构造、`Copy` 的配置对象，并实现 [`RuntimeHooks`]，
//!   使控制器不必知道协作者来自 Rust 表还是编译器生成的 C 符号。
//!
//! # 结构说明（What）
//! - [`StaticChain::Table`]：逐条登记的 [`InitializerChain`]；
//! - [`StaticChain::Aggregate`]：单个聚合构造 + 可选聚合析构（典型如编译器生成的 `StaticCtor`/`StaticDtor`）。

use crate::{
    error::RegistryError,
    initializer::{Hook, InitializerChain},
    lifecycle::RuntimeHooks,
};

/// 通用静态构造 / 析构链的两种来源。
#[derive(Clone, Copy, Debug)]
pub enum StaticChain {
    /// 显式有序表。
    Table(InitializerChain),
    /// 单一聚合过程。
    Aggregate {
        construct: Hook,
        destruct: Option<Hook>,
    },
}

impl StaticChain {
    /// 执行构造链。
    pub fn construct(&self) {
        match self {
            StaticChain::Table(chain) => chain.construct_all(),
            StaticChain::Aggregate { construct, .. } => construct.invoke(),
        }
    }

    /// 执行析构链。
    pub fn destruct(&self) {
        match self {
            StaticChain::Table(chain) => chain.destruct_all(),
            StaticChain::Aggregate { destruct, .. } => {
                if let Some(hook) = destruct {
                    hook.invoke();
                }
            }
        }
    }
}

/// 构建期确定的引导镜像。
///
/// # 契约说明（What）
/// - `thread_bootstrap` / `runtime_bootstrap`：仅在裸机档位由控制器调用，且严格先线程后运行时；
/// - `statics`：每个激活周期构造一次、析构一次；
/// - `shutdown_hook`：停用时先于静态析构执行（刷新、汇合线程、释放资源）。
///
/// # 风险提示（Trade-offs）
/// - 镜像不保存任何状态，恰好一次语义完全由 [`crate::LifecycleController`] 提供；
/// - 缺省的引导钩子为空操作，宿主档位下即便登记也不会被调用。
#[derive(Clone, Copy, Debug)]
pub struct BootImage {
    thread_bootstrap: Option<Hook>,
    runtime_bootstrap: Option<Hook>,
    statics: StaticChain,
    shutdown_hook: Option<Hook>,
}

impl BootImage {
    /// 不含任何协作者的镜像。
    pub const EMPTY: BootImage = BootImage::new(StaticChain::Table(InitializerChain::empty()));

    /// 以静态链构造镜像。
    pub const fn new(statics: StaticChain) -> Self {
        Self {
            thread_bootstrap: None,
            runtime_bootstrap: None,
            statics,
            shutdown_hook: None,
        }
    }

    /// 以初始化表构造镜像。
    pub const fn from_chain(chain: InitializerChain) -> Self {
        Self::new(StaticChain::Table(chain))
    }

    /// 登记线程子系统引导。
    pub const fn with_thread_bootstrap(mut self, hook: Hook) -> Self {
        self.thread_bootstrap = Some(hook);
        self
    }

    /// 登记核心运行时引导。
    pub const fn with_runtime_bootstrap(mut self, hook: Hook) -> Self {
        self.runtime_bootstrap = Some(hook);
        self
    }

    /// 登记运行时关闭钩子。
    pub const fn with_shutdown_hook(mut self, hook: Hook) -> Self {
        self.shutdown_hook = Some(hook);
        self
    }

    /// 静态链。
    pub const fn statics(&self) -> &StaticChain {
        &self.statics
    }

    /// 校验镜像中的初始化表。
    pub fn validate(&self) -> Result<(), RegistryError> {
        match &self.statics {
            StaticChain::Table(chain) => chain.validate(),
            StaticChain::Aggregate { .. } => Ok(()),
        }
    }
}

impl Default for BootImage {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl RuntimeHooks for BootImage {
    fn thread_bootstrap(&self) {
        if let Some(hook) = self.thread_bootstrap {
            hook.invoke();
        }
    }

    fn runtime_bootstrap(&self) {
        if let Some(hook) = self.runtime_bootstrap {
            hook.invoke();
        }
    }

    fn construct_statics(&self) {
        self.statics.construct();
    }

    fn shutdown_runtime(&self) {
        if let Some(hook) = self.shutdown_hook {
            hook.invoke();
        }
    }

    fn destruct_statics(&self) {
        self.statics.destruct();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicUsize, Ordering};

    static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
    static DESTRUCTED: AtomicUsize = AtomicUsize::new(0);

    extern "C" fn aggregate_ctor() {
        CONSTRUCTED.fetch_add(1, Ordering::SeqCst);
    }

    extern "C" fn aggregate_dtor() {
        DESTRUCTED.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn aggregate_chain_invokes_foreign_pair() {
        let image = BootImage::new(StaticChain::Aggregate {
            construct: Hook::Foreign(aggregate_ctor),
            destruct: Some(Hook::Foreign(aggregate_dtor)),
        });
        assert!(image.validate().is_ok());

        image.construct_statics();
        image.shutdown_runtime();
        image.destruct_statics();

        assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
        assert_eq!(DESTRUCTED.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_image_is_inert() {
        let image = BootImage::default();
        image.thread_bootstrap();
        image.runtime_bootstrap();
        image.construct_statics();
        image.shutdown_runtime();
        image.destruct_statics();
        assert!(matches!(image.statics(), StaticChain::Table(chain) if chain.is_empty()));
    }
}
