//! 记录型协作者桩。
//!
//! # 设计定位（Why）
//! - 生命周期的全部性质（幂等、顺序、对称、恰好一次）都通过“协作者被调用了几次、以什么顺序”来观测；
//! - 统一的 [`RecordingHooks`] 同时服务于单元测试、proptest 影子模型、Loom 模型与基准。
//!
//! # 契约说明（What）
//! - 每次钩子调用向事件日志追加一条 [`HookEvent`]，并对构造 / 析构分别计数；
//! - 计数器使用 crate 内部的原子切换点，Loom 模型下同样可被穷举；
//! - 事件日志由 `spin::Mutex` 保护，临界区内不含任何同步点。

use alloc::vec::Vec;

use crate::{
    lifecycle::RuntimeHooks,
    sync::{AtomicUsize, Ordering},
};

/// 钩子调用事件。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookEvent {
    ThreadBootstrap,
    RuntimeBootstrap,
    ConstructStatics,
    ShutdownRuntime,
    DestructStatics,
}

/// 记录全部调用的 [`RuntimeHooks`] 实现。
pub struct RecordingHooks {
    events: spin::Mutex<Vec<HookEvent>>,
    constructions: AtomicUsize,
    destructions: AtomicUsize,
}

impl RecordingHooks {
    /// 创建空记录。
    pub fn new() -> Self {
        Self {
            events: spin::Mutex::new(Vec::new()),
            constructions: AtomicUsize::new(0),
            destructions: AtomicUsize::new(0),
        }
    }

    /// 事件日志快照。
    pub fn events(&self) -> Vec<HookEvent> {
        self.events.lock().clone()
    }

    /// 静态构造链被调用的次数。
    pub fn constructions(&self) -> usize {
        self.constructions.load(Ordering::Acquire)
    }

    /// 静态析构链被调用的次数。
    pub fn destructions(&self) -> usize {
        self.destructions.load(Ordering::Acquire)
    }

    /// 清空日志与计数。
    pub fn reset(&self) {
        self.events.lock().clear();
        self.constructions.store(0, Ordering::Release);
        self.destructions.store(0, Ordering::Release);
    }

    fn push(&self, event: HookEvent) {
        self.events.lock().push(event);
    }
}

impl core::fmt::Debug for RecordingHooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecordingHooks")
            .field("events", &*self.events.lock())
            .field("constructions", &self.constructions())
            .field("destructions", &self.destructions())
            .finish()
    }
}

impl Default for RecordingHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl RuntimeHooks for RecordingHooks {
    fn thread_bootstrap(&self) {
        self.push(HookEvent::ThreadBootstrap);
    }

    fn runtime_bootstrap(&self) {
        self.push(HookEvent::RuntimeBootstrap);
    }

    fn construct_statics(&self) {
        self.push(HookEvent::ConstructStatics);
        self.constructions.fetch_add(1, Ordering::AcqRel);
    }

    fn shutdown_runtime(&self) {
        self.push(HookEvent::ShutdownRuntime);
    }

    fn destruct_statics(&self) {
        self.push(HookEvent::DestructStatics);
        self.destructions.fetch_add(1, Ordering::AcqRel);
    }
}
