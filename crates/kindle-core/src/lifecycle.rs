//! 生命周期控制器：幂等、有序、恰好一次的运行时启动与关闭。
//!
//! # 模块定位（Why）
//! - 嵌入方在使用运行时前调用一次 `startup`，结束时调用一次 `shutdown`；
//!   控制器保证静态构造在每个激活周期恰好执行一次，并以对称方式拆除；
//! - 以普通布尔标志做“先检查后设置”时，并发嵌入方会同时观察到 `false` 并重复初始化；
//!   原子状态机把检查与设置合并为一次比较交换。
//!
//! # 状态机（What）
//! ```text
//!            startup (CAS)                 hooks 完成
//! Stopped ─────────────────▶ Starting ───────────────▶ Running
//!    ▲                                                   │
//!    │        hooks 完成                shutdown (CAS)    │
//!    └──────────────────── Stopping ◀────────────────────┘
//!
//! 任一过渡态中协作者 panic ──▶ Poisoned（终态）
//! ```
//! - 对外可见的稳定态只有 `Stopped` / `Running`；`Starting` / `Stopping` 仅在钩子执行期间存在；
//! - `Running` 上再次 `startup`、`Stopped` 上再次 `shutdown` 均为空操作，不是错误。
//!
//! # 失败策略（Trade-offs）
//! - 协作者是无返回值的过程，失败即 panic（或由协作者自行 abort）。控制器选择“传播”：
//!   panic 原样穿出 `startup()`/`shutdown()`，同时由守卫将状态置为 `Poisoned`，之后两个操作都只记录
//!   `error` 日志并返回 [`LifecycleOutcome::Poisoned`]。不尝试回滚已执行的构造。

use core::{fmt, marker::PhantomData};

use crate::{
    observability::{phases, targets},
    sync::{AtomicU8, AtomicUsize, Ordering, relax},
    target::{NativeProfile, TargetClass, TargetProfile},
};

/// 控制器驱动的五类协作者。
///
/// # 契约说明（What）
/// - 所有方法在调用线程上同步执行，彼此之间不会并发；
/// - `thread_bootstrap` → `runtime_bootstrap` 只在裸机档位调用，且严格按此顺序、先于 `construct_statics`；
/// - `shutdown_runtime` 严格先于 `destruct_statics`；
/// - 实现方不得假设自身会被重复调用：每个激活周期各调用一次。
///
/// # 风险提示（Trade-offs）
/// - 在钩子内部再次调用同一控制器的 `startup`/`shutdown` 会被识别为重入并返回
///   [`LifecycleOutcome::InTransition`]（需要 `std`）；纯 `no_std` 构建无法识别线程身份，
///   宿主档位下的重入会自旋等待自身，属于误用。
pub trait RuntimeHooks: Send + Sync {
    /// 线程子系统引导（仅裸机）。
    fn thread_bootstrap(&self) {}

    /// 核心运行时引导（仅裸机），可依赖线程局部存储已就绪。
    fn runtime_bootstrap(&self) {}

    /// 通用静态构造链。
    fn construct_statics(&self);

    /// 运行时级关闭钩子：刷新、汇合、释放。
    fn shutdown_runtime(&self) {}

    /// 通用静态析构链。
    fn destruct_statics(&self);
}

/// 运行时激活状态。
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    /// 未激活（初始态）。
    Stopped = 0,
    /// 启动钩子执行中。
    Starting = 1,
    /// 已激活。
    Running = 2,
    /// 关闭钩子执行中。
    Stopping = 3,
    /// 协作者在过渡期间 panic，控制器不再执行任何钩子。
    Poisoned = 4,
}

impl LifecycleState {
    const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => LifecycleState::Stopped,
            1 => LifecycleState::Starting,
            2 => LifecycleState::Running,
            3 => LifecycleState::Stopping,
            _ => LifecycleState::Poisoned,
        }
    }

    /// 稳定的数值编码，C ABI 出口直接使用。
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// 是否处于钩子执行期间。
    pub const fn is_transient(self) -> bool {
        matches!(self, LifecycleState::Starting | LifecycleState::Stopping)
    }

    /// 日志字段使用的短名称。
    pub const fn as_str(self) -> &'static str {
        match self {
            LifecycleState::Stopped => "stopped",
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Stopping => "stopping",
            LifecycleState::Poisoned => "poisoned",
        }
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单次 `startup`/`shutdown` 调用的结果，用于诊断与测试；C ABI 出口会丢弃它。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleOutcome {
    /// 本次调用执行了启动序列。
    Started,
    /// 已处于激活态，调用被吸收。
    AlreadyRunning,
    /// 本次调用执行了关闭序列。
    Stopped,
    /// 已处于未激活态，调用被吸收。
    AlreadyStopped,
    /// 另一过渡正在进行（裸机档位不等待，或当前线程正是过渡的执行者）。
    InTransition,
    /// 控制器已被毒化。
    Poisoned,
}

impl LifecycleOutcome {
    /// 本次调用是否真正执行了钩子序列。
    pub const fn performed_transition(self) -> bool {
        matches!(self, LifecycleOutcome::Started | LifecycleOutcome::Stopped)
    }
}

/// 幂等、恰好一次的运行时生命周期控制器。
///
/// # 设计背景（Why）
/// - 激活状态是引导层唯一的共享可变资源，封装在控制器内部，只能经由 `startup`/`shutdown` 改变；
/// - 档位 `P` 在构建期选定，裸机额外的引导步骤与竞争策略均由关联常量决定，无运行期配置。
///
/// # 逻辑解析（How）
/// 1. `startup` 以 `compare_exchange(Stopped → Starting)` 抢占过渡权，失败者根据观察到的状态分流：
///    `Running` 直接返回；过渡态在宿主档位下让步重试，在裸机档位下立即返回；
/// 2. 获胜者在调用线程上顺序执行钩子，随后以 `Release` 发布 `Running`；
/// 3. `shutdown` 对称地以 `Running → Stopping` 抢占。
///
/// # 契约说明（What）
/// - **前置条件**：无；可在任意线程、任意次数调用；
/// - **后置条件**：`startup` 返回 `Started`/`AlreadyRunning` 时，构造链已完整执行且其写入对调用方可见；
/// - `new` 为 `const fn`（Loom 模型下除外），可直接放入 `static`。
///
/// # 风险提示（Trade-offs）
/// - 钩子永久阻塞会让宿主档位的其他调用方一同等待，控制器不设超时；
/// - 宿主档位下关闭过程中到达的 `startup` 会在关闭完成后开始一个新的激活周期。
pub struct LifecycleController<H, P = NativeProfile> {
    state: AtomicU8,
    generation: AtomicUsize,
    owner: owner::TransitionOwner,
    hooks: H,
    _profile: PhantomData<fn() -> P>,
}

impl<H: RuntimeHooks, P: TargetProfile> LifecycleController<H, P> {
    /// 以协作者集合构造处于 `Stopped` 的控制器。
    #[cfg(not(any(loom, kindle_loom)))]
    pub const fn new(hooks: H) -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Stopped.as_u8()),
            generation: AtomicUsize::new(0),
            owner: owner::TransitionOwner::new(),
            hooks,
            _profile: PhantomData,
        }
    }

    /// 以协作者集合构造处于 `Stopped` 的控制器。
    #[cfg(any(loom, kindle_loom))]
    pub fn new(hooks: H) -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Stopped.as_u8()),
            generation: AtomicUsize::new(0),
            owner: owner::TransitionOwner::new(),
            hooks,
            _profile: PhantomData,
        }
    }

    /// 启动运行时。
    ///
    /// 仅在 `Stopped → Running` 转换时执行：裸机档位先线程子系统引导、再核心运行时引导，
    /// 随后执行通用静态构造链。
    pub fn startup(&self) -> LifecycleOutcome {
        loop {
            match self.state.compare_exchange(
                LifecycleState::Stopped.as_u8(),
                LifecycleState::Starting.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return self.run_startup(),
                Err(observed) => match LifecycleState::from_raw(observed) {
                    LifecycleState::Running => {
                        tracing::trace!(target: targets::LIFECYCLE, "startup absorbed: runtime already running");
                        return LifecycleOutcome::AlreadyRunning;
                    }
                    LifecycleState::Poisoned => {
                        tracing::error!(target: targets::LIFECYCLE, "startup refused: lifecycle poisoned");
                        return LifecycleOutcome::Poisoned;
                    }
                    state @ (LifecycleState::Starting | LifecycleState::Stopping) => {
                        if let Some(outcome) = self.contend(state, "startup") {
                            return outcome;
                        }
                    }
                    LifecycleState::Stopped => {}
                },
            }
        }
    }

    /// 关闭运行时。
    ///
    /// 仅在 `Running → Stopped` 转换时执行：先运行时关闭钩子，再通用静态析构链。
    pub fn shutdown(&self) -> LifecycleOutcome {
        loop {
            match self.state.compare_exchange(
                LifecycleState::Running.as_u8(),
                LifecycleState::Stopping.as_u8(),
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return self.run_shutdown(),
                Err(observed) => match LifecycleState::from_raw(observed) {
                    LifecycleState::Stopped => {
                        tracing::trace!(target: targets::LIFECYCLE, "shutdown absorbed: runtime already stopped");
                        return LifecycleOutcome::AlreadyStopped;
                    }
                    LifecycleState::Poisoned => {
                        tracing::error!(target: targets::LIFECYCLE, "shutdown refused: lifecycle poisoned");
                        return LifecycleOutcome::Poisoned;
                    }
                    state @ (LifecycleState::Starting | LifecycleState::Stopping) => {
                        if let Some(outcome) = self.contend(state, "shutdown") {
                            return outcome;
                        }
                    }
                    LifecycleState::Running => {}
                },
            }
        }
    }

    /// 当前激活状态。
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_raw(self.state.load(Ordering::Acquire))
    }

    /// 是否处于 `Running`。
    pub fn is_running(&self) -> bool {
        self.state() == LifecycleState::Running
    }

    /// 已完成的激活周期数（每次成功 `startup` 加一）。
    pub fn generation(&self) -> usize {
        self.generation.load(Ordering::Acquire)
    }

    /// 协作者集合。
    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    /// 构建期选定的目标类别。
    pub const fn target_class(&self) -> TargetClass {
        P::CLASS
    }

    /// 观察到过渡态时的分流：返回 `Some` 表示本次调用就此结束，`None` 表示让步后重试。
    fn contend(&self, observed: LifecycleState, operation: &'static str) -> Option<LifecycleOutcome> {
        if self.owner.is_current() {
            tracing::trace!(
                target: targets::LIFECYCLE,
                operation,
                state = observed.as_str(),
                "re-entrant call absorbed"
            );
            return Some(LifecycleOutcome::InTransition);
        }
        if !P::WAIT_FOR_TRANSITION {
            tracing::warn!(
                target: targets::LIFECYCLE,
                operation,
                state = observed.as_str(),
                "lifecycle transition in progress on another task; call skipped"
            );
            return Some(LifecycleOutcome::InTransition);
        }
        relax();
        None
    }

    fn run_startup(&self) -> LifecycleOutcome {
        let guard = TransitionGuard::claim(&self.state, &self.owner);
        if P::CLASS.requires_explicit_bootstrap() {
            tracing::debug!(target: targets::LIFECYCLE, phase = phases::THREAD_BOOTSTRAP, "bootstrap phase");
            self.hooks.thread_bootstrap();
            tracing::debug!(target: targets::LIFECYCLE, phase = phases::RUNTIME_BOOTSTRAP, "bootstrap phase");
            self.hooks.runtime_bootstrap();
        }
        tracing::debug!(target: targets::LIFECYCLE, phase = phases::CONSTRUCT_STATICS, "bootstrap phase");
        self.hooks.construct_statics();

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        guard.complete(LifecycleState::Running);
        tracing::info!(
            target: targets::LIFECYCLE,
            target_class = P::CLASS.as_str(),
            generation,
            "runtime started"
        );
        LifecycleOutcome::Started
    }

    fn run_shutdown(&self) -> LifecycleOutcome {
        let guard = TransitionGuard::claim(&self.state, &self.owner);
        tracing::debug!(target: targets::LIFECYCLE, phase = phases::SHUTDOWN_RUNTIME, "teardown phase");
        self.hooks.shutdown_runtime();
        tracing::debug!(target: targets::LIFECYCLE, phase = phases::DESTRUCT_STATICS, "teardown phase");
        self.hooks.destruct_statics();

        guard.complete(LifecycleState::Stopped);
        tracing::info!(
            target: targets::LIFECYCLE,
            target_class = P::CLASS.as_str(),
            generation = self.generation(),
            "runtime stopped"
        );
        LifecycleOutcome::Stopped
    }
}

impl<H: RuntimeHooks + Default, P: TargetProfile> Default for LifecycleController<H, P> {
    fn default() -> Self {
        Self::new(H::default())
    }
}

impl<H, P: TargetProfile> fmt::Debug for LifecycleController<H, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleController")
            .field("target_class", &P::CLASS)
            .field(
                "state",
                &LifecycleState::from_raw(self.state.load(Ordering::Acquire)),
            )
            .field("generation", &self.generation.load(Ordering::Acquire))
            .finish()
    }
}

/// 过渡期守卫：正常完成时发布目标状态，展开时把控制器置为 `Poisoned`。
struct TransitionGuard<'a> {
    state: &'a AtomicU8,
    owner: &'a owner::TransitionOwner,
    completed: bool,
}

impl<'a> TransitionGuard<'a> {
    fn claim(state: &'a AtomicU8, owner: &'a owner::TransitionOwner) -> Self {
        owner.claim();
        Self {
            state,
            owner,
            completed: false,
        }
    }

    fn complete(mut self, next: LifecycleState) {
        self.owner.release();
        self.state.store(next.as_u8(), Ordering::Release);
        self.completed = true;
    }
}

impl Drop for TransitionGuard<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        self.owner.release();
        self.state
            .store(LifecycleState::Poisoned.as_u8(), Ordering::Release);
        tracing::error!(
            target: targets::LIFECYCLE,
            "collaborator panicked during a lifecycle transition; lifecycle poisoned"
        );
    }
}

mod owner {
    //! 过渡执行者的线程身份，用于识别钩子内部的重入调用。

    /// 记录当前执行过渡的线程。
    #[cfg(all(feature = "std", not(any(loom, kindle_loom))))]
    pub(super) struct TransitionOwner {
        thread: spin::Mutex<Option<std::thread::ThreadId>>,
    }

    #[cfg(all(feature = "std", not(any(loom, kindle_loom))))]
    impl TransitionOwner {
        pub(super) const fn new() -> Self {
            Self {
                thread: spin::Mutex::new(None),
            }
        }

        pub(super) fn claim(&self) {
            *self.thread.lock() = Some(std::thread::current().id());
        }

        pub(super) fn release(&self) {
            *self.thread.lock() = None;
        }

        pub(super) fn is_current(&self) -> bool {
            let current = std::thread::current().id();
            *self.thread.lock() == Some(current)
        }
    }

    /// 无线程身份可用时的空实现：重入无法识别。
    #[cfg(not(all(feature = "std", not(any(loom, kindle_loom)))))]
    pub(super) struct TransitionOwner;

    #[cfg(not(all(feature = "std", not(any(loom, kindle_loom)))))]
    impl TransitionOwner {
        pub(super) const fn new() -> Self {
            Self
        }

        pub(super) fn claim(&self) {}

        pub(super) fn release(&self) {}

        pub(super) fn is_current(&self) -> bool {
            false
        }
    }
}
