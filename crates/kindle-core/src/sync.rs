//! 原子原语切换点。
//!
// 启用 `--cfg loom`/`--cfg kindle_loom` 时切换到 Loom 提供的原子类型，
// 让模型检查能够穷举生命周期状态机的所有调度交错。

#[cfg(not(any(loom, kindle_loom)))]
pub(crate) use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
#[cfg(any(loom, kindle_loom))]
pub(crate) use loom::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// 等待其他线程完成过渡态时的让步动作。
///
/// - Loom 下必须调用 `loom::thread::yield_now`，否则模型会判定为活锁；
/// - `std` 下让出时间片，避免与持有过渡态的线程争抢同一核心；
/// - 纯 `no_std` 下退化为 CPU 自旋提示。
#[inline]
pub(crate) fn relax() {
    #[cfg(any(loom, kindle_loom))]
    loom::thread::yield_now();
    #[cfg(all(not(any(loom, kindle_loom)), feature = "std"))]
    std::thread::yield_now();
    #[cfg(all(not(any(loom, kindle_loom)), not(feature = "std")))]
    core::hint::spin_loop();
}
