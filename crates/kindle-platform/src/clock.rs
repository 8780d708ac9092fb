//! 单调时钟。
//!
//! # 模块定位（Why）
//! - 运行时的计时、超时与统计都依赖一个不会回拨的时钟源；
//! - 宿主目标直接使用 `std::time::Instant`，裸机目标由板级支持包提供计数器与频率。
//!
//! # 选择规则（How）
//! - 已通过 [`install_tick_source`] 安装板级计数器时，[`monotonic_now`] 总是读取它；
//! - 否则在 `std` 下读取进程级 [`HostClock`]；
//! - 两者都不可用时返回 [`PlatformError::Unsupported`]。
//!
//! # 契约说明（What）
//! - 返回值是相对某个固定但未指明原点的时长，只用于求差；
//! - 节拍源只能安装一次，安装后不可替换。

use core::time::Duration;

use spin::Once;

use crate::error::PlatformError;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// 单调时钟源。
pub trait MonotonicClock: Send + Sync {
    /// 自固定原点以来经过的时长。
    fn now(&self) -> Duration;
}

/// 基于 `std::time::Instant` 的宿主时钟。
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug)]
pub struct HostClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl HostClock {
    /// 以当前时刻为原点。
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for HostClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl MonotonicClock for HostClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// 板级计数器时钟：`ticks()` 返回单调递增的计数，`hz` 为计数频率。
///
/// # 风险提示（Trade-offs）
/// - 计数器回绕由板级代码负责扩展为 64 位；本类型假定读数不回绕；
/// - 换算使用 128 位中间值，在 `u64` 全范围内不会溢出。
#[derive(Clone, Copy, Debug)]
pub struct TickClock {
    ticks: fn() -> u64,
    hz: u64,
}

impl TickClock {
    /// 构造计数器时钟，`hz` 为 0 时返回 [`PlatformError::InvalidFrequency`]。
    pub const fn new(ticks: fn() -> u64, hz: u64) -> Result<Self, PlatformError> {
        if hz == 0 {
            return Err(PlatformError::InvalidFrequency);
        }
        Ok(Self { ticks, hz })
    }

    /// 计数频率。
    pub const fn frequency(&self) -> u64 {
        self.hz
    }

    /// 把计数换算为时长。
    pub const fn ticks_to_duration(ticks: u64, hz: u64) -> Duration {
        let secs = ticks / hz;
        let remainder = (ticks % hz) as u128;
        let nanos = (remainder * NANOS_PER_SEC / hz as u128) as u32;
        Duration::new(secs, nanos)
    }
}

impl MonotonicClock for TickClock {
    fn now(&self) -> Duration {
        Self::ticks_to_duration((self.ticks)(), self.hz)
    }
}

static TICK_SOURCE: Once<TickClock> = Once::new();

#[cfg(feature = "std")]
static HOST_CLOCK: Once<HostClock> = Once::new();

/// 安装板级计数器作为进程级单调时钟源。
///
/// # 契约说明（What）
/// - `hz == 0` 返回 [`PlatformError::InvalidFrequency`]；
/// - 已安装过（包括并发安装的竞争失败者）返回 [`PlatformError::TickSourceAlreadyInstalled`]。
pub fn install_tick_source(ticks: fn() -> u64, hz: u64) -> Result<(), PlatformError> {
    let clock = TickClock::new(ticks, hz)?;
    let mut installed = false;
    TICK_SOURCE.call_once(|| {
        installed = true;
        clock
    });
    if !installed {
        return Err(PlatformError::TickSourceAlreadyInstalled);
    }
    tracing::debug!(
        target: kindle_core::observability::targets::PLATFORM,
        hz,
        "tick source installed"
    );
    Ok(())
}

/// 当前是否已有可读的时钟源。
///
/// [`crate::Capabilities::MONOTONIC_CLOCK`] 描述的是“本构建可以提供单调时钟”；
/// 非 `std` 构建要在 [`install_tick_source`] 之后才真正可读，读取前可用本函数确认。
pub fn clock_source_ready() -> bool {
    TICK_SOURCE.is_completed() || cfg!(feature = "std")
}

/// 读取本构建的单调时钟。
///
/// 非 `std` 构建在安装节拍源之前返回 [`PlatformError::Unsupported`]。
pub fn monotonic_now() -> Result<Duration, PlatformError> {
    if let Some(clock) = TICK_SOURCE.get() {
        return Ok(clock.now());
    }
    host_now()
}

#[cfg(feature = "std")]
fn host_now() -> Result<Duration, PlatformError> {
    Ok(HOST_CLOCK.call_once(HostClock::new).now())
}

#[cfg(not(feature = "std"))]
fn host_now() -> Result<Duration, PlatformError> {
    Err(PlatformError::Unsupported {
        capability: "monotonic_clock",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::sync::atomic::{AtomicU64, Ordering};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    fn stepping_counter() -> u64 {
        COUNTER.fetch_add(250, Ordering::SeqCst)
    }

    #[test]
    fn tick_conversion_splits_seconds_and_nanos() {
        assert_eq!(TickClock::ticks_to_duration(0, 1_000), Duration::ZERO);
        assert_eq!(
            TickClock::ticks_to_duration(1_500, 1_000),
            Duration::from_millis(1_500)
        );
        assert_eq!(
            TickClock::ticks_to_duration(3, 4),
            Duration::from_millis(750)
        );
        assert_eq!(
            TickClock::ticks_to_duration(u64::MAX, 1),
            Duration::from_secs(u64::MAX)
        );
        assert_eq!(
            TickClock::ticks_to_duration(32_768 + 16_384, 32_768),
            Duration::from_millis(1_500)
        );
    }

    #[test]
    fn zero_frequency_is_rejected() {
        assert!(matches!(
            TickClock::new(stepping_counter, 0),
            Err(PlatformError::InvalidFrequency)
        ));
        assert!(matches!(
            install_tick_source(stepping_counter, 0),
            Err(PlatformError::InvalidFrequency)
        ));
    }

    #[test]
    fn tick_clock_reads_counter() {
        let clock = TickClock::new(stepping_counter, 1_000).expect("valid frequency");
        let first = clock.now();
        let second = clock.now();
        assert!(second > first);
        assert_eq!(clock.frequency(), 1_000);
    }

    #[cfg(feature = "std")]
    #[test]
    fn host_clock_never_goes_backwards() {
        let clock = HostClock::new();
        let mut previous = clock.now();
        for _ in 0..1_000 {
            let current = clock.now();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn installed_tick_source_is_exclusive() {
        let first = install_tick_source(stepping_counter, 1_000_000);
        let second = install_tick_source(stepping_counter, 1_000_000);
        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(PlatformError::TickSourceAlreadyInstalled)
        ));

        let before = monotonic_now().expect("tick source installed");
        let after = monotonic_now().expect("tick source installed");
        assert!(after > before);
    }

    #[test]
    fn readiness_matches_readability() {
        if clock_source_ready() {
            assert!(monotonic_now().is_ok());
        }
        if monotonic_now().is_err() {
            assert!(!cfg!(feature = "std"), "std 构建总有宿主时钟");
        }
        assert!(crate::PlatformDescriptor::NATIVE.supports(crate::Capabilities::MONOTONIC_CLOCK));
    }
}
