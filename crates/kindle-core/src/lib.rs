#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]
#![doc = "kindle-core: 托管语言运行时引导层的生命周期契约。"]
#![doc = ""]
#![doc = "== 职责边界 =="]
#![doc = "1. 生命周期控制器：`startup`/`shutdown` 幂等且恰好一次，支持多线程并发嵌入方。"]
#![doc = "2. 静态初始化器集合：以显式有序表登记构造/析构对，替代隐式的链接顺序。"]
#![doc = "3. 目标档位：宿主机（Hosted）与裸机（BareMetal）的引导差异在构建期选定，运行期零分支。"]
#![doc = ""]
#![doc = "== 内存分配依赖 =="]
#![doc = "控制器与初始化表均为 `const` 可构造的静态数据，不依赖堆；仅 `test_stubs` 在 `alloc` Feature 下提供记录型桩对象。"]

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod image;
pub mod initializer;
pub mod lifecycle;
pub mod observability;
pub mod target;
/// 测试桩命名空间，集中暴露记录调用顺序的 `RuntimeHooks` 实现，供集成测试、Loom 模型与基准复用。
///
/// # 设计背景（Why）
/// - 生命周期性质（幂等、顺序、对称）都需要“记录型”协作者来观测；
/// - 统一维护可以避免每个测试文件重复定义计数器结构。
#[cfg(feature = "alloc")]
pub mod test_stubs;

mod sync;

pub use error::RegistryError;
pub use image::{BootImage, StaticChain};
pub use initializer::{Hook, InitializerChain, StaticInitializer};
pub use lifecycle::{LifecycleController, LifecycleOutcome, LifecycleState, RuntimeHooks};
pub use target::{BareMetal, Hosted, NATIVE_TARGET, NativeProfile, TargetClass, TargetProfile};
