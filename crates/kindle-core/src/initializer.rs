//! 静态初始化器集合：显式、有序、构建期登记的构造/析构表。
//!
//! # 设计背景（Why）
//! - 托管语言编译器为每个子系统生成一段“静态构造”与可选的“静态析构”；若依赖链接顺序，
//!   顺序约束隐含且无法测试。
//! - 这里把它们收敛为 `'static` 有序表：构造按表序执行，析构按逆序执行，顺序即契约。
//!
//! # 使用方式（How）
//! ```rust
//! use kindle_core::{InitializerChain, StaticInitializer};
//!
//! fn threading() {}
//! fn threading_teardown() {}
//! fn reflection() {}
//!
//! static ENTRIES: [StaticInitializer; 2] = [
//!     StaticInitializer::new("threading", threading).with_teardown(threading_teardown),
//!     StaticInitializer::new("reflection", reflection),
//! ];
//! static CHAIN: InitializerChain = InitializerChain::new(&ENTRIES);
//!
//! assert!(CHAIN.validate().is_ok());
//! assert_eq!(CHAIN.len(), 2);
//! ```

use core::fmt;

use crate::{error::RegistryError, observability::targets};

/// 无参、无返回值的可调用对象。
///
/// - `Native`：Rust 侧函数指针；
/// - `Foreign`：跨链接边界的 C ABI 函数指针（例如编译器生成的静态构造符号）。
///
/// 两者都是 `Copy` 的纯数据，可出现在 `const` 表中。
#[derive(Clone, Copy)]
pub enum Hook {
    /// Rust 函数。
    Native(fn()),
    /// C ABI 函数。
    Foreign(extern "C" fn()),
}

impl Hook {
    /// 在调用线程上同步执行。
    #[inline]
    pub fn invoke(self) {
        match self {
            Hook::Native(hook) => hook(),
            Hook::Foreign(hook) => hook(),
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Native(_) => f.write_str("Hook::Native"),
            Hook::Foreign(_) => f.write_str("Hook::Foreign"),
        }
    }
}

impl From<fn()> for Hook {
    fn from(value: fn()) -> Self {
        Hook::Native(value)
    }
}

impl From<extern "C" fn()> for Hook {
    fn from(value: extern "C" fn()) -> Self {
        Hook::Foreign(value)
    }
}

/// 单个子系统贡献的静态初始化条目。
///
/// # 契约说明（What）
/// - `name`：稳定标识，用于日志与重复登记检测；
/// - `construct`：每个激活周期恰好调用一次；
/// - `destruct`：可选，存在时在停用阶段按表的逆序调用一次。
#[derive(Clone, Copy, Debug)]
pub struct StaticInitializer {
    name: &'static str,
    construct: Hook,
    destruct: Option<Hook>,
}

impl StaticInitializer {
    /// 以 Rust 函数登记仅有构造的条目。
    pub const fn new(name: &'static str, construct: fn()) -> Self {
        Self {
            name,
            construct: Hook::Native(construct),
            destruct: None,
        }
    }

    /// 以 C ABI 函数登记条目。
    pub const fn foreign(
        name: &'static str,
        construct: extern "C" fn(),
        destruct: Option<extern "C" fn()>,
    ) -> Self {
        Self {
            name,
            construct: Hook::Foreign(construct),
            destruct: match destruct {
                Some(hook) => Some(Hook::Foreign(hook)),
                None => None,
            },
        }
    }

    /// 附加配对的析构函数。
    pub const fn with_teardown(mut self, destruct: fn()) -> Self {
        self.destruct = Some(Hook::Native(destruct));
        self
    }

    /// 条目名称。
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// 是否登记了析构。
    pub const fn has_teardown(&self) -> bool {
        self.destruct.is_some()
    }

    /// 执行构造。
    pub fn construct(&self) {
        tracing::trace!(target: targets::INITIALIZER, initializer = self.name, "constructing");
        self.construct.invoke();
    }

    /// 执行析构；未登记析构时为空操作。
    pub fn destruct(&self) {
        if let Some(hook) = self.destruct {
            tracing::trace!(target: targets::INITIALIZER, initializer = self.name, "destructing");
            hook.invoke();
        }
    }
}

/// 有序的静态初始化表。
///
/// # 设计背景（Why）
/// - 对应托管运行时“通用静态构造链 / 静态析构链”两个聚合过程；
/// - 以 `&'static [StaticInitializer]` 承载，`const` 可构造，放在 `static` 中即为构建期数据。
///
/// # 契约说明（What）
/// - [`construct_all`](Self::construct_all)：按表序逐个构造；
/// - [`destruct_all`](Self::destruct_all)：按表的逆序逐个析构，跳过无析构条目；
/// - 两者都在调用线程上顺序执行，不做并发。
///
/// # 风险提示（Trade-offs）
/// - 表本身不记录“是否已构造”，恰好一次由 [`crate::LifecycleController`] 保证；
///   直接调用 `construct_all` 两次会构造两次。
#[derive(Clone, Copy, Debug)]
pub struct InitializerChain {
    entries: &'static [StaticInitializer],
}

impl InitializerChain {
    /// 以静态切片构造。
    pub const fn new(entries: &'static [StaticInitializer]) -> Self {
        Self { entries }
    }

    /// 空表。
    pub const fn empty() -> Self {
        Self { entries: &[] }
    }

    /// 条目数量。
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// 是否为空表。
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 按表序遍历条目。
    pub fn iter(&self) -> core::slice::Iter<'static, StaticInitializer> {
        self.entries.iter()
    }

    /// 校验名称非空且唯一。
    ///
    /// 表规模通常只有个位数到几十，使用 O(n²) 比较以保持 `no_std` 且无需分配。
    pub fn validate(&self) -> Result<(), RegistryError> {
        for (index, entry) in self.entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(RegistryError::EmptyName { index });
            }
            if let Some(offset) = self.entries[index + 1..]
                .iter()
                .position(|other| other.name == entry.name)
            {
                return Err(RegistryError::DuplicateName {
                    name: entry.name,
                    first: index,
                    second: index + 1 + offset,
                });
            }
        }
        Ok(())
    }

    /// 按表序执行全部构造。
    pub fn construct_all(&self) {
        for entry in self.entries {
            entry.construct();
        }
    }

    /// 按逆序执行全部析构。
    pub fn destruct_all(&self) {
        for entry in self.entries.iter().rev() {
            entry.destruct();
        }
    }
}

impl Default for InitializerChain {
    fn default() -> Self {
        Self::empty()
    }
}

impl<'a> IntoIterator for &'a InitializerChain {
    type Item = &'static StaticInitializer;
    type IntoIter = core::slice::Iter<'static, StaticInitializer>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
