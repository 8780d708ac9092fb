//! 初始化表登记错误。
//!
//! 生命周期控制器本身不产生错误：重复调用被静默吸收，协作者失败按 panic 传播。
//! 这里只描述“表结构不合法”这一类可在装配期捕获的问题。

use core::fmt;

/// 初始化表校验失败的原因。
///
/// # 契约说明（What）
/// - `EmptyName`：第 `index` 个条目名称为空或仅包含空白，日志与诊断将无法定位该条目；
/// - `DuplicateName`：同名条目出现两次，`first`/`second` 为两次出现的下标。
///
/// # 风险提示（Trade-offs）
/// - 校验只检查名称，不会尝试调用构造函数；构造期失败仍由协作者自行处理。
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// 条目名称为空。
    EmptyName { index: usize },
    /// 条目名称重复。
    DuplicateName {
        name: &'static str,
        first: usize,
        second: usize,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::EmptyName { index } => {
                write!(f, "static initializer #{index} has an empty name")
            }
            RegistryError::DuplicateName {
                name,
                first,
                second,
            } => write!(
                f,
                "static initializer `{name}` registered twice (#{first} and #{second})"
            ),
        }
    }
}

impl core::error::Error for RegistryError {}
