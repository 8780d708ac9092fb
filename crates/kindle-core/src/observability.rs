//! 日志目标与字段约定。
//!
//! # 设计定位（Why）
//! - 引导层跨越三个 crate，统一的 `tracing` target 让宿主可以用一条过滤规则（如 `kindle=debug`）观察完整引导过程；
//! - 目标名集中定义，避免散落的字符串字面量在重构时漂移。
//!
//! # 级别约定（What）
//! - `info`：激活 / 停用完成；
//! - `debug`：每个引导阶段开始；
//! - `trace`：单个初始化器调用、被吸收的重复调用；
//! - `warn`：裸机竞争被放弃、未安装引导镜像；
//! - `error`：控制器被协作者 panic 毒化。

pub mod targets {
    /// 生命周期控制器。
    pub const LIFECYCLE: &str = "kindle::lifecycle";
    /// 静态初始化表。
    pub const INITIALIZER: &str = "kindle::initializer";
    /// 平台能力面。
    pub const PLATFORM: &str = "kindle::platform";
    /// 进程级运行时与 C ABI 出口。
    pub const RUNTIME: &str = "kindle::rt";
}

/// 引导阶段名称，作为 `phase` 字段输出。
pub mod phases {
    pub const THREAD_BOOTSTRAP: &str = "thread_bootstrap";
    pub const RUNTIME_BOOTSTRAP: &str = "runtime_bootstrap";
    pub const CONSTRUCT_STATICS: &str = "construct_statics";
    pub const SHUTDOWN_RUNTIME: &str = "shutdown_runtime";
    pub const DESTRUCT_STATICS: &str = "destruct_statics";
}
