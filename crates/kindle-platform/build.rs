use std::env;

use kindle_core::TargetClass;

/// 构建脚本入口：判定目标是否具备 `dlfcn` 动态加载器，并输出 `kindle_has_dlopen`。
///
/// # 教案式说明（Why）
/// - 动态库能力是“有或无”的构建期事实，不应在每次调用时做运行期判断；
/// - 目标档位以 `kindle-core` 发布的 `DEP_KINDLE_CORE_CLASS` 为准：`bare-metal` Feature 可能由依赖图中
///   任意包直接打开在 `kindle-core` 上，只检查本包 Feature 会与 `NativeProfile` 不一致。
///
/// # 判定规则（How）
/// 1. 启用 `std` Feature；
/// 2. `kindle-core` 发布的档位为宿主目标（元数据缺失时退回 [`TargetClass::classify_triple`]）；
/// 3. 目标族包含 `unix`（`dlopen`/`dlsym`/`dlclose` 由 libc 提供）。
///
/// 三条同时满足时输出 `cargo::rustc-cfg=kindle_has_dlopen`。
fn main() {
    println!("cargo::rustc-check-cfg=cfg(kindle_has_dlopen)");
    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-env-changed=DEP_KINDLE_CORE_CLASS");

    let target = env::var("TARGET").unwrap_or_default();
    let family = env::var("CARGO_CFG_TARGET_FAMILY").unwrap_or_default();
    let with_std = env::var_os("CARGO_FEATURE_STD").is_some();

    let class = env::var("DEP_KINDLE_CORE_CLASS")
        .ok()
        .and_then(|label| {
            [TargetClass::Hosted, TargetClass::BareMetal]
                .into_iter()
                .find(|class| class.as_str() == label.trim())
        })
        .unwrap_or_else(|| TargetClass::classify_triple(&target));
    let unix_family = family.split(',').any(|entry| entry == "unix");

    if with_std && class.may_have_loader() && unix_family {
        println!("cargo::rustc-cfg=kindle_has_dlopen");
    }
}
