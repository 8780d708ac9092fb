use std::env;

/// 构建脚本入口：把本次构建选定的目标档位发布给直接依赖方。
///
/// # 教案式说明（Why）
/// - `NativeProfile` 由 `bare-metal` Feature 与目标 `cfg` 共同决定，
///   Feature 可能被依赖图中任意一个包打开，下游构建脚本只看自身 Feature 会得出不同结论；
/// - 通过 `links` 元数据把最终判定交给下游，平台层读取 `DEP_KINDLE_CORE_CLASS` 即可与本 crate 保持一致。
///
/// # 判定规则（How）
/// 与 `target.rs` 中 `NativeProfile` 的 `cfg` 条件逐项对应：
/// `target_os = "none"`、`target_arch = "xtensa"` 或启用 `bare-metal` Feature 时输出 `bare-metal`，否则输出 `hosted`。
fn main() {
    println!("cargo::rerun-if-changed=build.rs");

    let os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    let forced_bare_metal = env::var_os("CARGO_FEATURE_BARE_METAL").is_some();

    let class = if forced_bare_metal || os == "none" || arch == "xtensa" {
        "bare-metal"
    } else {
        "hosted"
    };
    println!("cargo::metadata=class={class}");
}
