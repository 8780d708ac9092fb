#![cfg(feature = "std")]
//! C ABI 出口：以 C 宿主的方式安装引导表并驱动生命周期。
//!
//! # 教案式说明
//! - **测试目标（Why）**：编译器生成的宿主只看得到 `kindle_runtime_*` 符号与 `KindleBootImage` 布局；
//! - **测试设计（How）**：全部调用经由 `extern "C"` 出口完成，协作者为 `extern "C"` 函数；
//! - **验收契约（What）**：返回码与状态编码符合约定；宿主档位不调用两段引导钩子，裸机档位按“线程 → 运行时”顺序调用。
//!
//! 裸机分支需在宿主机上强制裸机档位运行：`cargo test -p kindle-rt --features bare-metal --test ffi_exports`。

use std::sync::Mutex;

use kindle_core::NATIVE_TARGET;
use kindle_rt::ffi::{
    KINDLE_INSTALL_ALREADY_INSTALLED, KINDLE_INSTALL_INVALID, KINDLE_INSTALL_OK, KindleBootImage,
    kindle_runtime_install_image, kindle_runtime_shutdown, kindle_runtime_startup,
    kindle_runtime_state,
};

static JOURNAL: Mutex<Vec<&'static str>> = Mutex::new(Vec::new());

fn record(event: &'static str) {
    JOURNAL.lock().expect("journal lock").push(event);
}

extern "C" fn thread_bootstrap() {
    record("thread_bootstrap");
}

extern "C" fn runtime_bootstrap() {
    record("runtime_bootstrap");
}

extern "C" fn static_ctor() {
    record("static_ctor");
}

extern "C" fn static_dtor() {
    record("static_dtor");
}

extern "C" fn shutdown_runtime() {
    record("shutdown_runtime");
}

#[test]
fn c_host_drives_lifecycle_through_exports() {
    assert_eq!(kindle_runtime_install_image(None), KINDLE_INSTALL_INVALID);
    let incomplete = KindleBootImage {
        destruct_statics: Some(static_dtor),
        ..KindleBootImage::default()
    };
    assert_eq!(
        kindle_runtime_install_image(Some(&incomplete)),
        KINDLE_INSTALL_INVALID
    );

    let table = KindleBootImage {
        thread_bootstrap: Some(thread_bootstrap),
        runtime_bootstrap: Some(runtime_bootstrap),
        construct_statics: Some(static_ctor),
        destruct_statics: Some(static_dtor),
        shutdown_runtime: Some(shutdown_runtime),
    };
    assert_eq!(kindle_runtime_install_image(Some(&table)), KINDLE_INSTALL_OK);
    assert_eq!(
        kindle_runtime_install_image(Some(&table)),
        KINDLE_INSTALL_ALREADY_INSTALLED
    );

    assert_eq!(kindle_runtime_state(), 0);
    kindle_runtime_startup();
    kindle_runtime_startup();
    assert_eq!(kindle_runtime_state(), 2);
    kindle_runtime_shutdown();
    kindle_runtime_shutdown();
    assert_eq!(kindle_runtime_state(), 0);

    let mut expected = Vec::new();
    if NATIVE_TARGET.requires_explicit_bootstrap() {
        expected.extend(["thread_bootstrap", "runtime_bootstrap"]);
    }
    expected.extend(["static_ctor", "shutdown_runtime", "static_dtor"]);
    assert_eq!(*JOURNAL.lock().expect("journal lock"), expected);
}
