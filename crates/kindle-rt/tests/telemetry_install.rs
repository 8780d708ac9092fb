#![cfg(feature = "std")]
//! 日志订阅者装配：非法过滤规则不生效，成功安装后拒绝第二次安装。

use kindle_rt::config::RuntimeOptions;
use kindle_rt::telemetry::{TelemetryError, install};

#[test]
fn subscriber_is_installed_once() {
    let invalid = RuntimeOptions {
        log_filter: String::from("kindle=loudest"),
        ..RuntimeOptions::default()
    };
    assert!(matches!(
        install(&invalid),
        Err(TelemetryError::InvalidFilter { .. })
    ));

    let options = RuntimeOptions::from_toml_str("log_filter = \"kindle=debug\"\nansi = false\n")
        .expect("valid options");
    install(&options).expect("first installation succeeds");
    assert!(matches!(
        install(&options),
        Err(TelemetryError::SubscriberAlreadySet)
    ));

    assert_eq!(kindle_rt::startup(), kindle_core::LifecycleOutcome::Started);
    assert_eq!(kindle_rt::shutdown(), kindle_core::LifecycleOutcome::Stopped);
}
