//! 宿主侧运行时配置。
//!
//! # 模块定位（Why）
//! - 引导层本身没有运行期开关（档位与能力都在构建期确定），需要配置的只有日志输出；
//! - 配置来源按优先级从低到高：内置默认值、TOML 文件、环境变量。
//!
//! # 契约说明（What）
//! - TOML 字段与 [`RuntimeOptions`] 一一对应，缺省字段取默认值，未知字段报错；
//! - 环境变量：`KINDLE_LOG` 覆盖 `log_filter`，`KINDLE_LOG_ANSI` 覆盖 `ansi`
//!   （接受 `1/0`、`true/false`、`yes/no`、`on/off`，大小写不敏感）。

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 覆盖日志过滤规则的环境变量。
pub const ENV_LOG_FILTER: &str = "KINDLE_LOG";
/// 覆盖 ANSI 着色开关的环境变量。
pub const ENV_LOG_ANSI: &str = "KINDLE_LOG_ANSI";

/// 配置加载失败。
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// 配置文件读取失败。
    #[error("failed to read runtime configuration `{}`: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// TOML 解析失败。
    #[error("invalid runtime configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// 环境变量取值非法。
    #[error("environment variable `{key}` has invalid value `{value}`")]
    InvalidEnv { key: &'static str, value: String },
}

/// 运行时日志输出配置。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuntimeOptions {
    /// `EnvFilter` 语法的过滤规则，例如 `"info,kindle=debug"`。
    pub log_filter: String,
    /// 是否输出 ANSI 颜色。
    pub ansi: bool,
    /// 是否在每行输出事件的 target。
    pub with_target: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            log_filter: String::from("info"),
            ansi: true,
            with_target: true,
        }
    }
}

impl RuntimeOptions {
    /// 从 TOML 文本解析。
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// 从 TOML 文件加载。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// 以进程环境变量覆盖当前配置。
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// 以任意键值来源覆盖当前配置；`lookup` 对未设置的键返回 `None`。
    pub fn with_overrides_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        if let Some(value) = lookup(ENV_LOG_ANSI) {
            self.ansi = parse_switch(&value).ok_or(ConfigError::InvalidEnv {
                key: ENV_LOG_ANSI,
                value,
            })?;
        }
        Ok(self)
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let options = RuntimeOptions::from_toml_str("").expect("empty toml");
        assert_eq!(options, RuntimeOptions::default());
        assert_eq!(options.log_filter, "info");
    }

    #[test]
    fn partial_document_keeps_remaining_defaults() {
        let options =
            RuntimeOptions::from_toml_str("log_filter = \"kindle=trace\"\nansi = false\n")
                .expect("valid toml");
        assert_eq!(options.log_filter, "kindle=trace");
        assert!(!options.ansi);
        assert!(options.with_target);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(matches!(
            RuntimeOptions::from_toml_str("verbosity = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn overrides_take_precedence() {
        let options = RuntimeOptions::default()
            .with_overrides_from(|key| match key {
                ENV_LOG_FILTER => Some("debug".to_owned()),
                ENV_LOG_ANSI => Some("Off".to_owned()),
                _ => None,
            })
            .expect("valid overrides");
        assert_eq!(options.log_filter, "debug");
        assert!(!options.ansi);
    }

    #[test]
    fn invalid_switch_value_is_reported() {
        let error = RuntimeOptions::default()
            .with_overrides_from(|key| (key == ENV_LOG_ANSI).then(|| "sometimes".to_owned()))
            .expect_err("invalid switch");
        assert!(matches!(
            error,
            ConfigError::InvalidEnv { key: ENV_LOG_ANSI, ref value } if value == "sometimes"
        ));
    }

    #[test]
    fn load_reads_file_and_reports_missing_paths() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("kindle.toml");
        fs::write(&path, "with_target = false\n").expect("write config");

        let options = RuntimeOptions::load(&path).expect("load config");
        assert!(!options.with_target);

        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            RuntimeOptions::load(&missing),
            Err(ConfigError::Read { path, .. }) if path == missing
        ));
    }
}
