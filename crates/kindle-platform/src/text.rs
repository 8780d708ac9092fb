//! 宽字符文本转换。
//!
//! # 设计背景（Why）
//! - 宿主接口中的宽字符串与平台 `wchar_t` 同宽：Windows 为 UTF-16，其余平台为 UTF-32；
//! - [`WideChar`] 在构建期选定宽度，转换函数不做运行期分支。
//!
//! # 契约说明（What）
//! - [`to_wide`] 输出以 NUL 结尾的序列；
//! - [`from_wide`] 在首个 NUL 处停止，遇到非法码元（孤立代理项、超出 Unicode 范围的值）返回
//!   [`PlatformError::InvalidWideText`]，`index` 为该码元在输入中的下标；
//! - [`from_wide_lossy`] 以 `U+FFFD` 替换非法码元。

use alloc::{string::String, vec::Vec};

use crate::error::PlatformError;

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        /// 与平台 `wchar_t` 同宽的码元（UTF-16）。
        pub type WideChar = u16;
    } else {
        /// 与平台 `wchar_t` 同宽的码元（UTF-32）。
        pub type WideChar = u32;
    }
}

/// 把 UTF-8 文本编码为以 NUL 结尾的宽字符序列。
pub fn to_wide(text: &str) -> Vec<WideChar> {
    let mut wide: Vec<WideChar> = encode(text).collect();
    wide.push(0);
    wide
}

/// 解码宽字符序列，遇到非法码元时报错。
pub fn from_wide(units: &[WideChar]) -> Result<String, PlatformError> {
    let mut text = String::with_capacity(terminated(units).len());
    for decoded in decode(terminated(units)) {
        match decoded {
            Ok(ch) => text.push(ch),
            Err(index) => return Err(PlatformError::InvalidWideText { index }),
        }
    }
    Ok(text)
}

/// 解码宽字符序列，非法码元替换为 `U+FFFD`。
pub fn from_wide_lossy(units: &[WideChar]) -> String {
    decode(terminated(units))
        .map(|decoded| decoded.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

fn terminated(units: &[WideChar]) -> &[WideChar] {
    let end = units.iter().position(|unit| *unit == 0).unwrap_or(units.len());
    &units[..end]
}

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        fn encode(text: &str) -> impl Iterator<Item = WideChar> + '_ {
            text.encode_utf16()
        }

        /// 逐字符解码；错误项携带非法码元的下标。
        fn decode(units: &[WideChar]) -> impl Iterator<Item = Result<char, usize>> + '_ {
            let mut offset = 0;
            char::decode_utf16(units.iter().copied()).map(move |decoded| match decoded {
                Ok(ch) => {
                    offset += ch.len_utf16();
                    Ok(ch)
                }
                Err(_) => {
                    let index = offset;
                    offset += 1;
                    Err(index)
                }
            })
        }
    } else {
        fn encode(text: &str) -> impl Iterator<Item = WideChar> + '_ {
            text.chars().map(WideChar::from)
        }

        /// 逐字符解码；错误项携带非法码元的下标。
        fn decode(units: &[WideChar]) -> impl Iterator<Item = Result<char, usize>> + '_ {
            units
                .iter()
                .enumerate()
                .map(|(index, unit)| char::from_u32(*unit).ok_or(index))
        }
    }
}
