//! 动态库加载与符号解析（`dlfcn`）。
//!
//! # 模块定位（Why）
//! - 托管运行时的本地互操作需要按名称解析外部符号；
//! - 只有构建脚本确认存在 `dlfcn` 加载器时本模块才会编译，不提供任何模拟实现，
//!   调用方以 `#[cfg(kindle_has_dlopen)]` 或 [`crate::HAS_DYNAMIC_LOADING`] 在编译期分支。
//!
//! # 契约说明（What）
//! - [`DynamicLibrary::open`] 以 `RTLD_NOW | RTLD_LOCAL` 打开，解析失败在打开时暴露；
//! - [`DynamicLibrary::symbol`] 返回非空裸指针，调用方负责按正确签名转换；
//! - 句柄在 `Drop` 时 `dlclose`，由其解析出的指针在此之后失效。
//!
//! # 风险提示（Trade-offs）
//! - `dlerror` 的文本是线程局部的，本模块在每次调用前清空它，但与同线程其他直接调用 `dlfcn` 的代码交错时
//!   错误文本可能错位。

#![allow(unsafe_code)]

use std::{
    ffi::{CStr, CString, c_void},
    os::unix::ffi::OsStrExt,
    path::Path,
    ptr::{self, NonNull},
    string::{String, ToString},
};

use kindle_core::observability::targets;

use crate::error::PlatformError;

/// 已打开的动态库句柄。
#[derive(Debug)]
pub struct DynamicLibrary {
    handle: NonNull<c_void>,
    origin: String,
}

// SAFETY: `dlopen` 句柄是进程级对象，`dlsym` / `dlclose` 可在任意线程调用。
unsafe impl Send for DynamicLibrary {}
// SAFETY: 同上，句柄本身不含线程局部状态。
unsafe impl Sync for DynamicLibrary {}

impl DynamicLibrary {
    /// 打开指定路径的动态库。
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PlatformError> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        let c_path = CString::new(path.as_os_str().as_bytes())
            .map_err(|_| PlatformError::InvalidName {
                name: origin.clone(),
            })?;
        Self::open_raw(Some(&c_path), origin)
    }

    /// 打开当前进程的全局符号命名空间。
    pub fn open_self() -> Result<Self, PlatformError> {
        Self::open_raw(None, String::from("<self>"))
    }

    fn open_raw(path: Option<&CStr>, origin: String) -> Result<Self, PlatformError> {
        let raw_path = path.map_or(ptr::null(), CStr::as_ptr);
        clear_error();
        // SAFETY: `raw_path` 为空指针或指向以 NUL 结尾、在本调用期间有效的字符串。
        let handle = unsafe { libc::dlopen(raw_path, libc::RTLD_NOW | libc::RTLD_LOCAL) };
        match NonNull::new(handle) {
            Some(handle) => {
                tracing::debug!(target: targets::PLATFORM, library = %origin, "dynamic library opened");
                Ok(Self { handle, origin })
            }
            None => Err(PlatformError::Load {
                origin,
                detail: last_error(),
            }),
        }
    }

    /// 库的来源描述（路径或 `<self>`）。
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// 按名称解析符号。
    pub fn symbol(&self, name: &str) -> Result<NonNull<c_void>, PlatformError> {
        let c_name = CString::new(name).map_err(|_| PlatformError::InvalidName {
            name: name.to_string(),
        })?;
        clear_error();
        // SAFETY: 句柄来自成功的 `dlopen` 且尚未关闭；`c_name` 以 NUL 结尾。
        let address = unsafe { libc::dlsym(self.handle.as_ptr(), c_name.as_ptr()) };
        NonNull::new(address).ok_or_else(|| PlatformError::SymbolNotFound {
            name: name.to_string(),
            detail: last_error(),
        })
    }
}

impl Drop for DynamicLibrary {
    fn drop(&mut self) {
        // SAFETY: 句柄来自成功的 `dlopen`，且 `Drop` 只执行一次。
        let status = unsafe { libc::dlclose(self.handle.as_ptr()) };
        if status != 0 {
            tracing::warn!(
                target: targets::PLATFORM,
                library = %self.origin,
                detail = %last_error(),
                "dlclose failed"
            );
        }
    }
}

fn clear_error() {
    // SAFETY: `dlerror` 只读写线程局部的错误槽。
    unsafe {
        libc::dlerror();
    }
}

fn last_error() -> String {
    // SAFETY: `dlerror` 返回空指针或指向线程局部、以 NUL 结尾的字符串。
    let message = unsafe { libc::dlerror() };
    if message.is_null() {
        return String::from("unknown dynamic loader error");
    }
    // SAFETY: 非空时指向有效的 C 字符串，在下一次 `dlfcn` 调用前保持有效。
    unsafe { CStr::from_ptr(message) }
        .to_string_lossy()
        .into_owned()
}
