//! 目录枚举。
//!
//! # 契约说明（What）
//! - [`read_directory`] 返回惰性迭代器，每一项为 `Result<DirectoryEntry, PlatformError>`；
//! - 不包含 `.` 与 `..`，顺序由文件系统决定，调用方需要稳定顺序时自行排序；
//! - 单个条目读取失败不会终止迭代。

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
};

use crate::{error::PlatformError, fs::FileKind};

/// 目录中的一个条目。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// 条目名称（不含父路径）。
    pub name: OsString,
    /// 完整路径。
    pub path: PathBuf,
    /// 条目自身的类别，不跟随符号链接。
    pub kind: FileKind,
}

/// [`read_directory`] 返回的迭代器。
#[derive(Debug)]
pub struct ReadDirectory {
    root: PathBuf,
    inner: fs::ReadDir,
}

impl ReadDirectory {
    /// 被枚举的目录。
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for ReadDirectory {
    type Item = Result<DirectoryEntry, PlatformError>;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.inner.next()?;
        let item = entry
            .and_then(|entry| {
                let kind = entry.file_type()?.into();
                Ok(DirectoryEntry {
                    name: entry.file_name(),
                    path: entry.path(),
                    kind,
                })
            })
            .map_err(|source| PlatformError::Io {
                operation: "readdir",
                path: self.root.clone(),
                source,
            });
        Some(item)
    }
}

/// 打开目录并返回条目迭代器。
pub fn read_directory(path: impl AsRef<Path>) -> Result<ReadDirectory, PlatformError> {
    let root = path.as_ref().to_path_buf();
    match fs::read_dir(&root) {
        Ok(inner) => Ok(ReadDirectory { root, inner }),
        Err(source) => Err(PlatformError::Io {
            operation: "opendir",
            path: root,
            source,
        }),
    }
}
