//! 文件元数据查询。
//!
//! - [`file_status`] 跟随符号链接，[`link_status`] 描述链接本身；
//! - 失败统一包装为 [`PlatformError::Io`]，携带操作名与路径。

use std::{fs, path::Path, time::SystemTime};

use crate::error::PlatformError;

/// 文件类别。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    File,
    Directory,
    Symlink,
    /// 设备、管道、套接字等。
    Other,
}

impl From<fs::FileType> for FileKind {
    fn from(file_type: fs::FileType) -> Self {
        if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        }
    }
}

/// 文件状态快照。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileStatus {
    pub kind: FileKind,
    /// 字节长度。
    pub len: u64,
    pub readonly: bool,
    /// 最后修改时间；文件系统不记录时为 `None`。
    pub modified: Option<SystemTime>,
}

impl From<fs::Metadata> for FileStatus {
    fn from(metadata: fs::Metadata) -> Self {
        Self {
            kind: metadata.file_type().into(),
            len: metadata.len(),
            readonly: metadata.permissions().readonly(),
            modified: metadata.modified().ok(),
        }
    }
}

/// 查询文件状态，跟随符号链接。
pub fn file_status(path: impl AsRef<Path>) -> Result<FileStatus, PlatformError> {
    let path = path.as_ref();
    fs::metadata(path)
        .map(FileStatus::from)
        .map_err(|source| PlatformError::Io {
            operation: "stat",
            path: path.to_path_buf(),
            source,
        })
}

/// 查询符号链接自身的状态。
pub fn link_status(path: impl AsRef<Path>) -> Result<FileStatus, PlatformError> {
    let path = path.as_ref();
    fs::symlink_metadata(path)
        .map(FileStatus::from)
        .map_err(|source| PlatformError::Io {
            operation: "lstat",
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_reports_operation_and_path() {
        let error = file_status("/definitely/not/here/kindle").expect_err("path must be missing");
        match &error {
            PlatformError::Io {
                operation, source, ..
            } => {
                assert_eq!(*operation, "stat");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(error.to_string().contains("/definitely/not/here/kindle"));
    }

    #[test]
    fn regular_file_status() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("payload.bin");
        fs::write(&path, [0u8; 42]).expect("write payload");

        let status = file_status(&path).expect("stat payload");
        assert_eq!(status.kind, FileKind::File);
        assert_eq!(status.len, 42);
        assert!(!status.readonly);
        assert!(status.modified.is_some());
    }
}
