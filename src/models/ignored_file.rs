use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 被忽略的文件或目录
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IgnoredFile {
    /// 绝对路径
    pub path: PathBuf,

    /// 是否是目录（目录被忽略时其下所有内容都视为被忽略）
    pub is_directory: bool,
}

impl IgnoredFile {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: false,
        }
    }

    pub fn directory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            is_directory: true,
        }
    }

    /// 根据磁盘上的实际类型构建描述
    pub fn from_path(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            is_directory: path.is_dir(),
        }
    }
}
