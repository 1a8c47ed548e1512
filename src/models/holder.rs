use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// 文件持有者的分类标签
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HolderType {
    /// 被版本控制系统忽略的文件
    Ignored,
}

/// 一次变更检测中被标记为"脏"的路径集合
#[derive(Debug, Clone, Default)]
pub struct DirtyScope {
    /// 需要重新检查的文件
    dirty_files: HashSet<PathBuf>,

    /// 需要递归重新检查的目录
    dirty_dirs: HashSet<PathBuf>,
}

impl DirtyScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// 标记单个文件
    pub fn add_dirty_file(&mut self, path: impl Into<PathBuf>) {
        self.dirty_files.insert(path.into());
    }

    /// 标记整个目录（递归）
    pub fn add_dirty_dir(&mut self, path: impl Into<PathBuf>) {
        self.dirty_dirs.insert(path.into());
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_files.is_empty() && self.dirty_dirs.is_empty()
    }
}
