use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

use crate::holder::VcsRepository;

/// 工作区中发现的一个 Git 仓库
///
/// 仓库的身份只由根目录决定，名称仅用于显示。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitRepository {
    /// 仓库名称（根目录名）
    pub name: String,

    /// 仓库根目录（工作区目录，而不是 .git 目录）
    pub root: PathBuf,
}

impl GitRepository {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Unknown")
            .to_string();

        Self { name, root }
    }
}

impl PartialEq for GitRepository {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
    }
}

impl Eq for GitRepository {}

impl Hash for GitRepository {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
    }
}

impl VcsRepository for GitRepository {
    fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_root() {
        let a = GitRepository::new("/work/app");
        let mut b = GitRepository::new("/work/app");
        b.name = "renamed".to_string();

        assert_eq!(a.name, "app");
        assert_eq!(a, b);
        assert_ne!(a, GitRepository::new("/work/lib"));
    }
}
