use std::path::{Path, PathBuf};

use anyhow::Result;
use git2::Repository;
use walkdir::{DirEntry, WalkDir};

use crate::config::DiscoveryConfig;
use crate::holder::{RepositoryManager, RootResolver, VcsRepository};
use crate::models::GitRepository;
use crate::utils::normalize_path;

/// 仓库发现器 - 遍历工作区目录，找出其中所有的 Git 仓库
pub struct RepositoryDiscovery {
    config: DiscoveryConfig,
}

impl RepositoryDiscovery {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    /// 扫描指定路径，返回发现的仓库集合
    ///
    /// 不存在或不是目录的路径会被跳过并记录警告。
    pub fn discover(&self, paths: &[PathBuf]) -> Result<WorkspaceRepositories> {
        let mut repositories = Vec::new();

        for path in paths {
            if !path.exists() {
                tracing::warn!("路径不存在: {}", path.display());
                continue;
            }
            if !path.is_dir() {
                tracing::warn!("不是目录: {}", path.display());
                continue;
            }

            self.scan_directory(&path.canonicalize()?, &mut repositories);
        }

        Ok(WorkspaceRepositories::new(repositories))
    }

    /// 扫描单个目录
    fn scan_directory(&self, root_path: &Path, repositories: &mut Vec<GitRepository>) {
        let mut walker = WalkDir::new(root_path).follow_links(self.config.follow_symlinks);

        if let Some(max_depth) = self.config.max_depth {
            walker = walker.max_depth(max_depth);
        }

        let entries = walker
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.should_skip_directory(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::warn!("遍历目录时出错: {}", err);
                    continue;
                }
            };

            if entry.file_type().is_dir() && Self::is_repository_root(entry.path()) {
                tracing::debug!("发现仓库: {}", entry.path().display());
                repositories.push(GitRepository::new(entry.path()));
            }
        }
    }

    /// 目录下有 .git 且能以非裸仓库打开
    fn is_repository_root(path: &Path) -> bool {
        if !path.join(".git").exists() {
            return false;
        }

        Repository::open(path)
            .map(|repo| !repo.is_bare())
            .unwrap_or(false)
    }

    /// 检查是否应该跳过指定目录
    fn should_skip_directory(&self, entry: &DirEntry) -> bool {
        if !entry.file_type().is_dir() {
            return false;
        }

        let file_name = match entry.file_name().to_str() {
            Some(name) => name,
            None => return false,
        };

        // .git 目录内部不会有工作区
        if file_name == ".git" {
            return true;
        }

        if self.config.skip_directories.contains(file_name) {
            return true;
        }

        !self.config.scan_hidden && file_name.starts_with('.')
    }
}

/// 工作区中的仓库集合，同时负责把文件解析到所属仓库的根目录
#[derive(Debug, Clone, Default)]
pub struct WorkspaceRepositories {
    repositories: Vec<GitRepository>,
}

impl WorkspaceRepositories {
    pub fn new(mut repositories: Vec<GitRepository>) -> Self {
        repositories.sort_by(|a, b| a.root.cmp(&b.root));
        repositories.dedup();
        Self { repositories }
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GitRepository> {
        self.repositories.iter()
    }
}

impl RootResolver for WorkspaceRepositories {
    /// 选择包含该文件的最深的仓库根目录，嵌套仓库优先
    fn resolve_root(&self, file: &Path) -> Option<PathBuf> {
        let file = normalize_path(file);
        self.repositories
            .iter()
            .map(|repository| repository.root())
            .filter(|root| file.starts_with(root))
            .max_by_key(|root| root.components().count())
            .map(Path::to_path_buf)
    }
}

impl RepositoryManager<GitRepository> for WorkspaceRepositories {
    fn repositories(&self) -> Vec<GitRepository> {
        self.repositories.clone()
    }

    fn repository_for_root(&self, root: &Path) -> Option<GitRepository> {
        self.repositories.iter().find(|r| r.root == root).cloned()
    }
}
