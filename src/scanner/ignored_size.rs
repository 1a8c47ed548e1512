use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;

use anyhow::Result;
use futures::future::join_all;
use tokio::fs;

use crate::models::{IgnoredFile, RepositoryIgnoreStats};

/// 被忽略文件大小统计 - 计算每个仓库中被忽略内容占用的磁盘空间
pub struct IgnoredSizeCalculator {
    /// 不计入统计的目录名（例如 .git）
    exclude_dirs: Vec<String>,
}

impl IgnoredSizeCalculator {
    pub fn new() -> Self {
        Self {
            exclude_dirs: Vec::new(),
        }
    }

    /// 排除指定名称的被忽略目录
    pub fn excluding(exclude_dirs: &[&str]) -> Self {
        Self {
            exclude_dirs: exclude_dirs.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// 并发统计多个仓库
    pub async fn measure_all(
        &self,
        repositories: Vec<(PathBuf, Vec<IgnoredFile>)>,
    ) -> Result<Vec<RepositoryIgnoreStats>> {
        let tasks = repositories
            .iter()
            .map(|(root, files)| self.measure(root, files));

        join_all(tasks).await.into_iter().collect()
    }

    /// 统计单个仓库的被忽略条目
    pub async fn measure(&self, root: &Path, ignored: &[IgnoredFile]) -> Result<RepositoryIgnoreStats> {
        let mut stats = RepositoryIgnoreStats {
            root: root.to_path_buf(),
            ignored_entries: 0,
            ignored_file_count: 0,
            ignored_size: 0,
        };

        for entry in ignored {
            if self.is_excluded(&entry.path) {
                continue;
            }
            stats.ignored_entries += 1;

            let metadata = match fs::symlink_metadata(&entry.path).await {
                Ok(metadata) => metadata,
                Err(_) => continue, // 已被删除
            };

            if metadata.is_file() {
                stats.ignored_size += metadata.len();
                stats.ignored_file_count += 1;
            } else if metadata.is_dir() {
                let (dir_size, dir_file_count) = self.calculate_directory_size(&entry.path).await?;
                stats.ignored_size += dir_size;
                stats.ignored_file_count += dir_file_count;
            }
        }

        Ok(stats)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|n| n.to_str())
            .map(|name| self.exclude_dirs.iter().any(|d| d == name))
            .unwrap_or(false)
    }

    /// 递归计算目录大小
    fn calculate_directory_size<'a>(
        &'a self,
        dir_path: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<(u64, usize)>> + Send + 'a>> {
        Box::pin(async move {
            let mut total_size = 0u64;
            let mut file_count = 0usize;

            let mut entries = match fs::read_dir(dir_path).await {
                Ok(entries) => entries,
                Err(_) => return Ok((0, 0)), // 无法访问的目录
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(_) => continue,
                };
                let path = entry.path();

                match entry.metadata().await {
                    Ok(metadata) => {
                        if metadata.is_file() {
                            total_size += metadata.len();
                            file_count += 1;
                        } else if metadata.is_dir() {
                            let (sub_size, sub_count) = self.calculate_directory_size(&path).await?;
                            total_size += sub_size;
                            file_count += sub_count;
                        }
                    }
                    Err(_) => continue,
                }
            }

            Ok((total_size, file_count))
        })
    }
}

impl Default for IgnoredSizeCalculator {
    fn default() -> Self {
        Self::new()
    }
}
