use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;

use crate::config::Config;
use crate::holder::{FileHolder, TrackerHandle, VcsIgnoredFilesHolder};
use crate::models::{GitRepository, RescanSummary};
use crate::scanner::{GitIgnoreTracker, RepositoryDiscovery, WorkspaceRepositories};

/// 以 Git 仓库为键的忽略文件聚合器
pub type WorkspaceHolder = VcsIgnoredFilesHolder<GitRepository>;

/// 一个工作区：发现的仓库集合加上为它们构建的聚合器
///
/// 仓库集合在打开时确定，之后工作区里新增或删除仓库需要重新打开。
pub struct IgnoredWorkspace {
    repositories: Arc<WorkspaceRepositories>,
    holder: Arc<WorkspaceHolder>,
}

impl IgnoredWorkspace {
    /// 在给定目录中发现仓库，并为每个仓库创建 Git 忽略追踪器
    pub fn open(config: &Config, paths: &[PathBuf]) -> Result<Self> {
        let discovery = RepositoryDiscovery::new(config.discovery.clone());
        let repositories = Arc::new(discovery.discover(paths)?);
        tracing::info!("发现 {} 个仓库", repositories.len());

        Self::from_repositories(config, repositories)
    }

    /// 使用已知的仓库集合构建
    pub fn from_repositories(config: &Config, repositories: Arc<WorkspaceRepositories>) -> Result<Self> {
        let settings = config.tracker.clone();
        let holder = VcsIgnoredFilesHolder::<GitRepository>::new(
            repositories.clone(),
            repositories.clone(),
            |repository: &GitRepository| -> Result<TrackerHandle> {
                Ok(Arc::new(GitIgnoreTracker::new(&repository.root, settings.clone())?))
            },
        )?;

        Ok(Self {
            repositories,
            holder: Arc::new(holder),
        })
    }

    pub fn holder(&self) -> &Arc<WorkspaceHolder> {
        &self.holder
    }

    pub fn repositories(&self) -> &WorkspaceRepositories {
        &self.repositories
    }

    /// 重新扫描所有仓库，阻塞直到完成
    pub fn rescan(&self) -> Result<RescanSummary> {
        rescan_holder(&self.holder)
    }

    /// 在阻塞线程池中重新扫描，不占用异步运行时的工作线程
    pub async fn rescan_blocking(&self) -> Result<RescanSummary> {
        let holder = self.holder.clone();
        tokio::task::spawn_blocking(move || rescan_holder(&holder)).await?
    }

    /// 文件是否被忽略，以及它属于哪个仓库
    pub fn check_file(&self, file: &Path) -> (bool, Option<GitRepository>) {
        (
            self.holder.contains_file(file),
            self.holder.repository_for_file(file),
        )
    }
}

fn rescan_holder(holder: &WorkspaceHolder) -> Result<RescanSummary> {
    let started_at = Utc::now();
    let started = Instant::now();

    holder.start_rescan()?;

    Ok(RescanSummary {
        started_at,
        duration: started.elapsed(),
        repositories: holder.repositories().len(),
        ignored_entries: holder.values().len(),
    })
}
