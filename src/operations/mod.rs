pub mod progress;
pub mod report;
pub mod workspace;

pub use progress::ProgressListener;
pub use report::{CheckResult, RepositoryReport, ScanReport};
pub use workspace::{IgnoredWorkspace, WorkspaceHolder};

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::{Config, OutputFormat};
use crate::holder::IgnoredUpdateListener;
use crate::models::{RepositoryIgnoreStats, RescanSummary};
use crate::scanner::{IgnoredSizeCalculator, RepositoryDiscovery};
use crate::utils::normalize_path;

/// 列出工作区中的仓库
pub fn list_repositories(config: &Config, paths: &[PathBuf], format: OutputFormat) -> Result<()> {
    let repositories = RepositoryDiscovery::new(config.discovery.clone()).discover(paths)?;
    let repositories: Vec<_> = repositories.iter().cloned().collect();
    report::print_repositories(&repositories, format)
}

/// 重新扫描并输出所有被忽略的文件
pub async fn scan(config: &Config, paths: &[PathBuf], format: OutputFormat) -> Result<()> {
    let workspace = IgnoredWorkspace::open(config, paths)?;
    let summary = rescan_with_progress(&workspace).await?;
    let report = build_scan_report(&workspace, summary);
    report::print_scan(&report, format, &config.output.time_format)
}

/// 重新扫描后检查每个文件是否被忽略
pub async fn check(
    config: &Config,
    files: &[PathBuf],
    workspace_paths: &[PathBuf],
    format: OutputFormat,
) -> Result<()> {
    let workspace = IgnoredWorkspace::open(config, workspace_paths)?;
    rescan_with_progress(&workspace).await?;
    let results = check_files(&workspace, files);
    report::print_check(&results, format)
}

/// 统计每个仓库被忽略内容的数量和大小
pub async fn stats(config: &Config, paths: &[PathBuf], format: OutputFormat) -> Result<()> {
    let workspace = IgnoredWorkspace::open(config, paths)?;
    rescan_with_progress(&workspace).await?;
    let stats = collect_stats(&workspace).await?;
    report::print_stats(&stats, format)
}

pub fn build_scan_report(workspace: &IgnoredWorkspace, summary: RescanSummary) -> ScanReport {
    let holder = workspace.holder();
    let repositories = workspace
        .repositories()
        .iter()
        .map(|repository| RepositoryReport {
            name: repository.name.clone(),
            root: repository.root.clone(),
            ignored: holder.values_for(repository),
        })
        .collect();

    ScanReport {
        summary,
        repositories,
    }
}

pub fn check_files(workspace: &IgnoredWorkspace, files: &[PathBuf]) -> Vec<CheckResult> {
    files
        .iter()
        .map(|file| {
            let path = normalize_path(file);
            let (ignored, repository) = workspace.check_file(&path);
            CheckResult {
                path,
                ignored,
                repository: repository.map(|r| r.root),
            }
        })
        .collect()
}

/// 被忽略的 .git 目录不计入大小统计
pub async fn collect_stats(workspace: &IgnoredWorkspace) -> Result<Vec<RepositoryIgnoreStats>> {
    let holder = workspace.holder();
    let repositories = workspace
        .repositories()
        .iter()
        .map(|repository| (repository.root.clone(), holder.values_for(repository)))
        .collect();

    IgnoredSizeCalculator::excluding(&[".git"])
        .measure_all(repositories)
        .await
}

async fn rescan_with_progress(workspace: &IgnoredWorkspace) -> Result<RescanSummary> {
    let listener: Arc<dyn IgnoredUpdateListener> = Arc::new(ProgressListener::new());
    let listeners = workspace.holder().listeners();
    listeners.register(listener.clone());

    let result = workspace.rescan_blocking().await;
    listeners.unregister(&listener);

    let summary = result?;
    tracing::info!(
        repositories = summary.repositories,
        ignored = summary.ignored_entries,
        "重新扫描完成"
    );
    Ok(summary)
}
