use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;

use crate::config::OutputFormat;
use crate::models::{GitRepository, IgnoredFile, RepositoryIgnoreStats, RescanSummary};
use crate::utils::{format_datetime, format_duration, format_size};

/// 单个仓库的被忽略文件
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub name: String,
    pub root: PathBuf,
    pub ignored: Vec<IgnoredFile>,
}

/// scan 命令的输出
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub summary: RescanSummary,
    pub repositories: Vec<RepositoryReport>,
}

/// check 命令中单个文件的结果
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CheckResult {
    pub path: PathBuf,
    pub ignored: bool,
    pub repository: Option<PathBuf>,
}

pub fn print_repositories(repositories: &[GitRepository], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(repositories)?),
        OutputFormat::Table => {
            if repositories.is_empty() {
                println!("没有发现仓库");
            }
            for repository in repositories {
                println!("{:<24} {}", repository.name, repository.root.display());
            }
        }
    }
    Ok(())
}

pub fn print_scan(report: &ScanReport, format: OutputFormat, time_format: &str) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    for repository in &report.repositories {
        println!("{} ({})", repository.name, repository.root.display());
        for file in &repository.ignored {
            let relative = file.path.strip_prefix(&repository.root).unwrap_or(&file.path);
            let suffix = if file.is_directory { "/" } else { "" };
            println!("    {}{}", relative.display(), suffix);
        }
    }

    let summary = &report.summary;
    println!(
        "\n扫描于 {}，耗时 {}：{} 个仓库，{} 个被忽略的条目",
        format_datetime(summary.started_at, time_format),
        format_duration(summary.duration),
        summary.repositories,
        summary.ignored_entries
    );
    Ok(())
}

pub fn print_check(results: &[CheckResult], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(results)?);
        return Ok(());
    }

    for result in results {
        let status = if result.ignored { "已忽略" } else { "未忽略" };
        match &result.repository {
            Some(root) => println!("{}  {}  ({})", status, result.path.display(), root.display()),
            None => println!("{}  {}  (不属于任何仓库)", status, result.path.display()),
        }
    }
    Ok(())
}

pub fn print_stats(stats: &[RepositoryIgnoreStats], format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(stats)?);
        return Ok(());
    }

    let mut total_size = 0u64;
    for entry in stats {
        total_size += entry.ignored_size;
        println!(
            "{:<48} {:>6} 项 {:>8} 个文件 {:>12}",
            entry.root.display(),
            entry.ignored_entries,
            entry.ignored_file_count,
            format_size(entry.ignored_size)
        );
    }
    println!("\n共 {} 个仓库，被忽略内容合计 {}", stats.len(), format_size(total_size));
    Ok(())
}
