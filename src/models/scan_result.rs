use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// 一次完整重新扫描的摘要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescanSummary {
    /// 扫描开始时间
    pub started_at: DateTime<Utc>,

    /// 扫描耗时
    pub duration: Duration,

    /// 参与扫描的仓库数量
    pub repositories: usize,

    /// 扫描后被忽略的条目总数
    pub ignored_entries: usize,
}

/// 单个仓库的忽略文件统计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryIgnoreStats {
    /// 仓库根目录
    pub root: PathBuf,

    /// 被忽略的顶层条目数量（目录按一个计）
    pub ignored_entries: usize,

    /// 被忽略的文件数量（递归展开目录）
    pub ignored_file_count: usize,

    /// 被忽略的文件总大小（字节）
    pub ignored_size: u64,
}
