use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use anyhow::Result;

use crate::config::defaults::DefaultConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 查找仓库的工作区目录列表
    pub workspace_paths: Vec<String>,

    /// 仓库发现配置
    pub discovery: DiscoveryConfig,

    /// 忽略规则配置
    pub tracker: TrackerConfig,

    /// 输出配置
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// 最大扫描深度
    pub max_depth: Option<usize>,

    /// 是否跟随符号链接
    pub follow_symlinks: bool,

    /// 不进入的目录名
    pub skip_directories: HashSet<String>,

    /// 是否进入隐藏目录查找仓库
    pub scan_hidden: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// 应用各级 .gitignore
    pub git_ignore: bool,

    /// 应用 .git/info/exclude
    pub git_exclude: bool,

    /// 应用全局 core.excludesFile
    pub git_global: bool,

    /// 把 .git 目录本身视为被忽略
    pub include_git_dir: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 默认输出格式
    pub format: OutputFormat,

    /// 时间格式
    pub time_format: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 表格格式
    Table,
    /// JSON 格式
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workspace_paths: DefaultConfig::default_workspace_paths(),
            discovery: DiscoveryConfig::default(),
            tracker: TrackerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(6),
            follow_symlinks: false,
            skip_directories: DefaultConfig::default_skip_dirs(),
            scan_hidden: false,
        }
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            git_ignore: true,
            git_exclude: true,
            git_global: true,
            include_git_dir: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            time_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl Config {
    /// 从文件加载配置
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        // 确保目录存在
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// 获取默认配置文件路径
    pub fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("无法找到配置目录"))?;
        path.push("repo-ignore-tracker");
        path.push("config.toml");
        Ok(path)
    }

    /// 加载配置，如果文件不存在则创建默认配置
    pub fn load_or_create_default() -> Result<Self> {
        let config_path = Self::default_config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// 命令行给出了路径时优先使用，否则使用配置中的工作区
    pub fn resolve_workspace_paths(&self, cli_paths: &[String]) -> Vec<PathBuf> {
        let paths = if cli_paths.is_empty() {
            &self.workspace_paths
        } else {
            cli_paths
        };
        paths.iter().map(PathBuf::from).collect()
    }
}
