use clap::{Parser, Subcommand};
use std::path::PathBuf;

use repo_ignore_tracker::config::OutputFormat;

#[derive(Parser)]
#[command(name = "repo-ignore-tracker")]
#[command(about = "追踪多仓库工作区中被 Git 忽略的文件")]
#[command(version = "0.1.0")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 配置文件路径
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// 详细输出
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 列出工作区中的仓库
    Repos {
        /// 工作区目录 (默认使用配置中的工作区)
        paths: Vec<String>,

        /// 输出格式
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// 扫描并列出被忽略的文件
    Scan {
        /// 工作区目录 (默认使用配置中的工作区)
        paths: Vec<String>,

        /// 输出格式
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// 检查文件是否被忽略
    Check {
        /// 要检查的文件
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// 工作区目录 (默认使用配置中的工作区)
        #[arg(short, long)]
        workspace: Vec<String>,

        /// 输出格式
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// 被忽略内容的统计信息
    Stats {
        /// 工作区目录 (默认使用配置中的工作区)
        paths: Vec<String>,

        /// 输出格式
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,
    },

    /// 管理配置
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// 显示当前配置
    Show,

    /// 重置为默认配置
    Reset,

    /// 显示配置文件路径
    Path,
}
