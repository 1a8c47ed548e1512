use std::path::PathBuf;
use thiserror::Error;

/// 忽略文件聚合器的结果类型
pub type Result<T> = std::result::Result<T, HolderError>;

/// 单个仓库追踪器重新扫描失败
#[derive(Error, Debug)]
pub enum RescanError {
    /// 仓库根目录不可访问（被删除或权限不足）
    #[error("仓库根目录不可访问: {}", .0.display())]
    RootUnavailable(PathBuf),

    /// 遍历工作区时出错
    #[error("遍历失败: {0}")]
    Walk(#[from] ignore::Error),

    /// 追踪器内部错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 聚合器对外暴露的错误
#[derive(Error, Debug)]
pub enum HolderError {
    /// 构建追踪器注册表时工厂函数失败，聚合器不会被创建
    #[error("无法为仓库 {} 创建忽略文件追踪器: {source}", .repository.display())]
    Construction {
        repository: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// 重新扫描过程中至少有一个追踪器失败
    ///
    /// `repository` 与 `source` 对应第一个失败的追踪器，
    /// `failures` 为本轮扫描中失败的追踪器总数。
    #[error("仓库 {} 重新扫描失败（本轮共 {failures} 个失败）: {source}", .repository.display())]
    Rescan {
        repository: PathBuf,
        failures: usize,
        #[source]
        source: RescanError,
    },
}

impl HolderError {
    /// 发生错误的仓库根目录
    pub fn repository(&self) -> &PathBuf {
        match self {
            Self::Construction { repository, .. } | Self::Rescan { repository, .. } => repository,
        }
    }
}
