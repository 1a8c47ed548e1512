use std::fmt::Debug;
use std::hash::Hash;
use std::path::{Path, PathBuf};

use crate::error::{RescanError, Result};
use crate::models::{DirtyScope, HolderType, IgnoredFile};

/// 版本控制仓库的身份
///
/// 聚合器只把仓库当作查找键使用，从不管理它的生命周期。
pub trait VcsRepository: Clone + Eq + Hash + Debug + Send + Sync + 'static {
    /// 仓库根目录
    fn root(&self) -> &Path;
}

/// 单个仓库的忽略文件追踪器
///
/// 实现者自行负责内部的线程安全：聚合器会在一个线程上调用 `rescan`，
/// 同时在其他线程上调用 `contains_file` / `add_file` / `ignored_files`。
pub trait IgnoredFilesTracker: Send + Sync {
    /// 是否正在重新扫描
    fn is_busy(&self) -> bool;

    /// 完整地重新计算被忽略文件集合，阻塞直到完成
    fn rescan(&self) -> std::result::Result<(), RescanError>;

    /// 当前被忽略的文件
    fn ignored_files(&self) -> Vec<IgnoredFile>;

    /// 记录一个被忽略的文件
    fn add_file(&self, file: &Path);

    /// 文件是否被忽略
    fn contains_file(&self, file: &Path) -> bool;

    /// 追踪器被聚合器丢弃时调用一次，用于释放其持有的资源
    fn dispose(&self) {}
}

/// 把任意文件解析到它所属的仓库根目录
pub trait RootResolver: Send + Sync {
    fn resolve_root(&self, file: &Path) -> Option<PathBuf>;
}

/// 工作区中仓库集合的提供者
pub trait RepositoryManager<R: VcsRepository>: Send + Sync {
    /// 当前所有仓库，只在构建聚合器时读取一次
    fn repositories(&self) -> Vec<R>;

    /// 根据根目录查找仓库
    fn repository_for_root(&self, root: &Path) -> Option<R>;
}

/// 文件持有者契约
///
/// 变更检测子系统通过它与各类文件持有者交互。
pub trait FileHolder: Send + Sync {
    /// 持有者类型
    fn holder_type(&self) -> HolderType;

    /// 是否有更新正在进行
    fn is_busy(&self) -> bool;

    /// 某个 VCS 开始一轮变更检测
    fn notify_vcs_started(&self);

    /// 按脏范围清理并调整持有的状态
    fn adjust_dirty_scope(&self, scope: &DirtyScope);

    fn add_file(&self, file: &Path);

    fn contains_file(&self, file: &Path) -> bool;

    fn values(&self) -> Vec<IgnoredFile>;

    /// 重新扫描，阻塞直到完成
    fn start_rescan(&self) -> Result<()>;

    /// 丢弃全部状态
    fn clean_all(&self);
}
