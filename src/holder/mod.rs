//! 多仓库忽略文件聚合
//!
//! 每个仓库一个 [`IgnoredFilesTracker`]，由 [`VcsIgnoredFilesHolder`] 统一对外：
//! - [`TrackerRegistry`]：构建时一次性生成的仓库 → 追踪器映射
//! - [`RootRouter`]：把文件路由到所属仓库的追踪器
//! - [`UpdateCoordinator`]：全量重新扫描与聚合忙碌状态
//! - [`ListenerBus`]：开始/结束事件的同步广播

pub mod aggregate;
pub mod coordinator;
pub mod listeners;
pub mod registry;
pub mod router;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;

pub use aggregate::VcsIgnoredFilesHolder;
pub use coordinator::UpdateCoordinator;
pub use listeners::{IgnoredUpdateListener, ListenerBus, UpdateEvent};
pub use registry::{TrackerHandle, TrackerRegistry};
pub use router::RootRouter;
pub use tracker::{FileHolder, IgnoredFilesTracker, RepositoryManager, RootResolver, VcsRepository};
