use std::path::Path;
use std::sync::Arc;

use crate::error::Result;
use crate::holder::coordinator::UpdateCoordinator;
use crate::holder::listeners::ListenerBus;
use crate::holder::registry::{TrackerHandle, TrackerRegistry};
use crate::holder::router::RootRouter;
use crate::holder::tracker::{FileHolder, RepositoryManager, RootResolver, VcsRepository};
use crate::models::{DirtyScope, HolderType, IgnoredFile};
use crate::utils::normalize_path;

/// 多仓库忽略文件聚合器
///
/// 为工作区中的每个仓库持有一个独立的追踪器，把文件级查询路由到对应的追踪器，
/// 并协调全量重新扫描。仓库集合只在构建时读取一次；仓库增减后需要重新构建。
pub struct VcsIgnoredFilesHolder<R: VcsRepository> {
    router: RootRouter<R>,
    coordinator: UpdateCoordinator<R>,
}

impl<R: VcsRepository> VcsIgnoredFilesHolder<R> {
    /// 读取仓库集合，并通过工厂函数为每个仓库创建追踪器
    pub fn new<F>(
        resolver: Arc<dyn RootResolver>,
        repositories: Arc<dyn RepositoryManager<R>>,
        factory: F,
    ) -> Result<Self>
    where
        F: FnMut(&R) -> anyhow::Result<TrackerHandle>,
    {
        let registry = TrackerRegistry::build(repositories.repositories(), factory)?;

        Ok(Self {
            router: RootRouter::new(resolver, repositories),
            coordinator: UpdateCoordinator::new(registry),
        })
    }

    /// 更新生命周期事件的监听器总线
    pub fn listeners(&self) -> &ListenerBus {
        self.coordinator.listeners()
    }

    /// 当前被追踪的仓库
    pub fn repositories(&self) -> Vec<R> {
        self.coordinator.snapshot().repositories().cloned().collect()
    }

    /// 负责该文件的仓库（如果有）
    pub fn repository_for_file(&self, file: &Path) -> Option<R> {
        let file = normalize_path(file);
        let registry = self.coordinator.snapshot();
        let tracker = self.router.locate(&registry, &file)?;
        let found = registry
            .iter()
            .find_map(|(repository, candidate)| Arc::ptr_eq(candidate, &tracker).then(|| repository.clone()));
        found
    }

    /// 单个仓库当前被忽略的文件
    pub fn values_for(&self, repository: &R) -> Vec<IgnoredFile> {
        self.coordinator
            .snapshot()
            .get(repository)
            .map(|tracker| tracker.ignored_files())
            .unwrap_or_default()
    }
}

impl<R: VcsRepository> FileHolder for VcsIgnoredFilesHolder<R> {
    fn holder_type(&self) -> HolderType {
        HolderType::Ignored
    }

    fn is_busy(&self) -> bool {
        self.coordinator.is_busy()
    }

    /// 各仓库的追踪器自行监听变化，这里无需处理
    fn notify_vcs_started(&self) {}

    /// 被忽略文件只在全量重新扫描时更新，不按脏范围调整
    fn adjust_dirty_scope(&self, _scope: &DirtyScope) {}

    /// 路径先规范化，路由与追踪器看到的是同一个路径
    fn add_file(&self, file: &Path) {
        let file = normalize_path(file);
        let registry = self.coordinator.snapshot();
        if let Some(tracker) = self.router.locate(&registry, &file) {
            tracker.add_file(&file);
        }
    }

    fn contains_file(&self, file: &Path) -> bool {
        let file = normalize_path(file);
        let registry = self.coordinator.snapshot();
        self.router
            .locate(&registry, &file)
            .is_some_and(|tracker| tracker.contains_file(&file))
    }

    fn values(&self) -> Vec<IgnoredFile> {
        self.coordinator.values()
    }

    fn start_rescan(&self) -> Result<()> {
        self.coordinator.start_rescan()
    }

    fn clean_all(&self) {
        self.coordinator.clean_all();
    }
}
