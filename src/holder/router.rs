use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::holder::registry::{TrackerHandle, TrackerRegistry};
use crate::holder::tracker::{RepositoryManager, RootResolver, VcsRepository};

/// 根目录路由器 - 把文件路由到它所属仓库的追踪器
pub struct RootRouter<R: VcsRepository> {
    resolver: Arc<dyn RootResolver>,
    repositories: Arc<dyn RepositoryManager<R>>,
}

impl<R: VcsRepository> RootRouter<R> {
    pub fn new(resolver: Arc<dyn RootResolver>, repositories: Arc<dyn RepositoryManager<R>>) -> Self {
        Self {
            resolver,
            repositories,
        }
    }

    /// 查找负责该文件的追踪器
    ///
    /// 找不到根目录、或者根目录对应的仓库不在注册表中时返回 `None`，这不是错误。
    pub fn locate(&self, registry: &TrackerRegistry<R>, file: &Path) -> Option<TrackerHandle> {
        let Some(root) = self.resolver.resolve_root(file) else {
            debug!(file = %file.display(), "文件不属于任何仓库");
            return None;
        };

        let Some(repository) = self.repositories.repository_for_root(&root) else {
            debug!(file = %file.display(), root = %root.display(), "根目录没有对应的仓库");
            return None;
        };

        registry.get(&repository).cloned()
    }
}
