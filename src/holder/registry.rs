use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{HolderError, Result};
use crate::holder::tracker::{IgnoredFilesTracker, VcsRepository};

/// 追踪器的共享句柄
pub type TrackerHandle = Arc<dyn IgnoredFilesTracker>;

/// 仓库到追踪器的不可变映射
///
/// 只在聚合器构建时生成一次。仓库集合变化时必须丢弃整个聚合器重新构建，
/// 不支持增量添加或删除。
pub struct TrackerRegistry<R: VcsRepository> {
    trackers: HashMap<R, TrackerHandle>,
}

impl<R: VcsRepository> TrackerRegistry<R> {
    /// 为每个仓库调用一次工厂函数并保存结果
    ///
    /// 重复的仓库只会创建一个追踪器。任何一次工厂调用失败都会立即返回错误，
    /// 已经创建的追踪器随之被丢弃，不存在部分构建的注册表。
    pub fn build<I, F>(repositories: I, mut factory: F) -> Result<Self>
    where
        I: IntoIterator<Item = R>,
        F: FnMut(&R) -> anyhow::Result<TrackerHandle>,
    {
        let mut trackers = HashMap::new();

        for repository in repositories {
            if let Entry::Vacant(slot) = trackers.entry(repository) {
                let tracker = factory(slot.key()).map_err(|source| HolderError::Construction {
                    repository: slot.key().root().to_path_buf(),
                    source,
                })?;
                debug!(root = %slot.key().root().display(), "已创建忽略文件追踪器");
                slot.insert(tracker);
            }
        }

        Ok(Self { trackers })
    }

    /// 空注册表（全部清理后的状态）
    pub fn empty() -> Self {
        Self {
            trackers: HashMap::new(),
        }
    }

    pub fn get(&self, repository: &R) -> Option<&TrackerHandle> {
        self.trackers.get(repository)
    }

    pub fn contains(&self, repository: &R) -> bool {
        self.trackers.contains_key(repository)
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    /// 按任意顺序遍历所有仓库及其追踪器
    pub fn iter(&self) -> impl Iterator<Item = (&R, &TrackerHandle)> {
        self.trackers.iter()
    }

    pub fn repositories(&self) -> impl Iterator<Item = &R> {
        self.trackers.keys()
    }

    pub fn trackers(&self) -> impl Iterator<Item = &TrackerHandle> {
        self.trackers.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holder::testing::{MockTracker, TestRepo};
    use std::collections::HashSet;

    #[test]
    fn test_one_tracker_per_repository() {
        let repos = vec![TestRepo::new("/a"), TestRepo::new("/b"), TestRepo::new("/c")];
        let mut calls = Vec::new();

        let registry = TrackerRegistry::build(repos.clone(), |repo| {
            calls.push(repo.clone());
            Ok(MockTracker::handle())
        })
        .unwrap();

        assert_eq!(registry.len(), 3);
        assert_eq!(calls.len(), 3);
        for repo in &repos {
            assert!(registry.contains(repo));
        }
        assert!(!registry.contains(&TestRepo::new("/d")));

        let keys: HashSet<_> = registry.repositories().cloned().collect();
        let expected: HashSet<_> = repos.into_iter().collect();
        assert_eq!(keys, expected);
    }

    #[test]
    fn test_duplicate_repository_builds_single_tracker() {
        let repos = vec![TestRepo::new("/a"), TestRepo::new("/a")];
        let mut calls = 0;

        let registry = TrackerRegistry::build(repos, |_| {
            calls += 1;
            Ok(MockTracker::handle())
        })
        .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_factory_failure_is_construction_error() {
        let repos = vec![TestRepo::new("/a"), TestRepo::new("/broken")];

        let result = TrackerRegistry::build(repos, |repo| {
            if repo.root().ends_with("broken") {
                anyhow::bail!("无法打开仓库");
            }
            Ok(MockTracker::handle())
        });

        match result {
            Err(HolderError::Construction { repository, .. }) => {
                assert_eq!(repository, std::path::PathBuf::from("/broken"));
            }
            Err(other) => panic!("意外的错误: {other}"),
            Ok(_) => panic!("工厂失败时不应构建注册表"),
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = TrackerRegistry::<TestRepo>::empty();
        assert!(registry.is_empty());
        assert_eq!(registry.trackers().count(), 0);
    }
}
