use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use tracing::{info, warn};

use crate::error::{HolderError, RescanError, Result};
use crate::holder::listeners::ListenerBus;
use crate::holder::registry::TrackerRegistry;
use crate::holder::tracker::VcsRepository;
use crate::models::IgnoredFile;

/// 更新协调器 - 在所有追踪器上执行重新扫描，并按需计算聚合忙碌状态
///
/// 注册表放在 `RwLock<Arc<..>>` 里：读者只在克隆 `Arc` 的瞬间持有读锁，
/// 之后的查询与重新扫描都作用在快照上，因此查询永远不会等待扫描结束。
/// `clean_all` 把整个 `Arc` 替换为空注册表，并发读者要么看到完整的旧映射，
/// 要么看到空映射。
pub struct UpdateCoordinator<R: VcsRepository> {
    registry: RwLock<Arc<TrackerRegistry<R>>>,
    listeners: ListenerBus,
}

impl<R: VcsRepository> UpdateCoordinator<R> {
    pub fn new(registry: TrackerRegistry<R>) -> Self {
        Self {
            registry: RwLock::new(Arc::new(registry)),
            listeners: ListenerBus::new(),
        }
    }

    /// 当前注册表的快照
    pub fn snapshot(&self) -> Arc<TrackerRegistry<R>> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn listeners(&self) -> &ListenerBus {
        &self.listeners
    }

    /// 任意一个追踪器正在扫描即为忙碌，每次调用都重新计算
    pub fn is_busy(&self) -> bool {
        self.snapshot().trackers().any(|tracker| tracker.is_busy())
    }

    /// 所有追踪器当前被忽略的文件，顺序不确定
    pub fn values(&self) -> Vec<IgnoredFile> {
        self.snapshot()
            .trackers()
            .flat_map(|tracker| tracker.ignored_files())
            .collect()
    }

    /// 依次重新扫描所有追踪器
    ///
    /// 开始与结束通知总是成对发出。某个追踪器失败时，其余追踪器仍会被扫描；
    /// 结束通知发出之后，第一个失败以 [`HolderError::Rescan`] 返回给调用者。
    /// 追踪器 panic 时结束通知同样会发出，随后 panic 继续向上传播。
    pub fn start_rescan(&self) -> Result<()> {
        let registry = self.snapshot();
        let started = Instant::now();

        self.listeners.notify_started();
        let finish = FinishGuard(&self.listeners);

        info!(repositories = registry.len(), "开始重新扫描被忽略文件");

        let mut first_failure: Option<(std::path::PathBuf, RescanError)> = None;
        let mut failures = 0usize;

        for (repository, tracker) in registry.iter() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| tracker.rescan()));
            let result = match outcome {
                Ok(result) => result,
                Err(payload) => {
                    // 先把剩余仓库扫描完，不让一个 panic 吞掉整轮扫描
                    Self::rescan_remaining(&registry, repository);
                    panic::resume_unwind(payload);
                }
            };

            if let Err(error) = result {
                failures += 1;
                warn!(root = %repository.root().display(), error = %error, "仓库重新扫描失败");
                if first_failure.is_none() {
                    first_failure = Some((repository.root().to_path_buf(), error));
                }
            }
        }

        info!(
            repositories = registry.len(),
            failures,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "被忽略文件重新扫描结束"
        );

        // 先发出结束通知，再把失败交给调用者
        drop(finish);

        match first_failure {
            Some((repository, source)) => Err(HolderError::Rescan {
                repository,
                failures,
                source,
            }),
            None => Ok(()),
        }
    }

    fn rescan_remaining(registry: &TrackerRegistry<R>, crashed: &R) {
        let mut reached = false;
        for (repository, tracker) in registry.iter() {
            if reached {
                let outcome = panic::catch_unwind(AssertUnwindSafe(|| tracker.rescan()));
                if !matches!(outcome, Ok(Ok(()))) {
                    warn!(root = %repository.root().display(), "仓库重新扫描失败");
                }
            } else if repository == crashed {
                reached = true;
                warn!(root = %repository.root().display(), "仓库重新扫描时崩溃");
            }
        }
    }

    /// 原子地丢弃整个注册表，并释放被丢弃的追踪器
    ///
    /// 正在进行的扫描持有旧快照，会照常走完。
    pub fn clean_all(&self) {
        let discarded = {
            let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *registry, Arc::new(TrackerRegistry::empty()))
        };

        if discarded.is_empty() {
            return;
        }

        info!(repositories = discarded.len(), "丢弃全部忽略文件追踪器");
        for tracker in discarded.trackers() {
            tracker.dispose();
        }
    }
}

/// 离开作用域时发出结束通知，包括 panic 展开的路径
struct FinishGuard<'a>(&'a ListenerBus);

impl Drop for FinishGuard<'_> {
    fn drop(&mut self) {
        self.0.notify_finished();
    }
}
