//! 单元测试共用的模拟仓库、追踪器与监听器

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};

use crate::error::RescanError;
use crate::holder::listeners::IgnoredUpdateListener;
use crate::holder::registry::TrackerHandle;
use crate::holder::tracker::{IgnoredFilesTracker, RepositoryManager, RootResolver, VcsRepository};
use crate::models::IgnoredFile;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestRepo {
    root: PathBuf,
}

impl TestRepo {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(root),
        }
    }
}

impl VcsRepository for TestRepo {
    fn root(&self) -> &Path {
        &self.root
    }
}

/// 仓库根目录固定的解析器，按最长前缀匹配
pub struct TestWorkspace {
    repos: Vec<TestRepo>,
}

impl TestWorkspace {
    pub fn new(roots: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            repos: roots.iter().map(|r| TestRepo::new(r)).collect(),
        })
    }
}

impl RootResolver for TestWorkspace {
    fn resolve_root(&self, file: &Path) -> Option<PathBuf> {
        self.repos
            .iter()
            .map(|r| r.root().to_path_buf())
            .filter(|root| file.starts_with(root))
            .max_by_key(|root| root.components().count())
    }
}

impl RepositoryManager<TestRepo> for TestWorkspace {
    fn repositories(&self) -> Vec<TestRepo> {
        self.repos.clone()
    }

    fn repository_for_root(&self, root: &Path) -> Option<TestRepo> {
        self.repos.iter().find(|r| r.root() == root).cloned()
    }
}

/// 可控的追踪器：记录调用次数，可切换忙碌状态、注入失败或阻塞重新扫描
#[derive(Default)]
pub struct MockTracker {
    pub busy: AtomicBool,
    pub fail_rescan: AtomicBool,
    pub panic_rescan: AtomicBool,
    pub rescans: AtomicUsize,
    pub add_calls: AtomicUsize,
    pub contains_calls: AtomicUsize,
    pub disposed: AtomicUsize,
    pub files: Mutex<HashSet<PathBuf>>,
    /// 设置后，rescan 先发送一个信号，再等待放行
    pub gate: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
}

impl MockTracker {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn handle() -> TrackerHandle {
        Self::new()
    }

    pub fn failing() -> Arc<Self> {
        let tracker = Self::new();
        tracker.fail_rescan.store(true, Ordering::SeqCst);
        tracker
    }

    pub fn set_busy(&self, busy: bool) {
        self.busy.store(busy, Ordering::SeqCst);
    }

    pub fn with_files(files: &[&str]) -> Arc<Self> {
        let tracker = Self::new();
        {
            let mut set = tracker.files.lock().unwrap();
            set.extend(files.iter().map(PathBuf::from));
        }
        tracker
    }
}

impl IgnoredFilesTracker for MockTracker {
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn rescan(&self) -> Result<(), RescanError> {
        self.rescans.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();
        if let Some((entered, release)) = gate {
            self.set_busy(true);
            entered.send(()).unwrap();
            release.recv().unwrap();
            self.set_busy(false);
        }

        if self.panic_rescan.load(Ordering::SeqCst) {
            panic!("追踪器崩溃");
        }
        if self.fail_rescan.load(Ordering::SeqCst) {
            return Err(RescanError::Other(anyhow::anyhow!("模拟失败")));
        }
        Ok(())
    }

    fn ignored_files(&self) -> Vec<IgnoredFile> {
        self.files
            .lock()
            .unwrap()
            .iter()
            .map(|p| IgnoredFile::file(p.clone()))
            .collect()
    }

    fn add_file(&self, file: &Path) {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().insert(file.to_path_buf());
    }

    fn contains_file(&self, file: &Path) -> bool {
        self.contains_calls.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().contains(file)
    }

    fn dispose(&self) {
        self.disposed.fetch_add(1, Ordering::SeqCst);
    }
}

/// 把每个仓库映射到预先创建好的模拟追踪器
pub fn factory_for(
    trackers: &HashMap<TestRepo, Arc<MockTracker>>,
) -> impl FnMut(&TestRepo) -> anyhow::Result<TrackerHandle> + '_ {
    move |repo| {
        let tracker = trackers
            .get(repo)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("没有为 {:?} 准备追踪器", repo))?;
        Ok(tracker as TrackerHandle)
    }
}

/// 按顺序记录收到的事件
#[derive(Default)]
pub struct RecordingListener {
    pub events: Mutex<Vec<&'static str>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().clone()
    }
}

impl IgnoredUpdateListener for RecordingListener {
    fn update_started(&self) {
        self.events.lock().unwrap().push("started");
    }

    fn update_finished(&self) {
        self.events.lock().unwrap().push("finished");
    }
}

/// 每次回调都会 panic 的监听器
pub struct PanickingListener;

impl IgnoredUpdateListener for PanickingListener {
    fn update_started(&self) {
        panic!("监听器在开始时崩溃");
    }

    fn update_finished(&self) {
        panic!("监听器在结束时崩溃");
    }
}
