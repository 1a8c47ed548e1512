use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use anyhow::{Context, Result};
use git2::Repository;
use ignore::{Walk, WalkBuilder};
use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::RescanError;
use crate::holder::IgnoredFilesTracker;
use crate::models::IgnoredFile;

/// Git 忽略文件追踪器 - 按 .gitignore 规则维护单个仓库中被忽略的路径
///
/// 被忽略的目录只记录目录本身，其下的内容通过祖先查找判定。
pub struct GitIgnoreTracker {
    /// 仓库根路径
    root_path: PathBuf,

    /// 应用哪些忽略规则
    settings: TrackerConfig,

    /// 是否正在重新扫描
    busy: AtomicBool,

    /// 同一个追踪器上的重新扫描串行执行
    rescan_lane: Mutex<()>,

    /// 忽略的路径集合（用于快速查找）
    ignored_paths: RwLock<HashSet<PathBuf>>,
}

impl GitIgnoreTracker {
    /// 为仓库根目录创建追踪器，目录必须是一个 Git 仓库的工作区根
    ///
    /// 创建时不扫描，需要调用 [`IgnoredFilesTracker::rescan`]。
    pub fn new(root_path: &Path, settings: TrackerConfig) -> Result<Self> {
        let repo = Repository::open(root_path)
            .with_context(|| format!("不是 Git 仓库: {}", root_path.display()))?;
        if repo.is_bare() {
            anyhow::bail!("裸仓库没有工作区: {}", root_path.display());
        }

        Ok(Self {
            root_path: root_path.to_path_buf(),
            settings,
            busy: AtomicBool::new(false),
            rescan_lane: Mutex::new(()),
            ignored_paths: RwLock::new(HashSet::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// 当前记录的被忽略条目数量
    pub fn ignored_count(&self) -> usize {
        self.read_paths().len()
    }

    /// 构建忽略路径集合：全部路径与遵守忽略规则后可见路径的差集
    fn build_ignore_set(&self) -> std::result::Result<HashSet<PathBuf>, RescanError> {
        if !self.root_path.is_dir() {
            return Err(RescanError::RootUnavailable(self.root_path.clone()));
        }

        // 首先获取不被忽略的路径
        let mut not_ignored = HashSet::new();
        for result in self.walker(true) {
            match result {
                Ok(entry) => {
                    not_ignored.insert(entry.into_path());
                }
                Err(err) => debug!(error = %err, "跳过无法访问的条目"),
            }
        }

        // 遍历开始就失败时，根目录本身不可读
        if not_ignored.is_empty() {
            return match self.walker(false).next() {
                Some(Err(err)) => Err(RescanError::Walk(err)),
                _ => Err(RescanError::RootUnavailable(self.root_path.clone())),
            };
        }

        // 然后遍历所有路径，父目录先于子路径出现，已被忽略目录下的内容不再单独记录
        let mut ignored = HashSet::new();
        for result in self.walker(false) {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    debug!(error = %err, "跳过无法访问的条目");
                    continue;
                }
            };

            let path = entry.path();
            if not_ignored.contains(path) || self.has_ignored_ancestor(path, &ignored) {
                continue;
            }
            ignored.insert(path.to_path_buf());
        }

        if self.settings.include_git_dir {
            let git_dir = self.root_path.join(".git");
            if git_dir.exists() {
                ignored.insert(git_dir);
            }
        }

        Ok(ignored)
    }

    fn walker(&self, apply_rules: bool) -> Walk {
        let root = self.root_path.clone();
        WalkBuilder::new(&self.root_path)
            .hidden(false)
            .parents(false)
            .ignore(false)
            .git_ignore(apply_rules && self.settings.git_ignore)
            .git_exclude(apply_rules && self.settings.git_exclude)
            .git_global(apply_rules && self.settings.git_global)
            .filter_entry(move |entry| {
                // .git 目录单独处理；嵌套仓库由它自己的追踪器负责
                entry.file_name() != OsStr::new(".git")
                    && !(entry.path() != root.as_path() && entry.path().join(".git").exists())
            })
            .build()
    }

    fn has_ignored_ancestor(&self, path: &Path, ignored: &HashSet<PathBuf>) -> bool {
        path.ancestors()
            .skip(1)
            .take_while(|ancestor| ancestor.starts_with(&self.root_path))
            .any(|ancestor| ignored.contains(ancestor))
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root_path.join(path)
        }
    }

    fn read_paths(&self) -> std::sync::RwLockReadGuard<'_, HashSet<PathBuf>> {
        self.ignored_paths.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_paths(&self) -> std::sync::RwLockWriteGuard<'_, HashSet<PathBuf>> {
        self.ignored_paths.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl IgnoredFilesTracker for GitIgnoreTracker {
    fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    fn rescan(&self) -> std::result::Result<(), RescanError> {
        let _lane = self.rescan_lane.lock().unwrap_or_else(PoisonError::into_inner);
        self.busy.store(true, Ordering::SeqCst);
        let _busy = BusyGuard(&self.busy);

        // 扫描期间旧集合保持可读，完成后整体替换
        let ignored = self.build_ignore_set()?;
        debug!(root = %self.root_path.display(), ignored = ignored.len(), "仓库忽略集合已更新");
        *self.write_paths() = ignored;

        Ok(())
    }

    fn ignored_files(&self) -> Vec<IgnoredFile> {
        let mut files: Vec<_> = self
            .read_paths()
            .iter()
            .map(|path| IgnoredFile::from_path(path))
            .collect();
        files.sort();
        files
    }

    fn add_file(&self, file: &Path) {
        let path = self.absolute(file);
        if path.starts_with(&self.root_path) && path != self.root_path {
            self.write_paths().insert(path);
        }
    }

    /// 路径本身或其任何父路径在忽略集合中即视为被忽略
    fn contains_file(&self, file: &Path) -> bool {
        let path = self.absolute(file);
        let ignored = self.read_paths();
        path.ancestors()
            .take_while(|ancestor| ancestor.starts_with(&self.root_path))
            .any(|ancestor| ignored.contains(ancestor))
    }

    fn dispose(&self) {
        self.write_paths().clear();
    }
}

/// 离开作用域时清除忙碌标记
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn settings() -> TrackerConfig {
        // 全局忽略文件因机器而异，测试中关闭
        TrackerConfig {
            git_global: false,
            ..TrackerConfig::default()
        }
    }

    fn git_project(gitignore: &str) -> tempfile::TempDir {
        let temp_dir = tempdir().unwrap();
        Repository::init(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join(".gitignore"), gitignore).unwrap();

        fs::create_dir(temp_dir.path().join("src")).unwrap();
        fs::write(temp_dir.path().join("src").join("main.rs"), "fn main() {}").unwrap();
        fs::create_dir_all(temp_dir.path().join("target").join("debug")).unwrap();
        fs::write(temp_dir.path().join("target").join("debug").join("app"), "binary").unwrap();
        fs::write(temp_dir.path().join("build.log"), "log").unwrap();
        temp_dir
    }

    #[test]
    fn test_non_git_directory_is_rejected() {
        let temp_dir = tempdir().unwrap();
        assert!(GitIgnoreTracker::new(temp_dir.path(), settings()).is_err());
    }

    #[test]
    fn test_rescan_collects_top_level_ignored_entries() {
        let temp_dir = git_project("*.log\ntarget/\n");
        let root = temp_dir.path();
        let tracker = GitIgnoreTracker::new(root, settings()).unwrap();
        assert_eq!(tracker.ignored_count(), 0);

        tracker.rescan().unwrap();

        let files = tracker.ignored_files();
        assert!(files.contains(&IgnoredFile::file(root.join("build.log"))));
        assert!(files.contains(&IgnoredFile::directory(root.join("target"))));
        assert!(files.contains(&IgnoredFile::directory(root.join(".git"))));
        // 被忽略目录下的内容不单独记录
        assert!(!files.iter().any(|f| f.path == root.join("target").join("debug")));
        assert_eq!(files.len(), 3);
        assert!(!tracker.is_busy());
    }

    #[test]
    fn test_contains_checks_ancestors() {
        let temp_dir = git_project("target/\n");
        let root = temp_dir.path();
        let tracker = GitIgnoreTracker::new(root, settings()).unwrap();
        tracker.rescan().unwrap();

        assert!(tracker.contains_file(&root.join("target").join("debug").join("app")));
        assert!(tracker.contains_file(Path::new("target/debug")));
        assert!(tracker.contains_file(&root.join(".git").join("HEAD")));
        assert!(!tracker.contains_file(&root.join("src").join("main.rs")));
        assert!(!tracker.contains_file(&root.join("build.log")));
        assert!(!tracker.contains_file(root));
    }

    #[test]
    fn test_git_dir_can_be_excluded() {
        let temp_dir = git_project("*.log\n");
        let root = temp_dir.path();
        let tracker = GitIgnoreTracker::new(
            root,
            TrackerConfig {
                include_git_dir: false,
                ..settings()
            },
        )
        .unwrap();
        tracker.rescan().unwrap();

        assert_eq!(tracker.ignored_files(), vec![IgnoredFile::file(root.join("build.log"))]);
        assert!(!tracker.contains_file(&root.join(".git")));
    }

    #[test]
    fn test_rescan_picks_up_rule_changes() {
        let temp_dir = git_project("*.log\n");
        let root = temp_dir.path();
        let tracker = GitIgnoreTracker::new(root, settings()).unwrap();
        tracker.rescan().unwrap();
        assert!(!tracker.contains_file(&root.join("target")));

        fs::write(root.join(".gitignore"), "*.log\ntarget/\n").unwrap();
        tracker.rescan().unwrap();

        assert!(tracker.contains_file(&root.join("target")));
    }

    #[test]
    fn test_nested_repository_is_skipped() {
        let temp_dir = git_project("*.log\n");
        let root = temp_dir.path();
        let nested = root.join("vendor").join("lib");
        fs::create_dir_all(&nested).unwrap();
        Repository::init(&nested).unwrap();
        fs::write(nested.join("debug.log"), "nested").unwrap();

        let tracker = GitIgnoreTracker::new(root, settings()).unwrap();
        tracker.rescan().unwrap();

        assert!(tracker.contains_file(&root.join("build.log")));
        assert!(!tracker.contains_file(&nested.join("debug.log")));
    }

    #[test]
    fn test_missing_root_fails_rescan() {
        let temp_dir = git_project("*.log\n");
        let root = temp_dir.path().to_path_buf();
        let tracker = GitIgnoreTracker::new(&root, settings()).unwrap();
        tracker.rescan().unwrap();

        drop(temp_dir);

        assert!(matches!(tracker.rescan(), Err(RescanError::RootUnavailable(_))));
        assert!(!tracker.is_busy());
        // 失败的扫描不会清空上一次的结果
        assert!(tracker.contains_file(&root.join("build.log")));
    }

    #[test]
    fn test_add_file_and_dispose() {
        let temp_dir = git_project("");
        let root = temp_dir.path();
        let tracker = GitIgnoreTracker::new(root, settings()).unwrap();

        tracker.add_file(&root.join("notes.tmp"));
        tracker.add_file(Path::new("/somewhere/else.txt"));

        assert!(tracker.contains_file(&root.join("notes.tmp")));
        assert_eq!(tracker.ignored_count(), 1);

        tracker.dispose();
        assert_eq!(tracker.ignored_count(), 0);
    }
}
