use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::holder::IgnoredUpdateListener;

/// 在终端上显示重新扫描进度的监听器
pub struct ProgressListener {
    progress: ProgressBar,
}

impl ProgressListener {
    pub fn new() -> Self {
        // 测试时禁用进度条
        let progress = if cfg!(test) {
            ProgressBar::hidden()
        } else {
            Self::create_progress_bar()
        };

        Self { progress }
    }

    /// 创建进度条
    fn create_progress_bar() -> ProgressBar {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(style);
        pb
    }
}

impl Default for ProgressListener {
    fn default() -> Self {
        Self::new()
    }
}

impl IgnoredUpdateListener for ProgressListener {
    fn update_started(&self) {
        self.progress.reset_elapsed();
        self.progress.set_message("正在扫描被忽略的文件...");
        self.progress.enable_steady_tick(Duration::from_millis(100));
    }

    fn update_finished(&self) {
        self.progress.disable_steady_tick();
        self.progress.finish_and_clear();
    }
}
