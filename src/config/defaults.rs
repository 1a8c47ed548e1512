use std::collections::HashSet;

pub struct DefaultConfig;

impl DefaultConfig {
    /// 发现仓库时不进入的目录名
    pub fn default_skip_dirs() -> HashSet<String> {
        let mut dirs = HashSet::new();

        // macOS 系统目录
        dirs.insert("System".to_string());
        dirs.insert("Library".to_string());
        dirs.insert("Applications".to_string());
        dirs.insert("private".to_string());
        dirs.insert("proc".to_string());
        dirs.insert("sys".to_string());
        dirs.insert(".Trash".to_string());
        dirs.insert(".Trashes".to_string());
        dirs.insert(".Spotlight-V100".to_string());
        dirs.insert(".fseventsd".to_string());

        // 常见的依赖与构建输出目录，里面的仓库不属于工作区
        dirs.insert("node_modules".to_string());
        dirs.insert("target".to_string());
        dirs.insert("dist".to_string());
        dirs.insert("build".to_string());
        dirs.insert("__pycache__".to_string());
        dirs.insert(".pytest_cache".to_string());
        dirs.insert("venv".to_string());
        dirs.insert(".venv".to_string());

        // 其他 VCS 与 IDE 目录
        dirs.insert(".svn".to_string());
        dirs.insert(".hg".to_string());
        dirs.insert(".idea".to_string());
        dirs.insert(".vscode".to_string());

        dirs
    }

    /// 默认的工作区目录
    pub fn default_workspace_paths() -> Vec<String> {
        ["Code", "Projects", "Development"]
            .iter()
            .map(|name| {
                dirs::home_dir()
                    .map(|p| p.join(name).to_string_lossy().to_string())
                    .unwrap_or_else(|| format!("~/{}", name))
            })
            .collect()
    }
}
