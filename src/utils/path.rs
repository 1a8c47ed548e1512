use std::path::{Component, Path, PathBuf};

/// 把路径规范化为绝对路径
///
/// 相对路径基于当前目录。路径存在时解析符号链接；不存在时规范化最深的已存在祖先，
/// 剩余部分按字面去掉 `.` 和 `..`。
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };

    if let Ok(canonical) = absolute.canonicalize() {
        return canonical;
    }

    let cleaned = lexical_clean(&absolute);
    for ancestor in cleaned.ancestors() {
        let Ok(canonical) = ancestor.canonicalize() else {
            continue;
        };
        return match cleaned.strip_prefix(ancestor) {
            Ok(rest) if !rest.as_os_str().is_empty() => canonical.join(rest),
            _ => canonical,
        };
    }

    cleaned
}

fn lexical_clean(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_existing_path_is_canonicalized() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("src")).unwrap();
        fs::write(root.join("server.log"), "log").unwrap();

        let dotted = root.join("src").join("..").join(".").join("server.log");
        assert_eq!(normalize_path(&dotted), root.join("server.log"));
    }

    #[test]
    fn test_missing_file_keeps_canonical_parent() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir(root.join("src")).unwrap();

        let missing = root.join("src").join("..").join("out").join("a.o");
        assert_eq!(normalize_path(&missing), root.join("out").join("a.o"));
    }

    #[test]
    fn test_nonexistent_tree_is_cleaned_lexically() {
        assert_eq!(
            normalize_path(Path::new("/definitely/not/../here/./x.txt")),
            PathBuf::from("/definitely/here/x.txt")
        );
    }

    #[test]
    fn test_relative_path_uses_current_dir() {
        let expected = std::env::current_dir().unwrap().canonicalize().unwrap().join("no-such-file.txt");
        assert_eq!(normalize_path(Path::new("no-such-file.txt")), expected);
    }
}
