use crate::language::Language;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Scanner for candidate source files in a project
///
/// Yields files in walker order. That order depends on the platform's
/// directory listing and is not stable across machines.
pub struct FileScanner {
    root: PathBuf,
    max_file_size_bytes: u64,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, max_file_size_bytes: u64) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            max_file_size_bytes,
        }
    }

    /// Walk the project and collect parseable source files (.gitignore aware)
    pub fn scan(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let root = self.root.clone();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(true)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true);
        builder.filter_entry(move |entry| !FileScanner::is_ignored_scope(entry.path(), &root));

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }

                    let path = entry.path();
                    if !Self::is_parseable(path) {
                        continue;
                    }

                    if let Ok(meta) = entry.metadata() {
                        if meta.len() > self.max_file_size_bytes {
                            log::debug!(
                                "Skipping large file {} ({} bytes > {})",
                                path.display(),
                                meta.len(),
                                self.max_file_size_bytes
                            );
                            continue;
                        }
                    }

                    files.push(path.to_path_buf());
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }

        log::debug!("Found {} candidate source files", files.len());
        files
    }

    /// Only files with a structural grammar can hold a locatable entity
    fn is_parseable(path: &Path) -> bool {
        Language::from_path(path).supports_ast()
    }

    fn is_ignored_scope(path: &Path, root: &Path) -> bool {
        if let Ok(relative) = path.strip_prefix(root) {
            for component in relative.components() {
                if let std::path::Component::Normal(name) = component {
                    let lowered = name.to_string_lossy().to_lowercase();
                    if IGNORED_SCOPES.iter().any(|ignored| ignored == &lowered) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

const IGNORED_SCOPES: &[&str] = &[
    // VCS / tooling
    ".git",
    ".hg",
    ".svn",
    ".idea",
    ".vscode",
    // virtualenvs / dependencies
    "venv",
    ".venv",
    "env",
    "site-packages",
    "node_modules",
    "vendor",
    "third_party",
    // caches / builds
    "__pycache__",
    ".mypy_cache",
    ".pytest_cache",
    ".tox",
    ".cache",
    "build",
    "dist",
    "target",
];

#[cfg(test)]
mod tests {
    use super::FileScanner;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn skips_dependency_and_cache_directories() {
        let temp = tempdir().unwrap();
        let venv = temp.path().join("venv").join("lib");
        let cache = temp.path().join("pkg").join("__pycache__");
        fs::create_dir_all(&venv).unwrap();
        fs::create_dir_all(&cache).unwrap();
        fs::write(venv.join("dep.py"), b"class Dep:\n    pass\n").unwrap();
        fs::write(cache.join("mod.py"), b"x = 1\n").unwrap();
        fs::write(temp.path().join("pkg").join("app.py"), b"def run():\n    pass\n").unwrap();

        let files = FileScanner::new(temp.path(), 1_048_576).scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("pkg/app.py"));
    }

    #[test]
    fn skips_hidden_unparseable_and_large_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join(".hidden.py"), b"def h():\n    pass\n").unwrap();
        fs::write(temp.path().join("notes.md"), b"# def x():").unwrap();
        fs::write(temp.path().join("big.py"), vec![b'#'; 2048]).unwrap();
        fs::write(temp.path().join("small.py"), b"def s():\n    pass\n").unwrap();

        let files = FileScanner::new(temp.path(), 1024).scan();

        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("small.py"));
    }
}
