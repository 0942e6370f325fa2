use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

/// Creates each `(relative path, content)` file under `root`, making parent
/// directories as needed.
pub fn create_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, content) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        debug!("Created fixture {}", path.display());
    }
}

/// Paths relative to `root`, with `/` separators, for readable assertions.
pub fn relative_paths(root: &Path, paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|path| {
            path.strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}
