//! Source file discovery.

use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Recursively collects every `.json` file under `root`, in traversal order.
///
/// A missing or non-directory root yields an empty list so that a sweep over
/// an absent tree is a no-op, but the condition is logged since it usually
/// means a misconfigured path. Entries that cannot be read are skipped with
/// a warning instead of aborting the walk.
pub fn find_json_files(root: &Path) -> Vec<PathBuf> {
    if !root.is_dir() {
        warn!(
            "Source directory {} does not exist, treating it as empty",
            root.display()
        );
        return Vec::new();
    }

    let root = match root.canonicalize() {
        Ok(path) => path,
        Err(_) => root.to_path_buf(),
    };

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(false) {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file() && has_json_extension(entry.path()) {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                warn!("Error accessing entry under {}: {}", root.display(), err);
            }
        }
    }
    files
}

fn has_json_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
