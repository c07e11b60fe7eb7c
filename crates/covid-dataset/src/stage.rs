use std::fs;
use std::path::Path;

use tracing::{debug, warn};

/// Ensure `path` exists and holds no files from a previous run.
///
/// Only regular files directly inside `path` are removed. An entry that cannot
/// be inspected or removed is logged and left behind. Returns how many files were removed.
pub fn prepare_directory(path: &Path) -> std::io::Result<usize> {
    if !path.exists() {
        debug!(path = %path.display(), "creating directory because it does not exist");
        fs::create_dir_all(path)?;
    }

    let mut removed = 0;
    for entry in fs::read_dir(path)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read directory entry");
                continue;
            }
        };
        let file = entry.path();
        match entry.file_type() {
            Ok(kind) if kind.is_dir() => continue,
            Ok(_) => {}
            Err(e) => {
                warn!(file = %file.display(), error = %e, "failed to inspect file");
                continue;
            }
        }
        debug!(file = %file.display(), "deleting file");
        match fs::remove_file(&file) {
            Ok(()) => removed += 1,
            Err(e) => warn!(file = %file.display(), error = %e, "failed to delete file"),
        }
    }
    Ok(removed)
}
