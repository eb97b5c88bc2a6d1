use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::models::error::RecordError;

/// Allocate a fresh output location under `dir`: the first `{i}.{extension}`
/// that does not exist yet.
///
/// Chosen once per recording attempt, before the writer leaves idle.
pub fn temp_artifact_path(dir: &Path, extension: &str) -> PathBuf {
    let mut i: u32 = 0;
    loop {
        let candidate = dir.join(format!("{}.{}", i, extension));
        if !candidate.exists() {
            return candidate;
        }
        i += 1;
    }
}

/// Delete the artifact at `path`. A missing file is not an error — teardown
/// and stale-artifact cleanup both call this without knowing whether
/// anything was written.
pub fn remove_artifact(path: &Path) -> Result<(), RecordError> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed artifact at {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(RecordError::Storage(format!(
            "failed to remove {}: {}",
            path.display(),
            e
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("video_capture_paths_{}", name));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn allocates_first_free_index() {
        let dir = scratch_dir("alloc");
        fs::write(dir.join("0.muxr"), b"x").unwrap();
        fs::write(dir.join("1.muxr"), b"x").unwrap();

        let path = temp_artifact_path(&dir, "muxr");
        assert_eq!(path, dir.join("2.muxr"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn remove_is_tolerant_of_missing_file() {
        let dir = scratch_dir("remove");
        let path = dir.join("gone.muxr");

        remove_artifact(&path).unwrap();

        fs::write(&path, b"x").unwrap();
        remove_artifact(&path).unwrap();
        assert!(!path.exists());

        fs::remove_dir_all(&dir).ok();
    }
}
