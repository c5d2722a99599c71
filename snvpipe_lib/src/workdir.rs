use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::error::WorkerError;

/// create a fresh uniquely-named working directory under `base`
pub fn generate_working_dir(base: &Path) -> Result<PathBuf, WorkerError> {
    let working_dir = base.join(Uuid::new_v4().simple().to_string());
    fs::create_dir_all(&working_dir).map_err(|source| WorkerError::CreateDir {
        path: working_dir.clone(),
        source,
    })?;
    info!("created working directory {}", working_dir.display());
    Ok(working_dir)
}

/// create `path` if absent; only prior existence is tolerated, every other
/// filesystem error propagates
pub fn ensure_dir(path: &Path) -> Result<(), WorkerError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(source) => Err(WorkerError::CreateDir {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// recursively remove a working directory tree
pub fn delete_working_dir(path: &Path) -> Result<(), WorkerError> {
    fs::remove_dir_all(path).map_err(|source| WorkerError::RemoveWorkingDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod test {
    use super::{delete_working_dir, ensure_dir, generate_working_dir};

    #[test]
    fn test_generate_working_dir_unique() {
        let base = tempfile::tempdir().unwrap();
        let first = generate_working_dir(base.path()).unwrap();
        let second = generate_working_dir(base.path()).unwrap();
        assert!(first.is_dir());
        assert!(second.is_dir());
        assert_ne!(first, second);
    }

    #[test]
    fn test_ensure_dir_tolerates_existing() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("reference");
        ensure_dir(&dir).unwrap();
        // second call hits AlreadyExists and must still succeed
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn test_ensure_dir_propagates_real_errors() {
        let base = tempfile::tempdir().unwrap();
        let dir = base.path().join("missing-parent").join("child");
        assert!(ensure_dir(&dir).is_err());
    }

    #[test]
    fn test_delete_working_dir_removes_tree() {
        let base = tempfile::tempdir().unwrap();
        let dir = generate_working_dir(base.path()).unwrap();
        std::fs::write(dir.join("leftover.txt"), "x").unwrap();
        delete_working_dir(&dir).unwrap();
        assert!(!dir.exists());
    }
}
