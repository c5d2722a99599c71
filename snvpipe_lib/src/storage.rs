use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::info;

use crate::error::WorkerError;

/// Transfer capabilities the worker stages data through. Implementations own
/// path handling on the remote side; the worker only sequences the calls.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// download a single object into `dest_dir`, returning its local path
    async fn download_file(&self, s3_path: &str, dest_dir: &Path) -> Result<PathBuf, WorkerError>;

    /// upload a single local file to `s3_path`
    async fn upload_file(&self, s3_path: &str, local_path: &Path) -> Result<(), WorkerError>;

    /// recursively download a folder into `dest_dir`
    async fn download_folder(&self, s3_path: &str, dest_dir: &Path) -> Result<(), WorkerError>;

    /// recursively upload `local_dir` to `s3_path`
    async fn upload_folder(&self, s3_path: &str, local_dir: &Path) -> Result<(), WorkerError>;
}

/// Storage backed by the `aws s3 cp` CLI shipped in the batch container
/// image. Credentials come from the container's execution role.
#[derive(Default)]
pub struct AwsCliStorage;

impl AwsCliStorage {
    pub fn new() -> Self {
        Self
    }

    async fn copy(
        &self,
        s3_path: &str,
        from: &str,
        to: &str,
        recursive: bool,
    ) -> Result<(), WorkerError> {
        let mut command = Command::new("aws");
        command.arg("s3").arg("cp").arg(from).arg(to);
        if recursive {
            command.arg("--recursive");
        }
        info!("transferring {} -> {}", from, to);
        let status = command
            .status()
            .await
            .map_err(|source| WorkerError::TransferLaunch {
                s3_path: s3_path.to_string(),
                source,
            })?;
        if !status.success() {
            return Err(WorkerError::TransferFailed {
                s3_path: s3_path.to_string(),
                status,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStorage for AwsCliStorage {
    async fn download_file(&self, s3_path: &str, dest_dir: &Path) -> Result<PathBuf, WorkerError> {
        let local_path = dest_dir.join(object_file_name(s3_path)?);
        self.copy(s3_path, s3_path, &local_path.to_string_lossy(), false)
            .await?;
        Ok(local_path)
    }

    async fn upload_file(&self, s3_path: &str, local_path: &Path) -> Result<(), WorkerError> {
        self.copy(s3_path, &local_path.to_string_lossy(), s3_path, false)
            .await
    }

    async fn download_folder(&self, s3_path: &str, dest_dir: &Path) -> Result<(), WorkerError> {
        self.copy(s3_path, s3_path, &dest_dir.to_string_lossy(), true)
            .await
    }

    async fn upload_folder(&self, s3_path: &str, local_dir: &Path) -> Result<(), WorkerError> {
        self.copy(s3_path, &local_dir.to_string_lossy(), s3_path, true)
            .await
    }
}

/// last path segment of an object path; a trailing slash is an error since
/// single-object transfers need a file name to land under
pub(crate) fn object_file_name(s3_path: &str) -> Result<&str, WorkerError> {
    match s3_path.rsplit('/').next() {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(WorkerError::BadObjectPath {
            s3_path: s3_path.to_string(),
        }),
    }
}
