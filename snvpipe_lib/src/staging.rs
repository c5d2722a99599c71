use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::WorkerError;
use crate::storage::ObjectStorage;
use crate::workdir::ensure_dir;

/// placeholder prefix the reference descriptor ships with; every run rewrites
/// it to that run's local reference directory
pub const SCRATCH_PLACEHOLDER: &str = "/scratch";

/// descriptor file expected at the top of the reference folder
pub const REFERENCE_DESCRIPTOR: &str = "sorted-reference.xml";

/// download the GATK jar into the working directory, returning its local path
pub async fn download_gatk(
    storage: &dyn ObjectStorage,
    s3_path: &str,
    working_dir: &Path,
) -> Result<PathBuf, WorkerError> {
    storage.download_file(s3_path, working_dir).await
}

/// download the reference folder into `<working_dir>/reference` and rewrite
/// its descriptor to point at the staged copy
pub async fn download_reference(
    storage: &dyn ObjectStorage,
    s3_path: &str,
    working_dir: &Path,
) -> Result<PathBuf, WorkerError> {
    let reference_dir = working_dir.join("reference");
    ensure_dir(&reference_dir)?;
    storage.download_folder(s3_path, &reference_dir).await?;
    update_sorted_reference(&reference_dir)?;
    Ok(reference_dir)
}

/// download the tumor and normal BAMs into `<working_dir>/samples`
pub async fn download_samples(
    storage: &dyn ObjectStorage,
    bam1_s3_path: &str,
    bam2_s3_path: &str,
    working_dir: &Path,
) -> Result<(PathBuf, PathBuf), WorkerError> {
    let samples_dir = working_dir.join("samples");
    ensure_dir(&samples_dir)?;
    let tumor_bam = storage.download_file(bam1_s3_path, &samples_dir).await?;
    let normal_bam = storage.download_file(bam2_s3_path, &samples_dir).await?;
    Ok((tumor_bam, normal_bam))
}

/// recursively upload the results folder to its destination
pub async fn upload_results(
    storage: &dyn ObjectStorage,
    s3_path: &str,
    results_dir: &Path,
) -> Result<(), WorkerError> {
    storage.upload_folder(s3_path, results_dir).await
}

/// Rewrite `sorted-reference.xml` so its paths point into this run's
/// reference directory. The folder is staged under a fresh directory every
/// execution, so the shipped placeholder is never valid as-is.
pub fn update_sorted_reference(reference_dir: &Path) -> Result<(), WorkerError> {
    let descriptor_path = reference_dir.join(REFERENCE_DESCRIPTOR);
    let contents =
        fs::read_to_string(&descriptor_path).map_err(|source| WorkerError::ReadDescriptor {
            path: descriptor_path.clone(),
            source,
        })?;
    let local_dir = reference_dir.to_string_lossy();
    info!("rewriting {} -> {}", SCRATCH_PLACEHOLDER, local_dir);
    let contents = contents.replace(SCRATCH_PLACEHOLDER, &local_dir);
    fs::write(&descriptor_path, contents).map_err(|source| WorkerError::WriteDescriptor {
        path: descriptor_path,
        source,
    })
}
