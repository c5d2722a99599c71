use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::error::WorkerError;
use crate::mutect::{self, OUTPUT_VCF, RESULTS_SUBDIR, TOOL_PROGRAM};
use crate::staging;
use crate::storage::ObjectStorage;
use crate::workdir::{delete_working_dir, generate_working_dir};

/// One fully described variant-calling job, as handed over on the worker
/// command line. `working_dir` is the scratch base; each run gets its own
/// subdirectory underneath it.
#[derive(Clone, Debug)]
pub struct WorkerJob {
    pub gatk_s3_path: String,
    pub reference_s3_path: String,
    pub bam1_s3_path: String,
    pub bam2_s3_path: String,
    pub bam_s3_folder_path: String,
    pub cmd_args: String,
    pub working_dir: PathBuf,
}

/// Run one job end to end: stage inputs, call variants, upload results.
/// Removal of the working directory is attempted on every exit path; a
/// cleanup failure is logged and never masks the step that failed.
#[instrument(skip(storage, job))]
pub async fn run_job(storage: &dyn ObjectStorage, job: &WorkerJob) -> Result<(), WorkerError> {
    run_job_with_program(storage, job, TOOL_PROGRAM).await
}

pub(crate) async fn run_job_with_program(
    storage: &dyn ObjectStorage,
    job: &WorkerJob,
    program: &str,
) -> Result<(), WorkerError> {
    let working_dir = generate_working_dir(&job.working_dir)?;
    let result = execute(storage, job, &working_dir, program).await;
    info!("cleaning up {}", working_dir.display());
    if let Err(err) = delete_working_dir(&working_dir) {
        warn!("leaving working directory behind: {}", err);
    }
    result
}

async fn execute(
    storage: &dyn ObjectStorage,
    job: &WorkerJob,
    working_dir: &Path,
    program: &str,
) -> Result<(), WorkerError> {
    info!("downloading gatk");
    let gatk_jar = staging::download_gatk(storage, &job.gatk_s3_path, working_dir).await?;
    info!("downloading reference");
    let reference_dir =
        staging::download_reference(storage, &job.reference_s3_path, working_dir).await?;
    info!("downloading sample bams");
    let (tumor_bam, normal_bam) =
        staging::download_samples(storage, &job.bam1_s3_path, &job.bam2_s3_path, working_dir)
            .await?;

    let results_dir = working_dir.join(RESULTS_SUBDIR);
    fs::create_dir_all(&results_dir).map_err(|source| WorkerError::CreateDir {
        path: results_dir.clone(),
        source,
    })?;
    let output_vcf = results_dir.join(OUTPUT_VCF);
    let mut command = mutect::build_mutect_command(
        &gatk_jar,
        &reference_dir,
        &tumor_bam,
        &normal_bam,
        &output_vcf,
        &job.cmd_args,
    );
    command.program = program.to_string();
    info!("running mutect");
    mutect::run_tool(working_dir, &command).await?;

    info!("uploading results to {}", job.bam_s3_folder_path);
    staging::upload_results(storage, &job.bam_s3_folder_path, &results_dir).await?;
    Ok(())
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::{Mutex, Once};

    use async_trait::async_trait;
    use lazy_static::lazy_static;
    use tokio::runtime::Runtime;

    use crate::error::WorkerError;
    use crate::storage::{object_file_name, ObjectStorage};

    use super::{run_job_with_program, WorkerJob};

    lazy_static! {
        static ref RUNTIME: Runtime = Runtime::new().unwrap();
    }
    static INIT: Once = Once::new();

    pub fn setup() {
        INIT.call_once(|| {
            tracing_subscriber::fmt::init();
        });
    }

    /// storage fake: downloads materialize placeholder files, uploads are
    /// recorded instead of sent anywhere
    struct FakeStorage {
        uploads: Mutex<Vec<String>>,
        // reference descriptor as it looked at upload time, i.e. after the
        // rewrite but before the working directory is torn down
        descriptor_seen: Mutex<Option<String>>,
    }

    impl FakeStorage {
        fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                descriptor_seen: Mutex::new(None),
            }
        }

        fn uploads(&self) -> Vec<String> {
            self.uploads.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStorage for FakeStorage {
        async fn download_file(
            &self,
            s3_path: &str,
            dest_dir: &Path,
        ) -> Result<PathBuf, WorkerError> {
            let local_path = dest_dir.join(object_file_name(s3_path)?);
            fs::write(&local_path, s3_path).unwrap();
            Ok(local_path)
        }

        async fn upload_file(&self, s3_path: &str, _local_path: &Path) -> Result<(), WorkerError> {
            self.uploads.lock().unwrap().push(s3_path.to_string());
            Ok(())
        }

        async fn download_folder(
            &self,
            _s3_path: &str,
            dest_dir: &Path,
        ) -> Result<(), WorkerError> {
            fs::write(
                dest_dir.join("sorted-reference.xml"),
                "<Reference><File>/scratch/genome.fa</File></Reference>",
            )
            .unwrap();
            Ok(())
        }

        async fn upload_folder(&self, s3_path: &str, local_dir: &Path) -> Result<(), WorkerError> {
            self.uploads.lock().unwrap().push(s3_path.to_string());
            // local_dir is <wd>/Projects/snvs/results
            let working_dir = local_dir
                .ancestors()
                .nth(3)
                .expect("results dir should sit three levels below the working dir");
            let descriptor = working_dir.join("reference").join("sorted-reference.xml");
            *self.descriptor_seen.lock().unwrap() = fs::read_to_string(descriptor).ok();
            Ok(())
        }
    }

    fn job(base: &Path) -> WorkerJob {
        WorkerJob {
            gatk_s3_path: "s3://tools/gatk.jar".to_string(),
            reference_s3_path: "s3://ref/hg19".to_string(),
            bam1_s3_path: "s3://bucket/S1/tumor.bam".to_string(),
            bam2_s3_path: "s3://bucket/S1/normal.bam".to_string(),
            bam_s3_folder_path: "s3://bucket/out/S1/bam/".to_string(),
            cmd_args: "".to_string(),
            working_dir: base.to_path_buf(),
        }
    }

    // `true` stands in for java: exits zero without reading its arguments
    #[test]
    fn test_run_job_uploads_and_cleans_up() {
        setup();
        let base = tempfile::tempdir().unwrap();
        let storage = FakeStorage::new();
        let job = job(base.path());
        RUNTIME.block_on(async {
            run_job_with_program(&storage, &job, "true").await.unwrap();
        });
        assert_eq!(vec!["s3://bucket/out/S1/bam/".to_string()], storage.uploads());
        // working directory is gone after a successful run
        assert_eq!(0, fs::read_dir(base.path()).unwrap().count());
    }

    // `false` stands in for a crashing caller
    #[test]
    fn test_tool_failure_skips_upload() {
        setup();
        let base = tempfile::tempdir().unwrap();
        let storage = FakeStorage::new();
        let job = job(base.path());
        let result = RUNTIME.block_on(run_job_with_program(&storage, &job, "false"));
        match result {
            Err(WorkerError::ToolFailed { .. }) => {}
            other => panic!("expected tool failure, got: {:?}", other.err()),
        }
        assert!(storage.uploads().is_empty());
        // cleanup also runs on the failure path
        assert_eq!(0, fs::read_dir(base.path()).unwrap().count());
    }

    #[test]
    fn test_reference_descriptor_rewritten_before_upload() {
        setup();
        let base = tempfile::tempdir().unwrap();
        let storage = FakeStorage::new();
        let job = job(base.path());
        RUNTIME.block_on(async {
            run_job_with_program(&storage, &job, "true").await.unwrap();
        });
        let descriptor = storage.descriptor_seen.lock().unwrap().clone().unwrap();
        assert!(!descriptor.contains("/scratch"));
        let base_str = base.path().to_string_lossy();
        assert!(descriptor.contains(&*base_str));
    }
}
