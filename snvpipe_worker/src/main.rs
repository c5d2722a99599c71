use std::path::PathBuf;
use std::process;

use structopt::StructOpt;
use tracing::{error, info};

use snvpipe_lib::{run_job, AwsCliStorage, WorkerJob};

/// Stages inputs, runs MuTect2 and uploads the results of one batch job.
#[derive(StructOpt, Debug)]
#[structopt(name = "snvpipe-worker")]
struct Opt {
    /// S3 path of the GATK jar
    #[structopt(long = "gatk_s3_path")]
    gatk_s3_path: String,

    /// S3 path of the reference folder
    #[structopt(long = "reference_s3_path")]
    reference_s3_path: String,

    /// S3 path of the tumor BAM
    #[structopt(long = "bam1_s3_path")]
    bam1_s3_path: String,

    /// S3 path of the normal BAM
    #[structopt(long = "bam2_s3_path")]
    bam2_s3_path: String,

    /// S3 folder the results are uploaded to
    #[structopt(long = "bam_s3_folder_path")]
    bam_s3_folder_path: String,

    /// extra arguments passed through to MuTect2
    #[structopt(long = "cmd_args", default_value = "")]
    cmd_args: String,

    /// scratch directory the run stages data under
    #[structopt(long = "working_dir", default_value = "/scratch", parse(from_os_str))]
    working_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let opt = Opt::from_args();

    let job = WorkerJob {
        gatk_s3_path: opt.gatk_s3_path,
        reference_s3_path: opt.reference_s3_path,
        bam1_s3_path: opt.bam1_s3_path,
        bam2_s3_path: opt.bam2_s3_path,
        bam_s3_folder_path: opt.bam_s3_folder_path,
        cmd_args: opt.cmd_args,
        working_dir: opt.working_dir,
    };

    let storage = AwsCliStorage::new();
    match run_job(&storage, &job).await {
        Ok(()) => info!("completed"),
        Err(err) => {
            error!("job failed: {}", err);
            process::exit(1);
        }
    }
}
