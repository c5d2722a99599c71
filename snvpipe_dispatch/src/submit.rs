use anyhow::{anyhow, Context};
use async_trait::async_trait;
use tracing::info;

use snvpipe_shared::{ContainerOverrides, JobDescriptor, SubmitJobRequest, SubmitJobResponse};

/// token the job name is derived from
pub const TOOL_NAME: &str = "mutect";

/// Capability to submit one batch job and hand back its assigned id. The
/// request is synchronous; the caller needs the id before returning.
#[async_trait]
pub trait BatchSubmitter: Send + Sync {
    async fn submit(&self, request: &SubmitJobRequest) -> anyhow::Result<SubmitJobResponse>;
}

/// Submitter that POSTs the payload to the managed batch submission endpoint.
pub struct HttpBatchSubmitter {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBatchSubmitter {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
        }
    }
}

#[async_trait]
impl BatchSubmitter for HttpBatchSubmitter {
    async fn submit(&self, request: &SubmitJobRequest) -> anyhow::Result<SubmitJobResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .with_context(|| format!("could not reach {}", self.endpoint))?;
        if !response.status().is_success() {
            return Err(anyhow!(
                "submission endpoint returned {}",
                response.status()
            ));
        }
        response
            .json()
            .await
            .context("submission response carried no job id")
    }
}

/// S3 folder the worker uploads this sample's results to
pub fn bam_s3_path(results_s3_path: &str, sample_id: &str) -> String {
    [results_s3_path, sample_id, "bam/"].join("/")
}

/// batch job name; uniqueness across resubmissions is the batch service's
/// concern, not ours
pub fn job_name(sample_id: &str) -> String {
    [TOOL_NAME, sample_id].join("-")
}

/// Worker command line. Flag order is the contract with the worker binary:
/// the bam folder, reference and working dir pairs always come first, in
/// that order; the optional pairs are appended after them and `--cmd_args`
/// goes last.
pub fn build_command(descriptor: &JobDescriptor, bam_s3_path: &str) -> Vec<String> {
    let mut command = vec![
        "--bam_s3_folder_path".to_string(),
        bam_s3_path.to_string(),
        "--reference_s3_path".to_string(),
        descriptor.mutect.reference_s3_path.clone(),
        "--working_dir".to_string(),
        descriptor.working_dir.clone(),
    ];
    if let Some(gatk_s3_path) = &descriptor.mutect.gatk_s3_path {
        command.push("--gatk_s3_path".to_string());
        command.push(gatk_s3_path.clone());
    }
    if let Some(bam1_s3_path) = &descriptor.bam1_s3_path {
        command.push("--bam1_s3_path".to_string());
        command.push(bam1_s3_path.clone());
    }
    if let Some(bam2_s3_path) = &descriptor.bam2_s3_path {
        command.push("--bam2_s3_path".to_string());
        command.push(bam2_s3_path.clone());
    }
    if let Some(cmd_args) = &descriptor.mutect.cmd_args {
        command.push("--cmd_args".to_string());
        command.push(cmd_args.clone());
    }
    command
}

/// Submit one pipeline stage and return the descriptor augmented with the
/// computed bam path and the assigned job id. Failures bubble up unchanged;
/// there are no retries and no partial results.
pub async fn dispatch_job<S>(
    submitter: &S,
    mut descriptor: JobDescriptor,
) -> anyhow::Result<JobDescriptor>
where
    S: BatchSubmitter + ?Sized,
{
    let bam_path = bam_s3_path(&descriptor.results_s3_path, &descriptor.sample_id);
    let request = SubmitJobRequest {
        depends_on: descriptor.depends_on.clone().unwrap_or_default(),
        container_overrides: ContainerOverrides {
            command: build_command(&descriptor, &bam_path),
        },
        job_definition: descriptor.mutect.job_definition.clone(),
        job_name: job_name(&descriptor.sample_id),
        job_queue: descriptor.mutect.job_queue.clone(),
    };
    info!("submitting {} to {}", request.job_name, request.job_queue);
    let response = submitter.submit(&request).await?;
    descriptor.bam_s3_path = Some(bam_path);
    descriptor.job_id = Some(response.job_id);
    Ok(descriptor)
}
