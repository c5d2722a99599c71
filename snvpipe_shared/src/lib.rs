use serde::{Deserialize, Serialize};

/// Descriptor of one variant-calling stage, produced by the orchestrator.
///
/// `bam_s3_path` and `job_id` are absent on input; the dispatcher fills them
/// in before handing the descriptor back.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    pub sample_id: String,
    pub results_s3_path: String,
    pub working_dir: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bam1_s3_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bam2_s3_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<Vec<String>>,
    pub mutect: MutectParams,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bam_s3_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_id: Option<String>,
}

/// Tool section of the descriptor.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MutectParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gatk_s3_path: Option<String>,
    pub reference_s3_path: String,
    pub job_definition: String,
    pub job_queue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd_args: Option<String>,
}

/// Payload sent to the batch submission endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    pub depends_on: Vec<String>,
    pub container_overrides: ContainerOverrides,
    pub job_definition: String,
    pub job_name: String,
    pub job_queue: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContainerOverrides {
    pub command: Vec<String>,
}

/// Response of the batch submission endpoint.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_id: String,
}
