use std::path::Path;

use tokio::process::Command;
use tracing::info;

use crate::error::WorkerError;

/// program the variant caller runs under
pub const TOOL_PROGRAM: &str = "java";

/// FASTA file name inside the staged reference folder
pub const REFERENCE_FASTA: &str = "genome.fa";

/// tool output root, relative to the working directory
pub const RESULTS_SUBDIR: &str = "Projects/snvs/results";

/// name of the VCF the caller writes into the results folder
pub const OUTPUT_VCF: &str = "mutect.vcf";

/// Fully resolved invocation of the variant caller. Arguments are a typed
/// vector, never a shell string, so sample names cannot smuggle in extra
/// tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub arguments: Vec<String>,
}

/// MuTect2 argument vector over absolute staged paths; `cmd_args` is
/// whitespace-split and appended last
pub fn build_mutect_command(
    gatk_jar: &Path,
    reference_dir: &Path,
    tumor_bam: &Path,
    normal_bam: &Path,
    output_vcf: &Path,
    cmd_args: &str,
) -> ToolCommand {
    let mut arguments = vec![
        "-jar".to_string(),
        gatk_jar.to_string_lossy().into_owned(),
        "-T".to_string(),
        "MuTect2".to_string(),
        "-R".to_string(),
        reference_dir.join(REFERENCE_FASTA).to_string_lossy().into_owned(),
        "-I:tumor".to_string(),
        tumor_bam.to_string_lossy().into_owned(),
        "-I:normal".to_string(),
        normal_bam.to_string_lossy().into_owned(),
        "-o".to_string(),
        output_vcf.to_string_lossy().into_owned(),
    ];
    arguments.extend(cmd_args.split_whitespace().map(|arg| arg.to_string()));
    ToolCommand {
        program: TOOL_PROGRAM.to_string(),
        arguments,
    }
}

/// Run the variant caller with the working directory as its cwd and block
/// until it exits. A non-zero exit status is fatal for the run.
pub async fn run_tool(working_dir: &Path, command: &ToolCommand) -> Result<(), WorkerError> {
    info!("running: {} {}", command.program, command.arguments.join(" "));
    let status = Command::new(&command.program)
        .args(&command.arguments)
        .current_dir(working_dir)
        .status()
        .await
        .map_err(|source| WorkerError::ToolLaunch { source })?;
    if !status.success() {
        return Err(WorkerError::ToolFailed { status });
    }
    Ok(())
}
