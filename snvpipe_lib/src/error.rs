use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Failures of one worker run. Transfer and tool errors carry the path or
/// status they failed with; nothing is retried at this level.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("could not create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("object path {s3_path} has no file name component")]
    BadObjectPath { s3_path: String },

    #[error("could not launch transfer for {s3_path}: {source}")]
    TransferLaunch { s3_path: String, source: io::Error },

    #[error("transfer of {s3_path} failed with {status}")]
    TransferFailed { s3_path: String, status: ExitStatus },

    #[error("could not read reference descriptor {path}: {source}")]
    ReadDescriptor { path: PathBuf, source: io::Error },

    #[error("could not write reference descriptor {path}: {source}")]
    WriteDescriptor { path: PathBuf, source: io::Error },

    #[error("could not launch variant caller: {source}")]
    ToolLaunch { source: io::Error },

    #[error("variant caller exited with {status}")]
    ToolFailed { status: ExitStatus },

    #[error("could not remove working directory {path}: {source}")]
    RemoveWorkingDir { path: PathBuf, source: io::Error },
}
