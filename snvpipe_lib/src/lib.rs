pub mod error;
pub mod mutect;
pub mod runner;
pub mod staging;
pub mod storage;
pub mod workdir;

pub use error::WorkerError;
pub use runner::{run_job, WorkerJob};
pub use storage::{AwsCliStorage, ObjectStorage};
