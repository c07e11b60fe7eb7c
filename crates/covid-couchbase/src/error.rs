use std::path::PathBuf;
use std::time::Duration;

use covid_dataset::ConfigError;

use crate::import::ImportOutput;

#[derive(Debug, thiserror::Error)]
pub enum CouchbaseError {
    #[error("definition error: {0}")]
    Definition(#[from] ConfigError),

    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("couchbase connection information is incomplete, please check the configuration")]
    IncompleteConnection,

    #[error("bucket \"{bucket}\" does not exist (status {status}): {body}")]
    BucketNotFound {
        bucket: String,
        status: u16,
        body: String,
    },

    #[error("failed to flush bucket \"{bucket}\" (status {status}): {body}")]
    FlushFailed {
        bucket: String,
        status: u16,
        body: String,
    },

    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        source: std::io::Error,
    },

    #[error("import of {} timed out after {timeout:?}", file.display())]
    ImportTimeout {
        file: PathBuf,
        timeout: Duration,
        /// Whatever the process printed before it was killed.
        output: ImportOutput,
    },
}
