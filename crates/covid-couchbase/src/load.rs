use std::path::PathBuf;

use covid_dataset::{CouchbaseConfig, DataFile};
use tracing::{debug, error, info, warn};

use crate::client::AdminClient;
use crate::error::CouchbaseError;
use crate::import::{ImportJob, ImportOutput, Importer};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub imported: Vec<String>,
    pub failed: Vec<String>,
    /// Datasets with no transformed file on disk.
    pub skipped: Vec<String>,
}

impl LoadReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && self.skipped.is_empty()
    }
}

/// Flushes the target bucket and bulk-imports every transformed dataset.
pub struct BucketLoader<'a, I: Importer> {
    client: &'a AdminClient,
    importer: I,
    output_dir: PathBuf,
}

impl<'a, I: Importer> BucketLoader<'a, I> {
    pub fn new(client: &'a AdminClient, importer: I, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            importer,
            output_dir: output_dir.into(),
        }
    }

    pub fn importer(&self) -> &I {
        &self.importer
    }

    /// Fails before any network call when the connection settings are
    /// incomplete, and before any import when the bucket is missing or
    /// cannot be flushed.
    pub fn load(
        &self,
        couchbase: &CouchbaseConfig,
        files: &[DataFile],
    ) -> Result<LoadReport, CouchbaseError> {
        if !couchbase.is_complete() {
            return Err(CouchbaseError::IncompleteConnection);
        }
        let bucket = couchbase.bucket.name.as_str();
        debug!(host = %couchbase.host, bucket, user = %couchbase.user, "loading data files");

        self.check_bucket(bucket)?;
        self.flush_bucket(bucket)?;

        let mut report = LoadReport::default();
        for file in files {
            let path = std::path::absolute(self.output_dir.join(file.file_name()))?;
            if !path.is_file() {
                warn!(dataset = %file.kind, file = %path.display(), "transformed file not found, skipping");
                report.skipped.push(file.kind.clone());
                continue;
            }

            info!(dataset = %file.kind, file = %path.display(), "loading dataset");
            let job = ImportJob {
                cluster: self.client.endpoints().admin.clone(),
                user: couchbase.user.clone(),
                password: couchbase.password.clone(),
                file: path,
                bucket: bucket.to_string(),
                key_generator: file.key_generator(),
            };

            match self.importer.import(&job) {
                Ok(output) => {
                    surface(&output);
                    if output.success() {
                        report.imported.push(file.kind.clone());
                    } else {
                        error!(dataset = %file.kind, exit_code = ?output.exit_code, "import failed");
                        report.failed.push(file.kind.clone());
                    }
                }
                Err(e) => {
                    if let CouchbaseError::ImportTimeout { output, .. } = &e {
                        surface(output);
                    }
                    error!(dataset = %file.kind, error = %e, "import failed");
                    report.failed.push(file.kind.clone());
                }
            }
        }
        Ok(report)
    }

    fn check_bucket(&self, bucket: &str) -> Result<(), CouchbaseError> {
        let response = self.client.bucket_info(bucket)?;
        if response.status != 200 {
            return Err(CouchbaseError::BucketNotFound {
                bucket: bucket.to_string(),
                status: response.status,
                body: response.body,
            });
        }
        debug!(bucket, "bucket found");
        Ok(())
    }

    fn flush_bucket(&self, bucket: &str) -> Result<(), CouchbaseError> {
        let response = self.client.flush_bucket(bucket)?;
        if response.status != 200 {
            return Err(CouchbaseError::FlushFailed {
                bucket: bucket.to_string(),
                status: response.status,
                body: response.body,
            });
        }
        debug!(bucket, "bucket flushed");
        Ok(())
    }
}

fn surface(output: &ImportOutput) {
    if !output.stdout.trim().is_empty() {
        info!("{}", output.stdout.trim_end());
    }
    if !output.stderr.trim().is_empty() {
        warn!("{}", output.stderr.trim_end());
    }
}
