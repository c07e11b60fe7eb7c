use std::path::Path;

use covid_dataset::load_config;
use tracing::{debug, error, info};

use crate::client::{AdminClient, AdminResponse};
use crate::definitions::{AnalyticsDefinition, BucketDefinition};
use crate::error::CouchbaseError;

const BUCKET_ACCEPTED: u16 = 202;
const STATEMENT_OK: u16 = 200;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

impl Tally {
    fn record(&mut self, ok: bool) {
        if ok {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    pub bucket_created: bool,
    pub indexes: Tally,
    pub analytics: Tally,
}

/// Creates the bucket, its GSI indexes and the analytics datasets from
/// definition files. A failed remote call is logged and the remaining calls
/// still run; only an unreadable definition file is an error.
pub struct Provisioner<'a> {
    client: &'a AdminClient,
}

impl<'a> Provisioner<'a> {
    pub fn new(client: &'a AdminClient) -> Self {
        Self { client }
    }

    pub fn provision(
        &self,
        bucket_definition: &Path,
        analytics_definition: &Path,
    ) -> Result<ProvisionReport, CouchbaseError> {
        info!("creating couchbase bucket");
        let bucket_created = self.create_bucket(bucket_definition)?;
        info!("creating GSI indexes");
        let indexes = self.create_gsi_indexes(bucket_definition)?;
        info!("creating analytics service datasets");
        let analytics = self.create_analytics_objects(analytics_definition)?;

        Ok(ProvisionReport {
            bucket_created,
            indexes,
            analytics,
        })
    }

    pub fn create_bucket(&self, definition_file: &Path) -> Result<bool, CouchbaseError> {
        debug!(file = %definition_file.display(), "bucket definition file");
        let def: BucketDefinition = load_config(definition_file)?;

        debug!(
            bucket = %def.bucket_name,
            bucket_type = %def.bucket_type,
            ram_quota_mb = def.ram_quota_mb,
            replicas = def.replica_number,
            flush_enabled = def.flush_enabled.enabled(),
            "bucket settings"
        );

        let label = format!("bucket \"{}\"", def.bucket_name);
        let result = self.client.create_bucket(&def.form_params());
        Ok(report(&label, "was created", BUCKET_ACCEPTED, result))
    }

    pub fn create_gsi_indexes(&self, definition_file: &Path) -> Result<Tally, CouchbaseError> {
        debug!(file = %definition_file.display(), "bucket definition file");
        let def: BucketDefinition = load_config(definition_file)?;

        let mut tally = Tally::default();
        for index in &def.gsi_definitions {
            info!(index = %index.name, "creating index");
            let label = format!("GSI \"{}\"", index.name);
            let result = self.client.query(&index.definition);
            tally.record(report(&label, "was created", STATEMENT_OK, result));
        }
        Ok(tally)
    }

    pub fn create_analytics_objects(
        &self,
        definition_file: &Path,
    ) -> Result<Tally, CouchbaseError> {
        debug!(file = %definition_file.display(), "analytics dataset definition file");
        let def: AnalyticsDefinition = load_config(definition_file)?;

        let mut tally = Tally::default();
        for statement in &def.prepare_statements {
            let label = format!("preparation statement \"{statement}\"");
            let result = self.client.analytics(statement);
            tally.record(report(&label, "completed", STATEMENT_OK, result));
        }
        for dataset in &def.datasets {
            let label = format!("dataset \"{}\"", dataset.name);
            let result = self.client.analytics(&dataset.definition);
            tally.record(report(&label, "was created", STATEMENT_OK, result));
        }
        for statement in &def.complete_statements {
            let label = format!("completion statement \"{statement}\"");
            let result = self.client.analytics(statement);
            tally.record(report(&label, "completed", STATEMENT_OK, result));
        }
        Ok(tally)
    }
}

fn report(
    label: &str,
    done: &str,
    expected: u16,
    result: Result<AdminResponse, CouchbaseError>,
) -> bool {
    match result {
        Ok(response) if response.status == expected => {
            debug!("{label} {done}");
            true
        }
        Ok(response) => {
            error!(status = response.status, body = %response.body, "{label} failed");
            false
        }
        Err(e) => {
            error!(error = %e, "{label} failed");
            false
        }
    }
}
