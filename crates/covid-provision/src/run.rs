use std::path::PathBuf;

use covid_couchbase::{
    AdminClient, BucketLoader, CouchbaseError, Importer, LoadReport, ProvisionReport, Provisioner,
};
use covid_dataset::{
    Config, ConfigError, DataFile, Downloader, TransformStats, Transformer, group_thousands,
    load_config, prepare_directory,
};
use tracing::{debug, error, info};

use crate::options::RunOptions;
use crate::settings::Settings;

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to prepare directory {}: {source}", path.display())]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{} of {total} datasets failed: {}", failed.len(), failed.join(", "))]
    Datasets { failed: Vec<String>, total: usize },

    #[error("couchbase error: {0}")]
    Couchbase(#[from] CouchbaseError),

    #[error("datasets not imported: {}", not_imported.join(", "))]
    Import { not_imported: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub kind: String,
    pub stats: TransformStats,
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub provision: Option<ProvisionReport>,
    pub datasets: Vec<DatasetSummary>,
    pub load: Option<LoadReport>,
}

/// Provision (optional), download and reshape, then load, in that order.
pub fn run<I: Importer>(
    options: &RunOptions,
    settings: &Settings,
    importer: I,
) -> Result<RunSummary, RunError> {
    info!("loading and validating application configuration file");
    debug!(home = %settings.home.display(), "home directory");
    debug!(config = %settings.config_path().display(), "configuration file");
    debug!(raw = %settings.raw_dir().display(), "raw data directory");
    debug!(output = %settings.output_dir().display(), "processed data directory");

    let config: Config = load_config(&settings.config_path())?;
    debug!(
        "{} datasets were configured.",
        group_thousands(config.data_files.len() as u64)
    );
    let couchbase = &config.couchbase;

    let mut summary = RunSummary::default();

    if options.configure {
        let client = admin_client(settings, &config);
        let report = Provisioner::new(&client).provision(
            &settings.resolve(&couchbase.bucket.definition_file),
            &settings.resolve(&couchbase.cbas_datasets_definition_file),
        )?;
        summary.provision = Some(report);
    }

    if options.download {
        summary.datasets = download_datasets(options, settings, &config.data_files)?;
    }

    if options.load {
        info!("loading data files into couchbase bucket");
        let client = admin_client(settings, &config);
        let loader = BucketLoader::new(&client, importer, settings.output_dir());
        let report = loader.load(couchbase, &config.data_files)?;
        if !report.is_success() {
            let mut not_imported = report.failed.clone();
            not_imported.extend(report.skipped.iter().cloned());
            return Err(RunError::Import { not_imported });
        }
        summary.load = Some(report);
    }

    Ok(summary)
}

fn admin_client(settings: &Settings, config: &Config) -> AdminClient {
    let couchbase = &config.couchbase;
    AdminClient::new(
        settings.endpoints(&couchbase.host),
        &couchbase.user,
        &couchbase.password,
        settings.http_timeout,
    )
}

fn download_datasets(
    options: &RunOptions,
    settings: &Settings,
    files: &[DataFile],
) -> Result<Vec<DatasetSummary>, RunError> {
    info!("downloading and processing datasets");

    for dir in [settings.raw_dir(), settings.output_dir()] {
        info!(path = %dir.display(), "cleaning directory");
        prepare_directory(&dir).map_err(|source| RunError::Stage { path: dir.clone(), source })?;
    }

    if files.is_empty() {
        info!("No dataset was found in the configuration.");
        return Ok(Vec::new());
    }
    info!("{} datasets will be loaded.", group_thousands(files.len() as u64));

    let transformer = Transformer::new(
        Downloader::new(settings.download_timeout),
        settings.raw_dir(),
        settings.output_dir(),
    );

    let mut processed = Vec::with_capacity(files.len());
    let mut failed = Vec::new();
    for file in files {
        info!(dataset = %file.kind, "processing dataset");
        match transformer.transform(file, options.load_subregion(file)) {
            Ok(stats) => processed.push(DatasetSummary {
                kind: file.kind.clone(),
                stats,
            }),
            Err(e) => {
                error!(dataset = %file.kind, error = %e, "failed to process dataset");
                failed.push(file.kind.clone());
            }
        }
    }

    if !failed.is_empty() {
        return Err(RunError::Datasets {
            failed,
            total: files.len(),
        });
    }
    Ok(processed)
}
