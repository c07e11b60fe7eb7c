use std::process::ExitCode;

use covid_provision::{RunOptions, Settings, run, usage};
use tracing::{Level, error, info, warn};

fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let mut args = std::env::args();
    let program = args.next().unwrap_or_else(|| "covid-provision".into());
    let options = RunOptions::from_args(args);

    if options.help {
        print!("{}", usage(&program));
        return ExitCode::SUCCESS;
    }

    init_tracing(options.debug);
    for arg in &options.unrecognized {
        warn!(arg = %arg, "ignoring unrecognized argument");
    }

    let settings = Settings::from_env();
    let importer = settings.importer();

    match run(&options, &settings, importer) {
        Ok(summary) => {
            if let Some(report) = &summary.provision {
                info!(
                    bucket_created = report.bucket_created,
                    indexes_ok = report.indexes.succeeded,
                    indexes_failed = report.indexes.failed,
                    analytics_ok = report.analytics.succeeded,
                    analytics_failed = report.analytics.failed,
                    "provisioning finished"
                );
            }
            for dataset in &summary.datasets {
                info!(
                    dataset = %dataset.kind,
                    examined = dataset.stats.examined,
                    written = dataset.stats.written,
                    "dataset processed"
                );
            }
            if let Some(report) = &summary.load {
                info!(imported = report.imported.len(), "data loading finished");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{e}");
            error!("run aborted");
            ExitCode::FAILURE
        }
    }
}
