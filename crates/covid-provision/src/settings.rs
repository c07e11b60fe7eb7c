use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use covid_couchbase::{CbImport, Endpoints};

const CONFIG_FILE: &str = "config.json";
const RAW_DIR: &str = "raw";
const OUTPUT_DIR: &str = "output";

/// Process-level settings read from the environment.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Holds `config.json`, `raw/` and `output/`.
    pub home: PathBuf,
    pub http_timeout: Duration,
    pub download_timeout: Duration,
    pub import_timeout: Duration,
    pub cbimport: PathBuf,
    pub cbimport_threads: u32,
    /// Route every cluster service through one base URL instead of the
    /// default ports on the configured host.
    pub cluster_url: Option<String>,
}

impl Settings {
    pub fn with_home(home: impl Into<PathBuf>) -> Self {
        Self {
            home: home.into(),
            http_timeout: Duration::from_secs(60),
            download_timeout: Duration::from_secs(1800),
            import_timeout: Duration::from_secs(3600),
            cbimport: PathBuf::from(CbImport::DEFAULT_PROGRAM),
            cbimport_threads: 4,
            cluster_url: None,
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let home = lookup("COVID_PROVISION_HOME")
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        let defaults = Self::with_home(home);

        let secs = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default)
        };

        Self {
            http_timeout: secs("COVID_PROVISION_HTTP_TIMEOUT_SECS", defaults.http_timeout),
            download_timeout: secs(
                "COVID_PROVISION_DOWNLOAD_TIMEOUT_SECS",
                defaults.download_timeout,
            ),
            import_timeout: secs("COVID_PROVISION_IMPORT_TIMEOUT_SECS", defaults.import_timeout),
            cbimport: lookup("CBIMPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| defaults.cbimport.clone()),
            cbimport_threads: lookup("CBIMPORT_THREADS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.cbimport_threads),
            cluster_url: lookup("COVID_PROVISION_CLUSTER_URL").filter(|s| !s.is_empty()),
            ..defaults
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.home.join(CONFIG_FILE)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.home.join(RAW_DIR)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.home.join(OUTPUT_DIR)
    }

    /// Relative paths from the configuration resolve against `home`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.home.join(path)
        }
    }

    pub fn endpoints(&self, host: &str) -> Endpoints {
        match &self.cluster_url {
            Some(url) => Endpoints::single(url.trim_end_matches('/')),
            None => Endpoints::for_host(host),
        }
    }

    pub fn importer(&self) -> CbImport {
        CbImport::new(&self.cbimport, self.cbimport_threads, self.import_timeout)
    }
}
