use covid_dataset::DataFile;

/// Flags parsed from bare command-line words. Order does not matter and
/// unrecognized words are collected rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub debug: bool,
    pub force_load_subregions: bool,
    pub download: bool,
    pub load: bool,
    pub configure: bool,
    pub help: bool,
    pub unrecognized: Vec<String>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            debug: false,
            force_load_subregions: false,
            download: true,
            load: true,
            configure: false,
            help: false,
            unrecognized: Vec::new(),
        }
    }
}

impl RunOptions {
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for arg in args {
            match arg.as_ref() {
                "debug" => options.debug = true,
                "force_load_subregions" => options.force_load_subregions = true,
                "skip_download" => options.download = false,
                "skip_load_couchbase" => options.load = false,
                "configure_couchbase" => options.configure = true,
                "help" => options.help = true,
                other => options.unrecognized.push(other.to_string()),
            }
        }
        options
    }

    /// Whether sub-region rows of `file` are kept on this run.
    pub fn load_subregion(&self, file: &DataFile) -> bool {
        self.force_load_subregions || file.load_subregion
    }
}

pub fn usage(program: &str) -> String {
    format!(
        "\
{program} [debug] [force_load_subregions] [skip_download] [skip_load_couchbase] [configure_couchbase] [help]
Options:
   debug                  By default debug is off. Include \"debug\" to enable debug level
                          output.
   force_load_subregions  By default config.json controls whether subregion level data is
                          loaded. Include \"force_load_subregions\" to override config.json
                          and load subregion level data for every dataset.
   skip_download          By default the latest data is always downloaded. Include
                          \"skip_download\" to skip the download step.
   skip_load_couchbase    By default the bucket is always flushed and reloaded from the
                          downloaded files. Include \"skip_load_couchbase\" to skip loading.
   configure_couchbase    By default the bucket and analytics datasets are assumed to
                          exist. Include \"configure_couchbase\" to create the bucket, GSI
                          indexes and analytics service datasets.
   help                   Print this message and exit.
"
    )
}
