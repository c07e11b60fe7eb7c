mod config;
mod download;
mod error;
mod stage;
mod transform;

pub use config::{BucketRef, Config, CouchbaseConfig, DataFile, load_config};
pub use download::Downloader;
pub use error::{ConfigError, DatasetError};
pub use stage::prepare_directory;
pub use transform::{
    RawPayload, TransformStats, Transformer, build_row, is_subregion, write_rows,
};

/// Format a count with thousands separators, e.g. `1,000,000`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
