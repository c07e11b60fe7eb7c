use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("file \"{}\" is not accessible: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("file \"{}\" is not valid JSON: {source}", path.display())]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("configuration is empty, please check file \"{}\"", path.display())]
    Empty { path: PathBuf },
}

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("http error: {0}")]
    Http(#[from] ureq::Error),

    #[error("download of {url} failed with status {status}")]
    Download { url: String, status: u16 },

    #[error("malformed payload: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("key column \"{0}\" is not present in the payload columns")]
    MissingKeyColumn(String),

    #[error("row {row} has an empty value for key column \"{key}\"")]
    EmptyKey { row: u64, key: String },

    #[error("invalid columns: {0}")]
    InvalidColumns(String),
}
