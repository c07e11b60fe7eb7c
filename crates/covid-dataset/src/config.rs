use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;

/// Top-level `config.json`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub couchbase: CouchbaseConfig,
    #[serde(default)]
    pub data_files: Vec<DataFile>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouchbaseConfig {
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub bucket: BucketRef,
    pub cbas_datasets_definition_file: PathBuf,
}

impl CouchbaseConfig {
    /// True when every field needed to talk to the cluster is non-empty.
    pub fn is_complete(&self) -> bool {
        !self.host.is_empty()
            && !self.bucket.name.is_empty()
            && !self.user.is_empty()
            && !self.password.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketRef {
    #[serde(default)]
    pub name: String,
    pub definition_file: PathBuf,
}

/// One dataset to download, reshape and load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    /// Document type tag, also the output file stem.
    #[serde(rename = "type")]
    pub kind: String,
    pub url: String,
    /// Column whose value becomes the document key.
    pub key: String,
    #[serde(default)]
    pub load_subregion: bool,
}

impl DataFile {
    pub fn file_name(&self) -> String {
        format!("{}.json", self.kind)
    }

    /// cbimport key generator, e.g. `%type%::%key%`.
    pub fn key_generator(&self) -> String {
        format!("%type%::%{}%", self.key)
    }
}

/// Read a JSON document from disk, rejecting a missing file or an empty
/// top-level object or array.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let value: serde_json::Value =
        serde_json::from_str(&data).map_err(|source| ConfigError::Malformed {
            path: path.to_path_buf(),
            source,
        })?;

    let empty = match &value {
        serde_json::Value::Object(map) => map.is_empty(),
        serde_json::Value::Array(items) => items.is_empty(),
        serde_json::Value::Null => true,
        _ => false,
    };
    if empty {
        return Err(ConfigError::Empty {
            path: path.to_path_buf(),
        });
    }

    serde_json::from_value(value).map_err(|source| ConfigError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
