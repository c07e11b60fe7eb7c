use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::config::DataFile;
use crate::download::Downloader;
use crate::error::DatasetError;
use crate::group_thousands;

const PROGRESS_EVERY: u64 = 1_000_000;
const TYPE_FIELD: &str = "type";

/// Column-oriented payload as published by the source.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPayload {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Input rows looked at, kept or not.
    pub examined: u64,
    pub written: u64,
}

/// Pair each column with its positional value. Null and missing values
/// become `0`; the `type` tag is appended last.
pub fn build_row(columns: &[String], values: Vec<Value>, kind: &str) -> Map<String, Value> {
    let mut values = values.into_iter();
    let mut row = Map::with_capacity(columns.len() + 1);
    for column in columns {
        let value = match values.next() {
            None | Some(Value::Null) => Value::from(0),
            Some(v) => v,
        };
        row.insert(column.clone(), value);
    }
    row.insert(TYPE_FIELD.to_string(), Value::String(kind.to_string()));
    row
}

/// An underscore in a key marks a sub-region, e.g. `US_CA` under `US`.
pub fn is_subregion(key: &Value) -> bool {
    match key {
        Value::String(s) => s.contains('_'),
        other => other.to_string().contains('_'),
    }
}

fn validate_columns(columns: &[String], key: &str) -> Result<(), DatasetError> {
    if !columns.iter().any(|c| c == key) {
        return Err(DatasetError::MissingKeyColumn(key.to_string()));
    }
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if column == TYPE_FIELD {
            return Err(DatasetError::InvalidColumns(format!(
                "column \"{TYPE_FIELD}\" is reserved for the document type"
            )));
        }
        if !seen.insert(column.as_str()) {
            return Err(DatasetError::InvalidColumns(format!(
                "duplicate column \"{column}\""
            )));
        }
    }
    Ok(())
}

/// Reshape `payload` into newline-delimited JSON on `out`, dropping
/// sub-region rows unless `load_subregion` is set.
pub fn write_rows<W: Write>(
    payload: RawPayload,
    file: &DataFile,
    load_subregion: bool,
    mut out: W,
) -> Result<TransformStats, DatasetError> {
    validate_columns(&payload.columns, &file.key)?;

    let mut stats = TransformStats::default();
    for values in payload.data {
        stats.examined += 1;
        let row = build_row(&payload.columns, values, &file.kind);

        let Some(key) = row.get(&file.key) else {
            return Err(DatasetError::MissingKeyColumn(file.key.clone()));
        };
        if matches!(key, Value::String(s) if s.is_empty()) {
            return Err(DatasetError::EmptyKey {
                row: stats.examined,
                key: file.key.clone(),
            });
        }

        if load_subregion || !is_subregion(key) {
            serde_json::to_writer(&mut out, &row)?;
            out.write_all(b"\n")?;
            stats.written += 1;
        }

        if stats.examined % PROGRESS_EVERY == 0 {
            debug!(
                dataset = %file.kind,
                "{} records were processed.",
                group_thousands(stats.examined)
            );
        }
    }
    out.flush()?;

    info!(
        dataset = %file.kind,
        written = stats.written,
        "{} records were processed.",
        group_thousands(stats.examined)
    );
    Ok(stats)
}

/// Downloads a dataset into the raw area and writes its reshaped rows into
/// the output area, both as `<type>.json`.
pub struct Transformer {
    downloader: Downloader,
    raw_dir: PathBuf,
    output_dir: PathBuf,
}

impl Transformer {
    pub fn new(
        downloader: Downloader,
        raw_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            downloader,
            raw_dir: raw_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    pub fn raw_path(&self, file: &DataFile) -> PathBuf {
        self.raw_dir.join(file.file_name())
    }

    pub fn output_path(&self, file: &DataFile) -> PathBuf {
        self.output_dir.join(file.file_name())
    }

    pub fn transform(
        &self,
        file: &DataFile,
        load_subregion: bool,
    ) -> Result<TransformStats, DatasetError> {
        let raw = self.raw_path(file);
        debug!(raw = %raw.display(), output = %self.output_path(file).display(), "dataset paths");

        let bytes = self.downloader.fetch_to(&file.url, &raw)?;
        debug!(dataset = %file.kind, bytes, "download complete");

        self.reshape(file, &raw, load_subregion)
    }

    fn reshape(
        &self,
        file: &DataFile,
        raw: &Path,
        load_subregion: bool,
    ) -> Result<TransformStats, DatasetError> {
        debug!(file = %raw.display(), "reading raw payload");
        let payload: RawPayload = serde_json::from_reader(BufReader::new(File::open(raw)?))?;
        debug!(dataset = %file.kind, columns = ?payload.columns, "found columns");

        let out = BufWriter::new(File::create(self.output_path(file))?);
        write_rows(payload, file, load_subregion, out)
    }
}
