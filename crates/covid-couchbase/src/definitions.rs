use serde::Deserialize;

/// Bucket definition file: bucket settings plus its GSI index statements.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketDefinition {
    pub bucket_name: String,
    pub bucket_type: String,
    #[serde(rename = "ramQuotaMB")]
    pub ram_quota_mb: u64,
    pub replica_number: u32,
    pub flush_enabled: FlushFlag,
    #[serde(default)]
    pub gsi_definitions: Vec<NamedStatement>,
}

impl BucketDefinition {
    /// Form parameters for the bucket-creation endpoint.
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.bucket_name.clone()),
            ("bucketType", self.bucket_type.clone()),
            ("ramQuotaMB", self.ram_quota_mb.to_string()),
            ("replicaNumber", self.replica_number.to_string()),
            ("flushEnabled", self.flush_enabled.as_form().to_string()),
        ]
    }
}

/// `flushEnabled` may be written as a boolean or as 0/1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FlushFlag {
    Bool(bool),
    Int(u8),
}

impl FlushFlag {
    pub fn enabled(self) -> bool {
        match self {
            FlushFlag::Bool(b) => b,
            FlushFlag::Int(n) => n != 0,
        }
    }

    fn as_form(self) -> &'static str {
        if self.enabled() { "1" } else { "0" }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NamedStatement {
    pub name: String,
    pub definition: String,
}

/// Analytics definition file. The three lists run in order: preparation,
/// datasets, completion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsDefinition {
    #[serde(default)]
    pub prepare_statements: Vec<String>,
    #[serde(default)]
    pub datasets: Vec<NamedStatement>,
    #[serde(default)]
    pub complete_statements: Vec<String>,
}
