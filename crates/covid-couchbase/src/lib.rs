mod client;
mod definitions;
mod error;
mod import;
mod load;
mod provision;

pub use client::{AdminClient, AdminResponse, Endpoints};
pub use definitions::{AnalyticsDefinition, BucketDefinition, FlushFlag, NamedStatement};
pub use error::CouchbaseError;
pub use import::{CbImport, ImportJob, ImportOutput, Importer};
pub use load::{BucketLoader, LoadReport};
pub use provision::{ProvisionReport, Provisioner, Tally};
