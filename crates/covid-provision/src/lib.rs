pub mod options;
pub mod run;
pub mod settings;

pub use options::{RunOptions, usage};
pub use run::{DatasetSummary, RunError, RunSummary, run};
pub use settings::Settings;
