use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::DatasetError;

/// Blocking HTTP fetcher for dataset payloads. Redirects are followed.
pub struct Downloader {
    agent: Agent,
}

impl Downloader {
    pub fn new(timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        Self {
            agent: Agent::new_with_config(config),
        }
    }

    /// Stream the body at `url` into `dest` verbatim. Returns bytes written.
    pub fn fetch_to(&self, url: &str, dest: &Path) -> Result<u64, DatasetError> {
        debug!(url, dest = %dest.display(), "downloading");
        let mut response = self.agent.get(url).call()?;

        let status = response.status();
        if !status.is_success() {
            return Err(DatasetError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mut writer = BufWriter::new(File::create(dest)?);
        let bytes = io::copy(&mut response.body_mut().as_reader(), &mut writer)?;
        writer.flush()?;
        Ok(bytes)
    }
}
