use std::io::Read;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::CouchbaseError;

/// Everything the bulk importer needs to load one NDJSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportJob {
    /// Cluster admin URL, e.g. `http://host:8091`.
    pub cluster: String,
    pub user: String,
    pub password: String,
    pub file: PathBuf,
    pub bucket: String,
    pub key_generator: String,
}

#[derive(Debug, Clone, Default)]
pub struct ImportOutput {
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ImportOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Loads a transformed file into a bucket.
pub trait Importer {
    fn import(&self, job: &ImportJob) -> Result<ImportOutput, CouchbaseError>;
}

impl<T: Importer + ?Sized> Importer for &T {
    fn import(&self, job: &ImportJob) -> Result<ImportOutput, CouchbaseError> {
        (**self).import(job)
    }
}

/// Runs the `cbimport` tool shipped with Couchbase Server.
pub struct CbImport {
    program: PathBuf,
    threads: u32,
    timeout: Duration,
}

impl CbImport {
    pub const DEFAULT_PROGRAM: &'static str = "/opt/couchbase/bin/cbimport";

    pub fn new(program: impl Into<PathBuf>, threads: u32, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            threads,
            timeout,
        }
    }

    pub fn args(&self, job: &ImportJob) -> Vec<String> {
        vec![
            "json".into(),
            "--format".into(),
            "lines".into(),
            "-c".into(),
            job.cluster.clone(),
            "-u".into(),
            job.user.clone(),
            "-p".into(),
            job.password.clone(),
            "-d".into(),
            format!("file://{}", job.file.display()),
            "-b".into(),
            job.bucket.clone(),
            "-g".into(),
            job.key_generator.clone(),
            "-t".into(),
            self.threads.to_string(),
        ]
    }

    /// Command line for logging, with the password masked.
    pub fn display_command(&self, job: &ImportJob) -> String {
        let mut parts = vec![self.program.display().to_string()];
        let mut mask_next = false;
        for arg in self.args(job) {
            if mask_next {
                parts.push("****".into());
            } else {
                parts.push(arg.clone());
            }
            mask_next = arg == "-p";
        }
        parts.join(" ")
    }
}

impl Importer for CbImport {
    fn import(&self, job: &ImportJob) -> Result<ImportOutput, CouchbaseError> {
        debug!(command = %self.display_command(job), "running cbimport");
        let mut child = Command::new(&self.program)
            .args(self.args(job))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| CouchbaseError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Drain pipes while polling; a full pipe would stall the child.
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let start = Instant::now();
        let status = loop {
            match child.try_wait()? {
                Some(status) => break status,
                None if start.elapsed() >= self.timeout => {
                    let _ = child.kill();
                    let status = child.wait().ok();
                    return Err(CouchbaseError::ImportTimeout {
                        file: job.file.clone(),
                        timeout: self.timeout,
                        output: ImportOutput {
                            exit_code: status.and_then(|s| s.code()),
                            stdout: collect(stdout),
                            stderr: collect(stderr),
                        },
                    });
                }
                None => thread::sleep(Duration::from_millis(50)),
            }
        };

        Ok(ImportOutput {
            exit_code: status.code(),
            stdout: collect(stdout),
            stderr: collect(stderr),
        })
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn collect(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}
