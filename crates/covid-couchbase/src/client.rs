use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use tracing::debug;
use ureq::http::Response;
use ureq::{Agent, Body};

use crate::error::CouchbaseError;

pub const ADMIN_PORT: u16 = 8091;
pub const QUERY_PORT: u16 = 8093;
pub const ANALYTICS_PORT: u16 = 8095;

/// Base URLs of the cluster services the provisioner talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub admin: String,
    pub query: String,
    pub analytics: String,
}

impl Endpoints {
    /// Default service ports on `host`.
    pub fn for_host(host: &str) -> Self {
        Self {
            admin: format!("http://{host}:{ADMIN_PORT}"),
            query: format!("http://{host}:{QUERY_PORT}"),
            analytics: format!("http://{host}:{ANALYTICS_PORT}"),
        }
    }

    /// Every service behind one base URL, e.g. a proxy.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            admin: base.clone(),
            query: base.clone(),
            analytics: base,
        }
    }

    pub fn bucket(&self, bucket: &str) -> String {
        format!("{}/pools/default/buckets/{bucket}", self.admin)
    }

    pub fn buckets(&self) -> String {
        format!("{}/pools/default/buckets/", self.admin)
    }

    pub fn flush(&self, bucket: &str) -> String {
        format!("{}/controller/doFlush", self.bucket(bucket))
    }

    pub fn query_service(&self) -> String {
        format!("{}/query/service", self.query)
    }

    pub fn analytics_service(&self) -> String {
        format!("{}/analytics/service", self.analytics)
    }
}

/// Status and body of an admin call. Non-2xx statuses are not errors here;
/// callers decide what counts as success.
#[derive(Debug, Clone)]
pub struct AdminResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking client for the cluster REST APIs, authenticated with basic auth.
pub struct AdminClient {
    agent: Agent,
    endpoints: Endpoints,
    authorization: String,
}

impl AdminClient {
    pub fn new(endpoints: Endpoints, user: &str, password: &str, timeout: Duration) -> Self {
        let config = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build();
        let credentials = STANDARD.encode(format!("{user}:{password}"));
        Self {
            agent: Agent::new_with_config(config),
            endpoints,
            authorization: format!("Basic {credentials}"),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn bucket_info(&self, bucket: &str) -> Result<AdminResponse, CouchbaseError> {
        let url = self.endpoints.bucket(bucket);
        debug!(url, "checking bucket");
        let response = self
            .agent
            .get(&url)
            .header("Authorization", self.authorization.as_str())
            .call()?;
        read(response)
    }

    pub fn create_bucket(&self, params: &[(&str, String)]) -> Result<AdminResponse, CouchbaseError> {
        let url = self.endpoints.buckets();
        debug!(url, "creating bucket");
        let response = self
            .agent
            .post(&url)
            .header("Authorization", self.authorization.as_str())
            .send_form(params.iter().map(|(k, v)| (*k, v.as_str())))?;
        read(response)
    }

    pub fn flush_bucket(&self, bucket: &str) -> Result<AdminResponse, CouchbaseError> {
        let url = self.endpoints.flush(bucket);
        debug!(url, "flushing bucket");
        let response = self
            .agent
            .post(&url)
            .header("Authorization", self.authorization.as_str())
            .send_empty()?;
        read(response)
    }

    /// Run a N1QL statement against the query service.
    pub fn query(&self, statement: &str) -> Result<AdminResponse, CouchbaseError> {
        self.statement(&self.endpoints.query_service(), statement)
    }

    /// Run a statement against the analytics service.
    pub fn analytics(&self, statement: &str) -> Result<AdminResponse, CouchbaseError> {
        self.statement(&self.endpoints.analytics_service(), statement)
    }

    fn statement(&self, url: &str, statement: &str) -> Result<AdminResponse, CouchbaseError> {
        debug!(url, statement, "executing statement");
        let response = self
            .agent
            .post(url)
            .header("Authorization", self.authorization.as_str())
            .send_form([("statement", statement)])?;
        read(response)
    }
}

fn read(mut response: Response<Body>) -> Result<AdminResponse, CouchbaseError> {
    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string()?;
    Ok(AdminResponse { status, body })
}
