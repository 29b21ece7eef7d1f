mod wire;

pub use wire::{
    ColumnMetadata, ExecutionDetail, ExecutionRequest, ExecutionResponse, LoginRequest,
    LoginResponse, PagedResponse, ProfileJob, TableMetadata,
};

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{MaskDriftError, Result};

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// The engine operations the collector, job runner, and orchestrator consume.
/// `EngineClient` is the HTTP implementation; tests substitute a scripted mock.
#[async_trait]
pub trait EngineApi: Send + Sync {
    async fn profile_job(&self, job_id: i64) -> Result<ProfileJob>;
    async fn table_metadata(&self, ruleset_id: i64, page_size: u32) -> Result<Vec<TableMetadata>>;
    async fn column_metadata(
        &self,
        table_metadata_id: i64,
        page_size: u32,
    ) -> Result<Vec<ColumnMetadata>>;
    async fn refresh_ruleset(&self, ruleset_id: i64) -> Result<()>;
    async fn submit_execution(&self, job_id: i64) -> Result<i64>;
    async fn execution(&self, execution_id: i64) -> Result<ExecutionDetail>;

    /// Engine host, for log lines and the mismatch report header.
    fn host(&self) -> &str;
}

/// Authenticated handle to one compliance engine. Created once per run and
/// shared by reference; the token is read-only after login.
pub struct EngineClient {
    http: reqwest::Client,
    base_url: String,
    host: String,
    auth: String,
}

impl EngineClient {
    /// Probe the insecure port to pick the endpoint family, then log in and
    /// capture the `Authorization` token. Non-200 on login is fatal.
    pub async fn connect(config: &Config) -> Result<Self> {
        let base_url = resolve_base_url(&config.host).await;

        let mut builder = reqwest::Client::builder().timeout(REQUEST_TIMEOUT);
        if !config.verify_tls {
            warn!("TLS certificate verification disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let http = builder.build()?;

        info!("Authenticating against {}", base_url);
        let response = http
            .post(format!("{base_url}/login"))
            .json(&LoginRequest::new(&config.username, &config.password))
            .send()
            .await
            .map_err(|e| MaskDriftError::AuthenticationFailed {
                host: config.host.clone(),
                reason: e.to_string(),
            })?;

        if response.status() != StatusCode::OK {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MaskDriftError::AuthenticationFailed {
                host: config.host.clone(),
                reason: format!("status code {status}: {body}"),
            });
        }

        let login: LoginResponse = response.json().await?;
        debug!("Authentication succeeded");

        Ok(Self {
            http,
            base_url,
            host: config.host.clone(),
            auth: login.authorization,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send one request with the session headers attached and normalize any
    /// non-200 response into an `Api` failure. The whole run aborts on the
    /// first such failure; there is no retry tier below this.
    async fn execute(&self, operation: &str, request: RequestBuilder) -> Result<Response> {
        let response = request
            .header("Authorization", &self.auth)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(MaskDriftError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        debug!("Request in operation '{}' succeeded", operation);
        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &str,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let request = self.http.get(self.url(path)).query(query);
        let response = self.execute(operation, request).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl EngineApi for EngineClient {
    async fn profile_job(&self, job_id: i64) -> Result<ProfileJob> {
        self.get_json("get profile job details", &format!("/profile-jobs/{job_id}"), &[])
            .await
    }

    async fn table_metadata(&self, ruleset_id: i64, page_size: u32) -> Result<Vec<TableMetadata>> {
        let page: PagedResponse<TableMetadata> = self
            .get_json(
                "extract table-metadata",
                "/table-metadata",
                &[
                    ("page_size", page_size.to_string()),
                    ("ruleset_id", ruleset_id.to_string()),
                ],
            )
            .await?;
        Ok(page.response_list)
    }

    async fn column_metadata(
        &self,
        table_metadata_id: i64,
        page_size: u32,
    ) -> Result<Vec<ColumnMetadata>> {
        let page: PagedResponse<ColumnMetadata> = self
            .get_json(
                "extract column-metadata",
                "/column-metadata",
                &[
                    ("page_size", page_size.to_string()),
                    ("table_metadata_id", table_metadata_id.to_string()),
                ],
            )
            .await?;
        Ok(page.response_list)
    }

    async fn refresh_ruleset(&self, ruleset_id: i64) -> Result<()> {
        let request = self
            .http
            .put(self.url(&format!("/database-rulesets/{ruleset_id}/refresh")));
        self.execute("refresh ruleset", request).await?;
        Ok(())
    }

    async fn submit_execution(&self, job_id: i64) -> Result<i64> {
        let request = self
            .http
            .post(self.url("/executions"))
            .json(&ExecutionRequest { job_id });
        let response = self.execute("submit execution", request).await?;
        let submitted: ExecutionResponse = response.json().await?;
        Ok(submitted.execution_id)
    }

    async fn execution(&self, execution_id: i64) -> Result<ExecutionDetail> {
        self.get_json("poll execution", &format!("/executions/{execution_id}"), &[])
            .await
    }

    fn host(&self) -> &str {
        &self.host
    }
}

/// The source engine serves the same API on both ports; if a plain TCP
/// connect to port 80 succeeds we use it, otherwise the TLS endpoint.
async fn resolve_base_url(host: &str) -> String {
    let probe = tokio::time::timeout(PROBE_TIMEOUT, TcpStream::connect((host, 80))).await;
    match probe {
        Ok(Ok(_)) => {
            debug!("Port 80 reachable on {}, using plaintext endpoint", host);
            format!("http://{host}/masking/api")
        }
        _ => {
            debug!("Port 80 unreachable on {}, using TLS endpoint", host);
            format!("https://{host}/masking/api")
        }
    }
}
