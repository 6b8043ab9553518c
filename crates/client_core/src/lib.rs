use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, Response,
};
use serde::de::DeserializeOwned;
use shared::{
    error::BackendErrorBody,
    protocol::{
        CaseResponse, CompareRequest, CompareResponse, SolveRequest, SolveResponse,
        UploadCaseResponse, CASE_PATH, COMPARE_PATH, SOLVE_PATH, UPLOAD_CASE_PATH, UPLOAD_FIELD,
    },
};
use thiserror::Error;
use tracing::debug;
use url::Url;

pub mod config;
pub mod session;

pub use config::{load_settings, Settings};
pub use session::{
    execute, BackendOutcome, BackendRequest, CaseController, CaseSession, Notice, UploadNotice,
    ViewState, EMPTY_ANSWER_COMPARISON, MAX_PENDING_NOTICES, UPLOAD_NOTICE_TTL,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("invalid backend url '{url}': {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("failed to build http client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        source: reqwest::Error,
    },
    #[error("{endpoint} returned status {status}: {detail}")]
    Status {
        endpoint: &'static str,
        status: u16,
        detail: String,
    },
    #[error("malformed response from {endpoint}: {reason}")]
    MalformedResponse {
        endpoint: &'static str,
        reason: String,
    },
    #[error("backend worker unavailable: {0}")]
    WorkerUnavailable(String),
    #[error("failed to read upload '{}': {source}", path.display())]
    ReadUpload {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A document picked by the user, ready to be sent as multipart form content.
#[derive(Debug, Clone)]
pub struct CaseUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl CaseUpload {
    pub async fn from_path(path: &Path) -> Result<Self, BackendError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| BackendError::ReadUpload {
                path: path.to_path_buf(),
                source,
            })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "caso".to_string());
        Ok(Self {
            filename,
            mime_type: mime_guess::from_path(path)
                .first_or_octet_stream()
                .to_string(),
            bytes,
        })
    }
}

/// The four backend calls the controller depends on.
#[async_trait]
pub trait CaseBackend: Send + Sync {
    async fn generate_case(&self) -> Result<String, BackendError>;
    async fn upload_case(&self, upload: CaseUpload) -> Result<String, BackendError>;
    async fn solve(&self, case_study: &str) -> Result<String, BackendError>;
    async fn compare(&self, request: CompareRequest) -> Result<String, BackendError>;
}

pub struct HttpCaseBackend {
    http: Client,
    base_url: Url,
}

impl HttpCaseBackend {
    pub fn new(base_url: &str) -> Result<Self, BackendError> {
        Self::with_timeout(base_url, None)
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, BackendError> {
        Self::with_timeout(&settings.backend_url, settings.request_timeout)
    }

    fn with_timeout(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let parsed = Url::parse(base_url).map_err(|source| BackendError::InvalidUrl {
            url: base_url.to_string(),
            source,
        })?;
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build().map_err(BackendError::ClientBuild)?,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

async fn read_json<T: DeserializeOwned>(
    endpoint: &'static str,
    response: Response,
) -> Result<T, BackendError> {
    let status = response.status();
    let body = response
        .bytes()
        .await
        .map_err(|source| BackendError::Transport { endpoint, source })?;

    if !status.is_success() {
        let detail = serde_json::from_slice::<BackendErrorBody>(&body)
            .map(|parsed| parsed.message())
            .unwrap_or_else(|_| String::from_utf8_lossy(&body).into_owned());
        return Err(BackendError::Status {
            endpoint,
            status: status.as_u16(),
            detail,
        });
    }

    serde_json::from_slice(&body).map_err(|err| BackendError::MalformedResponse {
        endpoint,
        reason: err.to_string(),
    })
}

#[async_trait]
impl CaseBackend for HttpCaseBackend {
    async fn generate_case(&self) -> Result<String, BackendError> {
        let response = self
            .http
            .get(self.endpoint(CASE_PATH))
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: CASE_PATH,
                source,
            })?;
        let body: CaseResponse = read_json(CASE_PATH, response).await?;
        Ok(body.case_study)
    }

    async fn upload_case(&self, upload: CaseUpload) -> Result<String, BackendError> {
        debug!(
            filename = %upload.filename,
            mime_type = %upload.mime_type,
            size_bytes = upload.bytes.len(),
            "uploading case document"
        );
        let part = Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&upload.mime_type)
            .map_err(|source| BackendError::Transport {
                endpoint: UPLOAD_CASE_PATH,
                source,
            })?;
        let response = self
            .http
            .post(self.endpoint(UPLOAD_CASE_PATH))
            .multipart(Form::new().part(UPLOAD_FIELD, part))
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: UPLOAD_CASE_PATH,
                source,
            })?;
        let body: UploadCaseResponse = read_json(UPLOAD_CASE_PATH, response).await?;
        Ok(body.uploaded_case)
    }

    async fn solve(&self, case_study: &str) -> Result<String, BackendError> {
        let response = self
            .http
            .post(self.endpoint(SOLVE_PATH))
            .json(&SolveRequest {
                case_study: case_study.to_string(),
            })
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: SOLVE_PATH,
                source,
            })?;
        let body: SolveResponse = read_json(SOLVE_PATH, response).await?;
        Ok(body.ia_solution)
    }

    async fn compare(&self, request: CompareRequest) -> Result<String, BackendError> {
        let response = self
            .http
            .post(self.endpoint(COMPARE_PATH))
            .json(&request)
            .send()
            .await
            .map_err(|source| BackendError::Transport {
                endpoint: COMPARE_PATH,
                source,
            })?;
        let body: CompareResponse = read_json(COMPARE_PATH, response).await?;
        Ok(body.comparison)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
