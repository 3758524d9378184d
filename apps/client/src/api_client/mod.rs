//! Resume API client: the single point of entry for every call to the resume
//! backend.
//!
//! Panels never build HTTP requests themselves. They go through [`ResumeApi`],
//! which the application root holds as `Arc<dyn ResumeApi>` so tests can swap
//! in a recording fake.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::errors::{ClientError, Result};
use crate::models::analysis::{AnalyzeRequest, AtsAnalysis, ResumeSource};
use crate::models::file::SelectedFile;
use crate::models::generation::{GeneratedResume, ResumeRequest};
use crate::models::jobs::{JobRecommendations, JobSearchRequest};
use crate::models::profile::{ProfileResumeStatus, UploadReceipt};

pub mod wire;

/// The backend operations the panels consume.
///
/// `token` is the bearer token to attach, already resolved against the
/// endpoint's auth policy by the caller. Implementations never look at the
/// session themselves.
#[async_trait]
pub trait ResumeApi: Send + Sync {
    /// GET /profile/resume
    async fn profile_status(&self, token: Option<&str>) -> Result<ProfileResumeStatus>;

    /// POST /profile/resume
    async fn upload_profile_resume(
        &self,
        token: Option<&str>,
        file: SelectedFile,
    ) -> Result<UploadReceipt>;

    /// POST /generate_resume
    async fn generate_resume(
        &self,
        token: Option<&str>,
        request: &ResumeRequest,
    ) -> Result<GeneratedResume>;

    /// POST /analyze_ats
    async fn analyze_ats(&self, token: Option<&str>, request: AnalyzeRequest)
        -> Result<AtsAnalysis>;

    /// POST /jobs/recommend
    async fn recommend_jobs(
        &self,
        token: Option<&str>,
        request: JobSearchRequest,
    ) -> Result<JobRecommendations>;
}

/// reqwest-backed [`ResumeApi`]. No retries: every failure is terminal for
/// the submission that caused it.
#[derive(Clone)]
pub struct HttpResumeApi {
    client: Client,
    base_url: String,
}

impl HttpResumeApi {
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<T> {
        let request = match token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;

        debug!("Backend responded {status} ({} bytes)", body.len());
        wire::decode_response(status, &body)
    }
}

fn file_part(file: SelectedFile) -> Result<Part> {
    Part::bytes(file.bytes.to_vec())
        .file_name(file.name)
        .mime_str(&file.mime)
        .map_err(|_| ClientError::Validation(format!("Unsupported file type '{}'", file.mime)))
}

#[async_trait]
impl ResumeApi for HttpResumeApi {
    async fn profile_status(&self, token: Option<&str>) -> Result<ProfileResumeStatus> {
        debug!("GET /profile/resume");
        self.send(self.client.get(self.url("/profile/resume")), token)
            .await
    }

    async fn upload_profile_resume(
        &self,
        token: Option<&str>,
        file: SelectedFile,
    ) -> Result<UploadReceipt> {
        debug!("POST /profile/resume ({}, {} bytes)", file.name, file.size());
        let form = Form::new().part("file", file_part(file)?);
        self.send(
            self.client.post(self.url("/profile/resume")).multipart(form),
            token,
        )
        .await
    }

    async fn generate_resume(
        &self,
        token: Option<&str>,
        request: &ResumeRequest,
    ) -> Result<GeneratedResume> {
        debug!("POST /generate_resume");
        let form = request
            .fields()
            .into_iter()
            .fold(Form::new(), |form, (name, value)| {
                form.text(name, value.to_string())
            });
        self.send(
            self.client.post(self.url("/generate_resume")).multipart(form),
            token,
        )
        .await
    }

    async fn analyze_ats(
        &self,
        token: Option<&str>,
        request: AnalyzeRequest,
    ) -> Result<AtsAnalysis> {
        debug!("POST /analyze_ats (source={})", request.source.as_str());
        let mut form = Form::new()
            .text("job_description", request.job_description)
            .text("resume_source", request.source.as_str());
        if let (ResumeSource::Upload, Some(file)) = (request.source, request.file) {
            form = form.part("file", file_part(file)?);
        }
        self.send(
            self.client.post(self.url("/analyze_ats")).multipart(form),
            token,
        )
        .await
    }

    async fn recommend_jobs(
        &self,
        token: Option<&str>,
        request: JobSearchRequest,
    ) -> Result<JobRecommendations> {
        debug!(
            "POST /jobs/recommend (location={}, use_profile={})",
            request.location, request.use_profile
        );
        let mut form = Form::new()
            .text("location", request.location)
            .text("use_profile", request.use_profile.to_string());
        if let (false, Some(file)) = (request.use_profile, request.file) {
            form = form.part("file", file_part(file)?);
        }
        self.send(
            self.client.post(self.url("/jobs/recommend")).multipart(form),
            token,
        )
        .await
    }
}
