//! Job Recommendations panel.

use tracing::info;

use super::files::FilePolicy;
use super::{PanelContext, Precondition, RequestSlot};
use crate::errors::Result;
use crate::models::analysis::ResumeSource;
use crate::models::file::SelectedFile;
use crate::models::jobs::{JobRecommendations, JobSearchRequest};

const SEARCH_FAILED: &str = "Failed to fetch jobs";
pub const DEFAULT_LOCATION: &str = "India";

#[derive(Debug, Clone)]
pub struct JobsPanel {
    pub location: String,
    source: ResumeSource,
    file: Option<SelectedFile>,
    pick_error: Option<String>,
    search: RequestSlot<JobRecommendations>,
}

impl Default for JobsPanel {
    fn default() -> Self {
        Self {
            location: DEFAULT_LOCATION.to_string(),
            source: ResumeSource::Profile,
            file: None,
            pick_error: None,
            search: RequestSlot::default(),
        }
    }
}

impl JobsPanel {
    pub fn source(&self) -> ResumeSource {
        self.source
    }

    pub fn set_source(&mut self, source: ResumeSource) {
        self.source = source;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn slot(&self) -> &RequestSlot<JobRecommendations> {
        &self.search
    }

    /// Why the last picked file was refused.
    pub fn pick_error(&self) -> Option<&str> {
        self.pick_error.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.pick_error.as_deref().or_else(|| self.search.error())
    }

    /// An accepted pick also switches the source to upload.
    pub fn select_file(&mut self, file: SelectedFile) {
        match FilePolicy::JOB_SEARCH.check(&file) {
            Ok(()) => {
                self.file = Some(file);
                self.pick_error = None;
                self.source = ResumeSource::Upload;
            }
            Err(msg) => {
                self.file = None;
                self.pick_error = Some(msg.to_string());
            }
        }
    }

    pub fn precondition(&self) -> Precondition {
        if self.location.trim().is_empty() {
            return Precondition::fail("Please enter a location.");
        }
        if self.source == ResumeSource::Upload && self.file.is_none() {
            return Precondition::fail("Please upload a resume file.");
        }
        Precondition::Pass
    }

    pub fn can_submit(&self) -> bool {
        self.precondition().passed() && !self.search.is_pending()
    }

    pub async fn submit(&mut self, ctx: PanelContext<'_>) -> Result<()> {
        self.precondition().into_result()?;
        self.search.begin()?;
        self.pick_error = None;

        let token = match ctx.bearer(ctx.app.config.endpoint_auth.jobs) {
            Ok(token) => token,
            Err(e) => {
                self.search.complete(Err(e), SEARCH_FAILED);
                return Ok(());
            }
        };
        let use_profile = self.source == ResumeSource::Profile;
        let request = JobSearchRequest {
            location: self.location.trim().to_string(),
            use_profile,
            file: if use_profile { None } else { self.file.clone() },
        };
        let result = ctx.app.api.recommend_jobs(token, request).await;
        if let Ok(found) = &result {
            info!("Found {} job recommendations", found.recommended_jobs.len());
        }
        self.search.complete(result, SEARCH_FAILED);
        Ok(())
    }
}
