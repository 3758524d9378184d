//! ATS Resume Analyzer panel.

use tracing::info;

use super::files::FilePolicy;
use super::{job_description_long_enough, PanelContext, Precondition, RequestSlot};
use crate::errors::Result;
use crate::models::analysis::{AnalyzeRequest, AtsAnalysis, ResumeSource};
use crate::models::file::SelectedFile;
use crate::models::profile::ProfileResumeStatus;

const ANALYSIS_FAILED: &str = "Analysis failed on server.";
const ANALYSIS_UNREACHABLE: &str = "Failed to connect to the analysis server.";

#[derive(Debug, Clone)]
pub struct AnalyzerPanel {
    pub job_description: String,
    source: ResumeSource,
    file: Option<SelectedFile>,
    pick_error: Option<String>,
    profile: ProfileResumeStatus,
    analysis: RequestSlot<AtsAnalysis>,
}

impl AnalyzerPanel {
    /// Defaults to the profile resume when one exists.
    pub fn new(profile: ProfileResumeStatus) -> Self {
        let source = if profile.exists {
            ResumeSource::Profile
        } else {
            ResumeSource::Upload
        };
        Self {
            job_description: String::new(),
            source,
            file: None,
            pick_error: None,
            profile,
            analysis: RequestSlot::default(),
        }
    }

    pub async fn mount(ctx: PanelContext<'_>) -> Self {
        Self::new(ctx.profile_status().await)
    }

    pub fn source(&self) -> ResumeSource {
        self.source
    }

    pub fn set_source(&mut self, source: ResumeSource) {
        self.source = source;
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn profile(&self) -> &ProfileResumeStatus {
        &self.profile
    }

    pub fn slot(&self) -> &RequestSlot<AtsAnalysis> {
        &self.analysis
    }

    /// Why the last picked file was refused.
    pub fn pick_error(&self) -> Option<&str> {
        self.pick_error.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.pick_error.as_deref().or_else(|| self.analysis.error())
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        match FilePolicy::ANALYZER.check(&file) {
            Ok(()) => {
                self.file = Some(file);
                self.pick_error = None;
            }
            Err(msg) => {
                self.file = None;
                self.pick_error = Some(msg.to_string());
            }
        }
    }

    pub fn precondition(&self) -> Precondition {
        match self.source {
            ResumeSource::Upload if self.file.is_none() => {
                return Precondition::fail("Please upload a resume file.");
            }
            ResumeSource::Profile if !self.profile.exists => {
                return Precondition::fail(
                    "No profile resume found. Please upload one in the Profile section or switch to 'Upload New Resume'.",
                );
            }
            _ => {}
        }
        if !job_description_long_enough(&self.job_description) {
            return Precondition::fail("Job description must be at least 50 characters.");
        }
        Precondition::Pass
    }

    pub fn can_submit(&self) -> bool {
        self.precondition().passed() && !self.analysis.is_pending()
    }

    pub async fn submit(&mut self, ctx: PanelContext<'_>) -> Result<()> {
        self.precondition().into_result()?;
        self.analysis.begin()?;
        self.pick_error = None;

        let token = match ctx.bearer(ctx.app.config.endpoint_auth.analyze) {
            Ok(token) => token,
            Err(e) => {
                self.analysis.complete(Err(e), ANALYSIS_FAILED);
                return Ok(());
            }
        };
        let request = AnalyzeRequest {
            job_description: self.job_description.clone(),
            source: self.source,
            file: match self.source {
                ResumeSource::Upload => self.file.clone(),
                ResumeSource::Profile => None,
            },
        };
        let result = ctx.app.api.analyze_ats(token, request).await;
        if let Ok(analysis) = &result {
            info!(
                "ATS analysis finished: {} ({})",
                analysis.ats_score,
                analysis.final_verdict.label()
            );
        }
        self.analysis
            .complete_offline(result, ANALYSIS_FAILED, ANALYSIS_UNREACHABLE);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ClientError;
    use crate::panels::tests::{long_job_description, Call, Harness};

    #[tokio::test]
    async fn test_source_defaults_follow_profile_status() {
        let harness = Harness::new(true, true).await;
        assert_eq!(
            AnalyzerPanel::mount(harness.ctx()).await.source(),
            ResumeSource::Profile
        );
        let harness = Harness::new(false, true).await;
        assert_eq!(
            AnalyzerPanel::mount(harness.ctx()).await.source(),
            ResumeSource::Upload
        );
    }

    #[test]
    fn test_precondition_reasons() {
        let mut panel = AnalyzerPanel::new(ProfileResumeStatus::default());
        assert_eq!(
            panel.precondition().reason(),
            Some("Please upload a resume file.")
        );

        panel.set_source(ResumeSource::Profile);
        assert!(panel
            .precondition()
            .reason()
            .unwrap()
            .starts_with("No profile resume found."));

        panel.set_source(ResumeSource::Upload);
        panel.select_file(SelectedFile::new("cv.docx", b"PK".to_vec()));
        panel.job_description = "x".repeat(49);
        assert_eq!(
            panel.precondition().reason(),
            Some("Job description must be at least 50 characters.")
        );
        panel.job_description.push('x');
        assert!(panel.can_submit());
    }

    #[test]
    fn test_rejected_pick_clears_previous_file() {
        let mut panel = AnalyzerPanel::new(ProfileResumeStatus::default());
        panel.select_file(SelectedFile::new("cv.pdf", b"%PDF".to_vec()));
        panel.select_file(SelectedFile::new("cv.png", b"png".to_vec()));
        assert!(panel.file().is_none());
        assert_eq!(panel.error(), Some("Only PDF or DOCX files are allowed."));
    }

    #[tokio::test]
    async fn test_profile_source_sends_no_file() {
        let harness = Harness::new(true, true).await;
        let mut panel = AnalyzerPanel::mount(harness.ctx()).await;
        panel.select_file(SelectedFile::new("cv.pdf", b"%PDF".to_vec()));
        panel.set_source(ResumeSource::Profile);
        panel.job_description = long_job_description();
        panel.submit(harness.ctx()).await.unwrap();

        assert!(panel.slot().result().is_some());
        match &harness.api.calls()[1] {
            Call::Analyze { token, request } => {
                assert!(token.is_none());
                assert_eq!(request.source, ResumeSource::Profile);
                assert!(request.file.is_none());
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_upload_source_sends_file() {
        let harness = Harness::new(false, true).await;
        let mut panel = AnalyzerPanel::mount(harness.ctx()).await;
        panel.select_file(SelectedFile::new("cv.pdf", b"%PDF".to_vec()));
        panel.job_description = long_job_description();
        panel.submit(harness.ctx()).await.unwrap();

        match &harness.api.calls()[1] {
            Call::Analyze { request, .. } => {
                assert_eq!(request.file.as_ref().map(|f| f.name.as_str()), Some("cv.pdf"));
            }
            other => panic!("unexpected call {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_error_in_ok_body_replaces_result() {
        let harness = Harness::new(true, true).await;
        let mut panel = AnalyzerPanel::mount(harness.ctx()).await;
        panel.job_description = long_job_description();
        panel.submit(harness.ctx()).await.unwrap();
        assert!(panel.slot().result().is_some());

        harness.api.fail_next(ClientError::Server {
            status: 200,
            message: Some("Could not extract text from resume".to_string()),
        });
        panel.submit(harness.ctx()).await.unwrap();
        assert!(panel.slot().result().is_none());
        assert_eq!(panel.error(), Some("Could not extract text from resume"));

        panel.submit(harness.ctx()).await.unwrap();
        assert!(panel.error().is_none());
        assert!(panel.slot().result().is_some());
    }

    #[tokio::test]
    async fn test_unreachable_server_names_the_analyzer() {
        let harness = Harness::new(true, true).await;
        let mut panel = AnalyzerPanel::mount(harness.ctx()).await;
        panel.job_description = long_job_description();
        harness
            .api
            .fail_next(ClientError::Network("connection refused".to_string()));
        panel.submit(harness.ctx()).await.unwrap();

        assert_eq!(panel.error(), Some("Failed to connect to the analysis server."));
        assert!(!panel.slot().is_pending());
    }
}
