//! Resume Builder panel.
//!
//! Two independent actions share the panel: generating a resume from the
//! form, and saving the generated text to the profile as a PDF. Each has its
//! own slot so a failed save never wipes the generated resume; the panel as
//! a whole is busy while either is pending.

use bytes::Bytes;
use tracing::info;

use super::dialog::ConfirmDialog;
use super::{job_description_long_enough, PanelContext, Precondition, RequestSlot, SaveGate};
use crate::errors::{ClientError, Result};
use crate::models::file::SelectedFile;
use crate::models::generation::{GeneratedResume, ResumeRequest};
use crate::models::profile::ProfileResumeStatus;
use crate::render::{export_file_name, ResumeRenderer};

const GENERATION_FAILED: &str = "Generation failed.";
const SAVE_FAILED: &str = "Failed to save resume to profile";
const SAVED: &str = "Resume saved to profile successfully!";

#[derive(Debug, Clone)]
pub struct BuilderPanel {
    draft: ResumeRequest,
    profile: ProfileResumeStatus,
    generation: RequestSlot<GeneratedResume>,
    save: RequestSlot<&'static str>,
    dialog: ConfirmDialog,
}

impl BuilderPanel {
    pub fn new(profile: ProfileResumeStatus) -> Self {
        Self {
            draft: ResumeRequest::default(),
            profile,
            generation: RequestSlot::default(),
            save: RequestSlot::default(),
            dialog: ConfirmDialog::replace_profile_resume(),
        }
    }

    pub async fn mount(ctx: PanelContext<'_>) -> Self {
        Self::new(ctx.profile_status().await)
    }

    pub fn draft(&self) -> &ResumeRequest {
        &self.draft
    }

    pub fn generation(&self) -> &RequestSlot<GeneratedResume> {
        &self.generation
    }

    pub fn save_slot(&self) -> &RequestSlot<&'static str> {
        &self.save
    }

    pub fn dialog(&self) -> &ConfirmDialog {
        &self.dialog
    }

    pub fn profile(&self) -> &ProfileResumeStatus {
        &self.profile
    }

    /// Sets one form field by its wire name.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let d = &mut self.draft;
        let field = match name {
            "full_name" => &mut d.full_name,
            "email" => &mut d.email,
            "phone" => &mut d.phone,
            "location" => &mut d.location,
            "target_job_title" => &mut d.target_job_title,
            "years_of_experience" => &mut d.years_of_experience,
            "skills" => &mut d.skills,
            "work_experience" => &mut d.work_experience,
            "education" => &mut d.education,
            "projects" => &mut d.projects,
            "certifications" => &mut d.certifications,
            "job_description" => &mut d.job_description,
            other => return Err(ClientError::Validation(format!("Unknown field: {other}"))),
        };
        *field = value.into();
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.generation.is_pending() || self.save.is_pending()
    }

    pub fn precondition(&self) -> Precondition {
        let d = &self.draft;
        let required = [
            &d.full_name,
            &d.target_job_title,
            &d.skills,
            &d.work_experience,
            &d.education,
        ];
        if required.iter().any(|v| v.trim().is_empty())
            || !job_description_long_enough(&d.job_description)
        {
            return Precondition::fail(
                "Please fill in all required fields and ensure Job Description is at least 50 chars.",
            );
        }
        Precondition::Pass
    }

    pub fn can_submit(&self) -> bool {
        self.precondition().passed() && !self.is_busy()
    }

    pub fn can_save(&self) -> bool {
        self.generation.result().is_some() && !self.is_busy() && !self.dialog.is_open()
    }

    pub async fn generate(&mut self, ctx: PanelContext<'_>) -> Result<()> {
        self.precondition().into_result()?;
        if self.is_busy() {
            return Err(ClientError::Busy);
        }
        self.generation.begin()?;
        self.save.reset();

        let token = match ctx.bearer(ctx.app.config.endpoint_auth.generate) {
            Ok(token) => token,
            Err(e) => {
                self.generation.complete(Err(e), GENERATION_FAILED);
                return Ok(());
            }
        };
        let result = ctx.app.api.generate_resume(token, &self.draft).await;
        if let Ok(resume) = &result {
            info!("Generated resume with ATS score {}", resume.ats_score);
        }
        self.generation.complete(result, GENERATION_FAILED);
        Ok(())
    }

    /// "Download PDF": the file name and bytes to write.
    pub fn export_pdf(&self, renderer: &dyn ResumeRenderer) -> Result<(String, Bytes)> {
        let resume = self.generated()?;
        Ok((
            export_file_name(&self.draft.full_name),
            renderer.render(&resume.resume_text)?,
        ))
    }

    /// "Save to Profile". Goes through the confirm dialog when a profile
    /// resume already exists.
    pub async fn save_to_profile(&mut self, ctx: PanelContext<'_>) -> Result<SaveGate> {
        self.generated()?;
        if self.is_busy() {
            return Err(ClientError::Busy);
        }
        if self.profile.exists {
            self.dialog.open();
            return Ok(SaveGate::AwaitingConfirmation);
        }
        self.send_save(ctx).await?;
        Ok(SaveGate::Sent)
    }

    /// Returns whether the save was issued.
    pub async fn confirm_save(&mut self, ctx: PanelContext<'_>) -> Result<bool> {
        if self.dialog.confirm(|| ()).is_none() {
            return Ok(false);
        }
        self.send_save(ctx).await?;
        Ok(true)
    }

    pub fn cancel_save(&mut self) {
        self.dialog.cancel();
    }

    pub fn dismiss(&mut self) {
        self.dialog.dismiss();
    }

    fn generated(&self) -> Result<&GeneratedResume> {
        self.generation
            .result()
            .ok_or_else(|| ClientError::Validation("Generate a resume first.".to_string()))
    }

    async fn send_save(&mut self, ctx: PanelContext<'_>) -> Result<()> {
        if self.is_busy() {
            return Err(ClientError::Busy);
        }
        let renderer = ctx.app.renderer.as_ref();
        let (name, bytes) = self.export_pdf(renderer)?;
        self.save.begin()?;

        let token = match ctx.bearer(ctx.app.config.endpoint_auth.profile_upload) {
            Ok(token) => token,
            Err(e) => {
                self.save.complete(Err(e), SAVE_FAILED);
                return Ok(());
            }
        };
        let file = SelectedFile {
            name,
            mime: renderer.mime().to_string(),
            bytes,
        };
        let result = ctx.app.api.upload_profile_resume(token, file).await;
        if let Ok(receipt) = &result {
            info!("Saved generated resume to profile as {}", receipt.filename);
            self.profile.exists = true;
            self.profile.filename = Some(receipt.filename.clone());
        }
        self.save.complete(result.map(|_| SAVED), SAVE_FAILED);
        Ok(())
    }
}
