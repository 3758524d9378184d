//! Upload Resume panel: stores a PDF as the account's profile resume.

use tracing::{debug, info};

use super::dialog::ConfirmDialog;
use super::files::FilePolicy;
use super::{PanelContext, Precondition, RequestSlot, SaveGate};
use crate::errors::{ClientError, Result};
use crate::models::file::SelectedFile;
use crate::models::profile::{ProfileResumeStatus, UploadReceipt};

const UPLOAD_FAILED: &str = "Upload failed.";

#[derive(Debug, Clone)]
pub struct UploadPanel {
    file: Option<SelectedFile>,
    pick_error: Option<String>,
    profile: ProfileResumeStatus,
    upload: RequestSlot<UploadReceipt>,
    dialog: ConfirmDialog,
}

impl UploadPanel {
    pub fn new(profile: ProfileResumeStatus) -> Self {
        Self {
            file: None,
            pick_error: None,
            profile,
            upload: RequestSlot::default(),
            dialog: ConfirmDialog::replace_profile_resume(),
        }
    }

    pub async fn mount(ctx: PanelContext<'_>) -> Self {
        Self::new(ctx.profile_status().await)
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn profile(&self) -> &ProfileResumeStatus {
        &self.profile
    }

    pub fn slot(&self) -> &RequestSlot<UploadReceipt> {
        &self.upload
    }

    pub fn dialog(&self) -> &ConfirmDialog {
        &self.dialog
    }

    /// Why the last picked file was refused.
    pub fn pick_error(&self) -> Option<&str> {
        self.pick_error.as_deref()
    }

    /// Message shown for a rejected pick or a failed upload.
    pub fn error(&self) -> Option<&str> {
        self.pick_error.as_deref().or_else(|| self.upload.error())
    }

    pub fn success_message(&self) -> Option<String> {
        self.upload
            .result()
            .map(|receipt| format!("Resume saved to profile: {}", receipt.filename))
    }

    /// A rejected file is never kept, not even the previous one.
    pub fn select_file(&mut self, file: SelectedFile) {
        self.upload.reset();
        match FilePolicy::PROFILE_UPLOAD.check(&file) {
            Ok(()) => {
                self.file = Some(file);
                self.pick_error = None;
            }
            Err(msg) => {
                debug!("Rejected {} ({})", file.name, file.mime);
                self.file = None;
                self.pick_error = Some(msg.to_string());
            }
        }
    }

    pub fn precondition(&self) -> Precondition {
        match &self.file {
            Some(_) => Precondition::Pass,
            None => Precondition::fail("Please select a PDF file to upload."),
        }
    }

    pub fn can_submit(&self) -> bool {
        self.precondition().passed() && !self.upload.is_pending() && !self.dialog.is_open()
    }

    /// Uploads the picked file, or opens the overwrite dialog first when a
    /// profile resume already exists.
    pub async fn submit(&mut self, ctx: PanelContext<'_>) -> Result<SaveGate> {
        self.precondition().into_result()?;
        if self.profile.exists {
            self.dialog.open();
            return Ok(SaveGate::AwaitingConfirmation);
        }
        self.send(ctx).await?;
        Ok(SaveGate::Sent)
    }

    /// Returns whether an upload was issued.
    pub async fn confirm(&mut self, ctx: PanelContext<'_>) -> Result<bool> {
        if self.dialog.confirm(|| ()).is_none() {
            return Ok(false);
        }
        self.send(ctx).await?;
        Ok(true)
    }

    pub fn cancel(&mut self) {
        self.dialog.cancel();
    }

    pub fn dismiss(&mut self) {
        self.dialog.dismiss();
    }

    async fn send(&mut self, ctx: PanelContext<'_>) -> Result<()> {
        self.precondition().into_result()?;
        let file = self
            .file
            .clone()
            .ok_or_else(|| ClientError::Validation("Please select a PDF file to upload.".to_string()))?;
        self.upload.begin()?;
        self.pick_error = None;

        let token = match ctx.bearer(ctx.app.config.endpoint_auth.profile_upload) {
            Ok(token) => token,
            Err(e) => {
                self.upload.complete(Err(e), UPLOAD_FAILED);
                return Ok(());
            }
        };

        let result = ctx.app.api.upload_profile_resume(token, file).await;
        if let Ok(receipt) = &result {
            info!("Profile resume replaced with {}", receipt.filename);
            self.file = None;
            self.profile.exists = true;
            self.profile.filename = Some(receipt.filename.clone());
        }
        self.upload.complete(result, UPLOAD_FAILED);
        Ok(())
    }
}
