use serde::{Deserialize, Serialize};

/// Whether the account has a saved profile resume.
///
/// Fetched once when a panel mounts; only used to pick a default resume
/// source and to decide whether saving needs an overwrite confirmation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileResumeStatus {
    pub exists: bool,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Body of a successful `POST /profile/resume`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub filename: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}
