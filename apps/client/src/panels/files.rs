//! Client-side file checks run when a file is picked, before any request.

use crate::models::file::SelectedFile;

pub const MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

const PDF: &[&str] = &["application/pdf"];
const PDF_OR_WORD: &[&str] = &[
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "application/msword",
];

/// Which files a panel accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePolicy {
    pub accepted_mimes: &'static [&'static str],
    pub type_message: &'static str,
    pub max_bytes: Option<u64>,
}

impl FilePolicy {
    /// Profile resume upload (and the builder's save).
    pub const PROFILE_UPLOAD: FilePolicy = FilePolicy {
        accepted_mimes: PDF,
        type_message: "Only PDF files are allowed.",
        max_bytes: Some(MAX_UPLOAD_BYTES),
    };

    pub const ANALYZER: FilePolicy = FilePolicy {
        accepted_mimes: PDF_OR_WORD,
        type_message: "Only PDF or DOCX files are allowed.",
        max_bytes: Some(MAX_UPLOAD_BYTES),
    };

    /// Job search has no client-side size cap.
    pub const JOB_SEARCH: FilePolicy = FilePolicy {
        accepted_mimes: PDF,
        type_message: "Only PDF files are allowed.",
        max_bytes: None,
    };

    /// Type first, then size; returns the message to show on rejection.
    pub fn check(&self, file: &SelectedFile) -> Result<(), &'static str> {
        if !self.accepted_mimes.contains(&file.mime.as_str()) {
            return Err(self.type_message);
        }
        match self.max_bytes {
            Some(max) if file.size() > max => Err("File size must be less than 5MB."),
            _ => Ok(()),
        }
    }
}
