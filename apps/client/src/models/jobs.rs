use serde::{Deserialize, Serialize};

use crate::models::file::SelectedFile;

/// Multipart body for `/jobs/recommend`.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSearchRequest {
    pub location: String,
    pub use_profile: bool,
    pub file: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendation {
    pub job_title: String,
    pub company: String,
    pub location: String,
    pub match_percentage: f64,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    pub apply_url: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub description: String,
}

/// Search terms the backend extracted from the resume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchKeywords {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendations {
    pub recommended_jobs: Vec<JobRecommendation>,
    #[serde(default)]
    pub keywords: Option<SearchKeywords>,
}
