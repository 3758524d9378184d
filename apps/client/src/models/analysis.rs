use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::file::SelectedFile;

/// The model's overall call. The backend fills this from an LLM, so wording
/// drifts; anything that is not one of the three known labels is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Strong,
    Moderate,
    Weak,
    Other(String),
}

impl Verdict {
    pub fn label(&self) -> &str {
        match self {
            Verdict::Strong => "Strong Match",
            Verdict::Moderate => "Moderate Match",
            Verdict::Weak => "Weak Match",
            Verdict::Other(text) => text,
        }
    }
}

impl From<String> for Verdict {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strong match" | "strong" => Verdict::Strong,
            "moderate match" | "moderate" => Verdict::Moderate,
            "weak match" | "weak" => Verdict::Weak,
            _ => Verdict::Other(raw.trim().to_string()),
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Verdict {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Verdict::from)
    }
}

/// Per-section points. Each section has its own ceiling, see [`SectionScores::rows`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SectionScores {
    pub parsing: f64,
    pub skills: f64,
    pub experience: f64,
    pub role_alignment: f64,
    pub education: f64,
}

impl SectionScores {
    /// (title, score, max score) in display order.
    pub fn rows(&self) -> [(&'static str, f64, f64); 5] {
        [
            ("Parsing Compatibility", self.parsing, 20.0),
            ("Skills Match", self.skills, 35.0),
            ("Experience Relevance", self.experience, 25.0),
            ("Role Alignment", self.role_alignment, 10.0),
            ("Education", self.education, 10.0),
        ]
    }
}

/// Which resume `/analyze_ats` should read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeSource {
    Upload,
    Profile,
}

impl ResumeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            ResumeSource::Upload => "upload",
            ResumeSource::Profile => "profile",
        }
    }
}

/// Multipart body for `/analyze_ats`. `file` is only sent for [`ResumeSource::Upload`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzeRequest {
    pub job_description: String,
    pub source: ResumeSource,
    pub file: Option<SelectedFile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsAnalysis {
    pub ats_score: f64,
    pub section_scores: SectionScores,
    pub skills_match_percentage: f64,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub ats_warnings: Vec<String>,
    #[serde(default)]
    pub improvement_suggestions: Vec<String>,
    pub final_verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_decodes_backend_shape() {
        let body = r#"{
            "ats_score": 78,
            "section_scores": {"parsing": 18, "skills": 25, "experience": 20, "role_alignment": 8, "education": 7},
            "skills_match_percentage": 64.5,
            "missing_skills": ["Kubernetes"],
            "strengths": ["Rust"],
            "weaknesses": [],
            "ats_warnings": [],
            "improvement_suggestions": ["Add metrics"],
            "final_verdict": "Moderate Match"
        }"#;
        let analysis: AtsAnalysis = serde_json::from_str(body).unwrap();
        assert_eq!(analysis.final_verdict, Verdict::Moderate);
        assert_eq!(analysis.section_scores.rows()[1], ("Skills Match", 25.0, 35.0));
    }

    #[test]
    fn test_verdict_wording_drift_still_decodes() {
        let body = r#"{
            "ats_score": 78,
            "section_scores": {"parsing": 18, "skills": 25, "experience": 20, "role_alignment": 8, "education": 7},
            "skills_match_percentage": 64.5,
            "final_verdict": " moderate match"
        }"#;
        let analysis: AtsAnalysis = serde_json::from_str(body).unwrap();
        assert_eq!(analysis.final_verdict, Verdict::Moderate);

        let other: Verdict = serde_json::from_str(r#""Borderline fit""#).unwrap();
        assert_eq!(other, Verdict::Other("Borderline fit".to_string()));
        assert_eq!(other.label(), "Borderline fit");
        assert_eq!(serde_json::to_string(&Verdict::Weak).unwrap(), r#""Weak Match""#);
    }

    #[test]
    fn test_non_string_verdict_is_rejected() {
        let body = r#"{
            "ats_score": 78,
            "section_scores": {"parsing": 18, "skills": 25, "experience": 20, "role_alignment": 8, "education": 7},
            "skills_match_percentage": 64.5,
            "final_verdict": 3
        }"#;
        assert!(serde_json::from_str::<AtsAnalysis>(body).is_err());
    }
}
