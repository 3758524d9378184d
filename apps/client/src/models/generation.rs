use serde::{Deserialize, Serialize};

/// Fields sent to `/generate_resume`, in the order the form shows them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub target_job_title: String,
    pub years_of_experience: String,
    pub skills: String,
    pub work_experience: String,
    pub education: String,
    pub projects: String,
    pub certifications: String,
    pub job_description: String,
}

impl ResumeRequest {
    /// Form field name and value pairs for the multipart body.
    pub fn fields(&self) -> [(&'static str, &str); 12] {
        [
            ("full_name", &self.full_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("location", &self.location),
            ("target_job_title", &self.target_job_title),
            ("years_of_experience", &self.years_of_experience),
            ("skills", &self.skills),
            ("work_experience", &self.work_experience),
            ("education", &self.education),
            ("projects", &self.projects),
            ("certifications", &self.certifications),
            ("job_description", &self.job_description),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedResume {
    pub ats_score: f64,
    pub resume_text: String,
    pub skills_match_percentage: f64,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub optimization_notes: Vec<String>,
}
