//! Text projections of each screen. Pure functions of state; nothing here
//! issues requests.

use crate::models::analysis::AtsAnalysis;
use crate::models::generation::{GeneratedResume, ResumeRequest};
use crate::models::jobs::JobRecommendations;
use crate::models::user::User;
use crate::navigator::{ActivePanel, View, DASHBOARD_CARDS, SIDEBAR};
use crate::panels::analyzer::AnalyzerPanel;
use crate::panels::builder::BuilderPanel;
use crate::panels::dialog::ConfirmDialog;
use crate::panels::jobs::JobsPanel;
use crate::panels::upload::UploadPanel;
use crate::panels::{Outcome, Precondition, RequestSlot};
use crate::session::forms::{SignInForm, SignUpForm};

const BAR_WIDTH: usize = 20;

/// Score band: >= 80 strong, >= 60 fair, anything else weak.
pub fn score_band(score: f64) -> &'static str {
    if score >= 80.0 {
        "strong"
    } else if score >= 60.0 {
        "fair"
    } else {
        "weak"
    }
}

/// `[#####---------------]  25%`, clamped to 0..=100.
pub fn progress_bar(percent: f64) -> String {
    let pct = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };
    let filled = ((pct / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        pct
    )
}

/// Points against a section maximum, as a bar of the section's share.
pub fn section_row(title: &str, score: f64, max: f64) -> String {
    let percent = if max > 0.0 { score / max * 100.0 } else { 0.0 };
    format!("{title:<24} {score:>4.0}/{max:<3.0} {}", progress_bar(percent))
}

#[derive(Default)]
struct Screen(String);

impl Screen {
    fn line(&mut self, text: impl AsRef<str>) {
        self.0.push_str(text.as_ref());
        self.0.push('\n');
    }

    fn blank(&mut self) {
        self.0.push('\n');
    }

    fn list(&mut self, heading: &str, items: &[String]) {
        if items.is_empty() {
            return;
        }
        self.line(format!("{heading}:"));
        for item in items {
            self.line(format!("  - {item}"));
        }
    }

    fn field(&mut self, name: &str, value: &str) {
        let shown = if value.is_empty() { "<empty>" } else { value };
        self.line(format!("  {name:<20} {}", shown.replace('\n', " / ")));
    }

    fn precondition(&mut self, check: &Precondition) {
        if let Some(reason) = check.reason() {
            self.line(format!("  ! {reason}"));
        }
    }

    fn status<T>(&mut self, action: &str, slot: &RequestSlot<T>) {
        match slot.outcome() {
            Outcome::Pending => self.line(format!("{action}: in progress...")),
            Outcome::Failed(msg) => self.line(format!("Error: {msg}")),
            Outcome::Idle | Outcome::Ready(_) => {}
        }
    }

    fn dialog(&mut self, dialog: &ConfirmDialog) {
        if !dialog.is_open() {
            return;
        }
        self.blank();
        self.line(format!("** {} **", dialog.title));
        self.line(dialog.message);
        self.line(format!(
            "   confirm = {}   cancel = {}",
            dialog.confirm_text, dialog.cancel_text
        ));
    }
}

pub fn loading() -> String {
    "Loading...\n".to_string()
}

pub fn sign_in(form: &SignInForm, error: Option<&str>, notice: Option<&str>) -> String {
    let mut s = Screen::default();
    s.line("== Sign In ==");
    if let Some(notice) = notice {
        s.line(notice);
    }
    s.field("email", &form.email);
    s.field("password", &"*".repeat(form.password.chars().count()));
    if let Some(error) = error {
        s.line(format!("Error: {error}"));
    }
    s.line("No account? go /signup");
    s.0
}

pub fn sign_up(form: &SignUpForm, error: Option<&str>) -> String {
    let mut s = Screen::default();
    s.line("== Create Account ==");
    s.field("full_name", &form.full_name);
    s.field("email", &form.email);
    s.field("password", &"*".repeat(form.password.chars().count()));
    s.field(
        "confirm_password",
        &"*".repeat(form.confirm_password.chars().count()),
    );
    if let Some(error) = error {
        s.line(format!("Error: {error}"));
    }
    s.line("Have an account? go /signin");
    s.0
}

pub fn shell(user: Option<&User>, view: View, panel: &ActivePanel) -> String {
    let mut s = Screen::default();
    let name = user.map(User::display_name).unwrap_or("User");
    let sidebar: Vec<&str> = SIDEBAR.iter().map(|(label, _)| *label).collect();
    s.line(format!("[{name}]  {}", sidebar.join(" | ")));
    s.line(format!("== {} ==", view.title()));

    match panel {
        ActivePanel::Dashboard => dashboard(&mut s),
        ActivePanel::Upload(p) => upload(&mut s, p),
        ActivePanel::Builder(p) => builder(&mut s, p),
        ActivePanel::Analyzer(p) => analyzer(&mut s, p),
        ActivePanel::Jobs(p) => jobs(&mut s, p),
        ActivePanel::ProfileAnalytics => {
            s.line("No Projects Added");
            s.line("Showcase your work by adding personal projects, open-source contributions, or other achievements.");
        }
    }
    s.0
}

fn dashboard(s: &mut Screen) {
    for (view, subtitle) in DASHBOARD_CARDS {
        s.line(format!("  {:<20} {:<24} view {}", view.title(), subtitle, view));
    }
}

fn upload(s: &mut Screen, p: &UploadPanel) {
    match &p.profile().filename {
        Some(name) if p.profile().exists => s.line(format!("Current profile resume: {name}")),
        _ => s.line("No profile resume saved yet."),
    }
    s.field("file", p.file().map(|f| f.name.as_str()).unwrap_or(""));
    s.precondition(&p.precondition());
    s.status("Uploading", p.slot());
    if let Some(err) = p.pick_error() {
        s.line(format!("Error: {err}"));
    }
    if let Some(msg) = p.success_message() {
        s.line(msg);
    }
    s.dialog(p.dialog());
}

fn builder(s: &mut Screen, p: &BuilderPanel) {
    draft(s, p.draft());
    s.precondition(&p.precondition());
    s.status("Generating", p.generation());
    if let Some(resume) = p.generation().result() {
        generated(s, resume);
    }
    s.status("Saving", p.save_slot());
    if let Some(msg) = p.save_slot().result() {
        s.line(*msg);
    }
    s.dialog(p.dialog());
}

fn draft(s: &mut Screen, d: &ResumeRequest) {
    for (name, value) in d.fields() {
        s.field(name, value);
    }
    s.line(format!(
        "  ({}/50 characters of job description)",
        d.job_description.chars().count()
    ));
}

fn generated(s: &mut Screen, r: &GeneratedResume) {
    s.blank();
    s.line(format!(
        "ATS score      {} ({})",
        progress_bar(r.ats_score),
        score_band(r.ats_score)
    ));
    s.line(format!("Skills match   {}", progress_bar(r.skills_match_percentage)));
    s.list("Missing skills", &r.missing_skills);
    s.list("Optimization notes", &r.optimization_notes);
    s.blank();
    s.line(&r.resume_text);
}

fn analyzer(s: &mut Screen, p: &AnalyzerPanel) {
    s.field("source", p.source().as_str());
    if p.profile().exists {
        let name = p.profile().filename.as_deref().unwrap_or("profile resume");
        s.line(format!("  profile resume: {name}"));
    }
    s.field("file", p.file().map(|f| f.name.as_str()).unwrap_or(""));
    s.field("job_description", &p.job_description);
    s.line(format!(
        "  ({}/50 required)",
        p.job_description.chars().count()
    ));
    s.precondition(&p.precondition());
    s.status("Analyzing", p.slot());
    if let Some(err) = p.pick_error() {
        s.line(format!("Error: {err}"));
    }
    if let Some(a) = p.slot().result() {
        analysis(s, a);
    }
}

fn analysis(s: &mut Screen, a: &AtsAnalysis) {
    s.blank();
    s.line(format!(
        "ATS score      {} ({})",
        progress_bar(a.ats_score),
        score_band(a.ats_score)
    ));
    s.line(format!("Verdict        {}", a.final_verdict.label()));
    s.line(format!("Skills match   {}", progress_bar(a.skills_match_percentage)));
    for (title, score, max) in a.section_scores.rows() {
        s.line(section_row(title, score, max));
    }
    s.list("Missing skills", &a.missing_skills);
    s.list("Strengths", &a.strengths);
    s.list("Weaknesses", &a.weaknesses);
    s.list("ATS warnings", &a.ats_warnings);
    s.list("Suggestions", &a.improvement_suggestions);
}

fn jobs(s: &mut Screen, p: &JobsPanel) {
    s.field("location", &p.location);
    s.field("source", p.source().as_str());
    s.field("file", p.file().map(|f| f.name.as_str()).unwrap_or(""));
    s.precondition(&p.precondition());
    s.status("Searching", p.slot());
    if let Some(err) = p.pick_error() {
        s.line(format!("Error: {err}"));
    }
    if let Some(found) = p.slot().result() {
        recommendations(s, found);
    }
}

fn recommendations(s: &mut Screen, r: &JobRecommendations) {
    s.blank();
    if let Some(k) = &r.keywords {
        s.line(format!("Searched for: {} ({})", k.role, k.skills.join(", ")));
    }
    if r.recommended_jobs.is_empty() {
        s.line("No jobs found. Try another location.");
        return;
    }
    for job in &r.recommended_jobs {
        s.line(format!("{} @ {} ({})", job.job_title, job.company, job.location));
        s.line(format!("  match {}", progress_bar(job.match_percentage)));
        if !job.source.is_empty() {
            s.line(format!("  via {}", job.source));
        }
        if !job.missing_skills.is_empty() {
            s.line(format!("  missing: {}", job.missing_skills.join(", ")));
        }
        s.line(format!("  apply: {}", job.apply_url));
    }
}
