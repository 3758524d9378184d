//! View navigator for the signed-in shell.
//!
//! One current view, no history. Selecting a view mounts a fresh panel and
//! drops the previous one together with its draft.

use std::fmt;
use std::str::FromStr;

use tracing::info;

use crate::panels::analyzer::AnalyzerPanel;
use crate::panels::builder::BuilderPanel;
use crate::panels::jobs::JobsPanel;
use crate::panels::upload::UploadPanel;
use crate::panels::PanelContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    UploadResume,
    JobRecommendations,
    Builder,
    ResumeAnalyzer,
    ProfileAnalytics,
}

impl View {
    pub const ALL: [View; 6] = [
        View::Dashboard,
        View::UploadResume,
        View::JobRecommendations,
        View::Builder,
        View::ResumeAnalyzer,
        View::ProfileAnalytics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::UploadResume => "upload-resume",
            View::JobRecommendations => "job-recommendations",
            View::Builder => "builder",
            View::ResumeAnalyzer => "resume-analyzer",
            View::ProfileAnalytics => "profile-analytics",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            View::Dashboard => "Dashboard",
            View::UploadResume => "Upload Resume",
            View::JobRecommendations => "Job Recommendations",
            View::Builder => "Create Resume",
            View::ResumeAnalyzer => "AI Resume Analyser",
            View::ProfileAnalytics => "Profile Analytics",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        View::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown view '{s}'"))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Navigation surface
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Show(View),
    Logout,
}

/// Sidebar entries in display order.
pub const SIDEBAR: [(&str, NavAction); 4] = [
    ("Dashboard", NavAction::Show(View::Dashboard)),
    ("Upload Resume", NavAction::Show(View::UploadResume)),
    ("Job Recommendations", NavAction::Show(View::JobRecommendations)),
    ("Logout", NavAction::Logout),
];

/// Dashboard cards: (view, subtitle).
pub const DASHBOARD_CARDS: [(View, &str); 4] = [
    (View::Builder, "Build Your Future"),
    (View::ResumeAnalyzer, "Get detailed insights"),
    (View::JobRecommendations, "Find Your Dream Role"),
    (View::ProfileAnalytics, "Track Performance"),
];

/// Sidebar lookup by label, case-insensitive.
pub fn sidebar_action(label: &str) -> Option<NavAction> {
    let label = label.trim();
    SIDEBAR
        .iter()
        .find(|(l, _)| l.eq_ignore_ascii_case(label))
        .map(|(_, action)| *action)
}

// ────────────────────────────────────────────────────────────────────────────
// Navigator
// ────────────────────────────────────────────────────────────────────────────

/// The mounted panel. Owning it here is what scopes a draft to its view.
#[derive(Debug, Clone)]
pub enum ActivePanel {
    Dashboard,
    Upload(UploadPanel),
    Jobs(JobsPanel),
    Builder(BuilderPanel),
    Analyzer(AnalyzerPanel),
    ProfileAnalytics,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    current: View,
    panel: ActivePanel,
}

impl Default for Navigator {
    fn default() -> Self {
        Self {
            current: View::Dashboard,
            panel: ActivePanel::Dashboard,
        }
    }
}

impl Navigator {
    pub fn current(&self) -> View {
        self.current
    }

    pub fn panel(&self) -> &ActivePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut ActivePanel {
        &mut self.panel
    }

    /// Mounts a fresh panel for `view`, even when it is already current.
    pub async fn select(&mut self, view: View, ctx: PanelContext<'_>) {
        self.panel = match view {
            View::Dashboard => ActivePanel::Dashboard,
            View::UploadResume => ActivePanel::Upload(UploadPanel::mount(ctx).await),
            View::JobRecommendations => ActivePanel::Jobs(JobsPanel::default()),
            View::Builder => ActivePanel::Builder(BuilderPanel::mount(ctx).await),
            View::ResumeAnalyzer => ActivePanel::Analyzer(AnalyzerPanel::mount(ctx).await),
            View::ProfileAnalytics => ActivePanel::ProfileAnalytics,
        };
        if self.current != view {
            info!("Navigated from {} to {}", self.current, view);
        }
        self.current = view;
    }

    /// The "back" control every panel gets.
    pub async fn back(&mut self, ctx: PanelContext<'_>) {
        self.select(View::Dashboard, ctx).await;
    }

    /// Back to a freshly mounted dashboard, e.g. after sign-out.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
