//! Top-level routes and the guard in front of the authenticated shell.

use crate::session::AuthState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    Dashboard,
}

impl Route {
    /// Maps a path to a route. The root and unknown paths land on sign-in.
    pub fn resolve(path: &str) -> Route {
        match path.trim().trim_end_matches('/') {
            "/signup" | "signup" => Route::SignUp,
            "/dashboard" | "dashboard" => Route::Dashboard,
            _ => Route::SignIn,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Route::SignIn => "/signin",
            Route::SignUp => "/signup",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Session resolution still running: show the placeholder, decide nothing.
    Loading,
    Redirect(Route),
    Render,
}

/// Decides what a route shows for the current auth state.
pub fn check(route: Route, auth: &AuthState) -> GuardDecision {
    if !route.is_protected() {
        return GuardDecision::Render;
    }
    if auth.loading {
        return GuardDecision::Loading;
    }
    match auth.session {
        Some(_) => GuardDecision::Render,
        None => GuardDecision::Redirect(Route::SignIn),
    }
}
