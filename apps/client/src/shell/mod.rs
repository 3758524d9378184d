//! Application root and the terminal event loop.
//!
//! [`App`] owns everything with a whole-run lifetime: the shared services,
//! the session store, the top-level route and the navigator. Commands are
//! applied one at a time; a command that sends a request is awaited before
//! the next line is read.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;
use tracing::{debug, info, warn};

use crate::errors::ClientError;
use crate::models::file::SelectedFile;
use crate::navigator::{sidebar_action, ActivePanel, NavAction, Navigator, View};
use crate::panels::PanelContext;
use crate::session::forms::{SignInForm, SignUpForm};
use crate::session::guard::{self, GuardDecision, Route};
use crate::session::SessionStore;
use crate::state::AppState;

pub mod commands;
pub mod completion;
pub mod views;

use commands::{Command, HELP};
use completion::ShellHelper;

pub const SIGN_UP_DONE: &str =
    "Account created. Please check your email to verify your account.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App {
    state: AppState,
    session: SessionStore,
    route: Route,
    navigator: Navigator,
    sign_in: SignInForm,
    sign_up: SignUpForm,
    /// Error shown on the sign-in / sign-up screen.
    auth_error: Option<String>,
    /// One-shot notice, e.g. after registering.
    notice: Option<String>,
    /// Reply to the last command that has no home on the screen itself.
    message: Option<String>,
}

impl App {
    pub fn new(state: AppState, session: SessionStore) -> Self {
        Self {
            state,
            session,
            route: Route::SignIn,
            navigator: Navigator::default(),
            sign_in: SignInForm::default(),
            sign_up: SignUpForm::default(),
            auth_error: None,
            notice: None,
            message: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Resolves the stored session, then opens `path`.
    pub async fn start(&mut self, path: &str) {
        self.session.restore().await;
        self.go(Route::resolve(path));
    }

    fn go(&mut self, route: Route) {
        self.route = match guard::check(route, self.session.state()) {
            GuardDecision::Redirect(to) => {
                debug!("Redirecting {} to {}", route.path(), to.path());
                to
            }
            GuardDecision::Loading | GuardDecision::Render => route,
        };
        self.auth_error = None;
    }

    /// Applies one command. Failures are rendered, never returned.
    pub async fn handle(&mut self, cmd: Command) -> Flow {
        self.message = None;
        let result = match cmd {
            Command::Quit => return Flow::Quit,
            Command::Help => {
                self.message = Some(HELP.to_string());
                Ok(())
            }
            Command::Show => Ok(()),
            Command::Go(path) => {
                self.go(Route::resolve(&path));
                Ok(())
            }
            Command::Logout => {
                self.logout().await;
                Ok(())
            }
            other => match self.route {
                Route::SignIn | Route::SignUp => self.handle_auth_screen(other).await,
                Route::Dashboard => self.handle_shell(other).await,
            },
        };
        if let Err(e) = result {
            self.message = Some(e.user_message("Something went wrong."));
        }
        Flow::Continue
    }

    async fn handle_auth_screen(&mut self, cmd: Command) -> crate::errors::Result<()> {
        match (self.route, cmd) {
            (Route::SignIn, Command::Set { field, value }) => {
                match field.as_str() {
                    "email" => self.sign_in.email = value,
                    "password" => self.sign_in.password = value,
                    other => return Err(unknown_field(other)),
                }
                Ok(())
            }
            (Route::SignUp, Command::Set { field, value }) => {
                let f = &mut self.sign_up;
                match field.as_str() {
                    "full_name" | "name" => f.full_name = value,
                    "email" => f.email = value,
                    "password" => f.password = value,
                    "confirm_password" | "confirm" => f.confirm_password = value,
                    other => return Err(unknown_field(other)),
                }
                Ok(())
            }
            (Route::SignIn, Command::Submit) => {
                match self.session.sign_in(&self.sign_in).await {
                    Ok(()) => {
                        self.sign_in = SignInForm::default();
                        self.notice = None;
                        self.navigator.reset();
                        self.go(Route::Dashboard);
                    }
                    Err(e) => self.auth_error = Some(e.user_message("Failed to sign in")),
                }
                Ok(())
            }
            (Route::SignUp, Command::Submit) => {
                match self.session.sign_up(&self.sign_up).await {
                    Ok(()) => {
                        self.sign_up = SignUpForm::default();
                        self.go(Route::SignIn);
                        self.notice = Some(SIGN_UP_DONE.to_string());
                    }
                    Err(e) => self.auth_error = Some(e.user_message("Failed to sign up")),
                }
                Ok(())
            }
            _ => Err(ClientError::Validation(
                "Sign in first: set email, set password, submit.".to_string(),
            )),
        }
    }

    async fn handle_shell(&mut self, cmd: Command) -> crate::errors::Result<()> {
        let ctx = PanelContext::new(&self.state, &self.session);
        match cmd {
            Command::View(name) => {
                let action = name
                    .parse::<View>()
                    .map(NavAction::Show)
                    .ok()
                    .or_else(|| sidebar_action(&name))
                    .ok_or_else(|| ClientError::Validation(format!("Unknown view '{name}'")))?;
                match action {
                    NavAction::Show(view) => self.navigator.select(view, ctx).await,
                    NavAction::Logout => self.logout().await,
                }
                Ok(())
            }
            Command::Back => {
                self.navigator.back(ctx).await;
                Ok(())
            }
            Command::Set { field, value } => set_field(self.navigator.panel_mut(), &field, value),
            Command::File(path) => {
                let file = read_file(&path).await?;
                match self.navigator.panel_mut() {
                    ActivePanel::Upload(p) => p.select_file(file),
                    ActivePanel::Analyzer(p) => p.select_file(file),
                    ActivePanel::Jobs(p) => p.select_file(file),
                    _ => return Err(not_here("file")),
                }
                Ok(())
            }
            Command::Source(source) => {
                match self.navigator.panel_mut() {
                    ActivePanel::Analyzer(p) => p.set_source(source),
                    ActivePanel::Jobs(p) => p.set_source(source),
                    _ => return Err(not_here("source")),
                }
                Ok(())
            }
            Command::Submit => match self.navigator.panel_mut() {
                ActivePanel::Upload(p) => p.submit(ctx).await.map(|_| ()),
                ActivePanel::Builder(p) => p.generate(ctx).await,
                ActivePanel::Analyzer(p) => p.submit(ctx).await,
                ActivePanel::Jobs(p) => p.submit(ctx).await,
                _ => Err(not_here("submit")),
            },
            Command::Save => match self.navigator.panel_mut() {
                ActivePanel::Builder(p) => p.save_to_profile(ctx).await.map(|_| ()),
                _ => Err(not_here("save")),
            },
            Command::Confirm => match self.navigator.panel_mut() {
                ActivePanel::Upload(p) => p.confirm(ctx).await.map(|_| ()),
                ActivePanel::Builder(p) => p.confirm_save(ctx).await.map(|_| ()),
                _ => Err(not_here("confirm")),
            },
            Command::Cancel => {
                match self.navigator.panel_mut() {
                    ActivePanel::Upload(p) => p.cancel(),
                    ActivePanel::Builder(p) => p.cancel_save(),
                    _ => return Err(not_here("cancel")),
                }
                Ok(())
            }
            Command::Close => {
                match self.navigator.panel_mut() {
                    ActivePanel::Upload(p) => p.dismiss(),
                    ActivePanel::Builder(p) => p.dismiss(),
                    _ => return Err(not_here("close")),
                }
                Ok(())
            }
            Command::Export(dir) => {
                let ActivePanel::Builder(p) = self.navigator.panel() else {
                    return Err(not_here("export"));
                };
                let (name, bytes) = p.export_pdf(self.state.renderer.as_ref())?;
                let path = dir.unwrap_or_else(|| PathBuf::from(".")).join(name);
                tokio::fs::write(&path, &bytes).await?;
                info!("Exported resume to {}", path.display());
                self.message = Some(format!("Saved {}", path.display()));
                Ok(())
            }
            Command::Go(_) | Command::Logout | Command::Show | Command::Help | Command::Quit => {
                Ok(())
            }
        }
    }

    /// Signs out and lands on the sign-in route with a fresh navigator.
    async fn logout(&mut self) {
        self.session.sign_out().await;
        self.navigator.reset();
        self.go(Route::SignIn);
    }

    /// The current screen as text.
    pub fn render(&self) -> String {
        let mut out = match guard::check(self.route, self.session.state()) {
            GuardDecision::Loading => views::loading(),
            GuardDecision::Redirect(_) => views::sign_in(&self.sign_in, None, None),
            GuardDecision::Render => match self.route {
                Route::SignIn => views::sign_in(
                    &self.sign_in,
                    self.auth_error.as_deref(),
                    self.notice.as_deref(),
                ),
                Route::SignUp => views::sign_up(&self.sign_up, self.auth_error.as_deref()),
                Route::Dashboard => views::shell(
                    self.session.user(),
                    self.navigator.current(),
                    self.navigator.panel(),
                ),
            },
        };
        if let Some(msg) = &self.message {
            out.push_str(msg);
            out.push('\n');
        }
        out
    }
}

fn set_field(panel: &mut ActivePanel, field: &str, value: String) -> crate::errors::Result<()> {
    match (panel, field) {
        (ActivePanel::Builder(p), _) => p.set_field(field, value),
        (ActivePanel::Analyzer(p), "job_description") => {
            p.job_description = value;
            Ok(())
        }
        (ActivePanel::Jobs(p), "location") => {
            p.location = value;
            Ok(())
        }
        (_, other) => Err(unknown_field(other)),
    }
}

async fn read_file(path: &Path) -> crate::errors::Result<SelectedFile> {
    SelectedFile::from_path(path).await.map_err(|e| {
        warn!("Could not read {}: {e}", path.display());
        e
    })
}

fn unknown_field(name: &str) -> ClientError {
    ClientError::Validation(format!("Unknown field: {name}"))
}

fn not_here(command: &str) -> ClientError {
    ClientError::Validation(format!("'{command}' is not available on this screen."))
}

/// Reads commands from the terminal until `quit` or end of input.
pub async fn run(mut app: App) -> Result<()> {
    let mut editor: Editor<ShellHelper, DefaultHistory> = Editor::new()?;
    editor.set_helper(Some(ShellHelper));
    print!("{}", app.render());

    loop {
        // Needs the multi-threaded runtime; the prompt blocks this worker.
        let line = match tokio::task::block_in_place(|| editor.readline("> ")) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("Type 'quit' to exit.");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(usage) => {
                println!("{usage}");
                continue;
            }
        };
        let _ = editor.add_history_entry(line.as_str());
        if app.handle(cmd).await == Flow::Quit {
            break;
        }
        print!("{}", app.render());
    }

    info!("Shell closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::Config;
    use crate::panels::tests::FakeApi;
    use crate::render::PlainPdfRenderer;
    use crate::session::tests::FakeAuth;

    fn app(profile_exists: bool) -> (App, Arc<FakeApi>) {
        let api = Arc::new(FakeApi::new(profile_exists));
        let state = AppState {
            config: Config::for_tests("http://unused"),
            api: api.clone(),
            renderer: Arc::new(PlainPdfRenderer),
        };
        let session = SessionStore::new(Arc::new(FakeAuth::default()), None);
        (App::new(state, session), api)
    }

    async fn run_lines(app: &mut App, lines: &[&str]) {
        for line in lines {
            if let Some(cmd) = Command::parse(line).unwrap() {
                app.handle(cmd).await;
            }
        }
    }

    async fn signed_in(profile_exists: bool) -> (App, Arc<FakeApi>) {
        let (mut app, api) = app(profile_exists);
        app.start("/").await;
        run_lines(
            &mut app,
            &["set email ada@example.com", "set password hunter22", "submit"],
        )
        .await;
        (app, api)
    }

    #[tokio::test]
    async fn test_loading_placeholder_before_restore() {
        let (mut app, _) = app(false);
        app.route = Route::Dashboard;
        assert_eq!(app.render(), "Loading...\n");
        app.start("/dashboard").await;
        assert_eq!(app.route(), Route::SignIn);
    }

    #[tokio::test]
    async fn test_unknown_path_lands_on_sign_in() {
        let (mut app, _) = app(false);
        app.start("/nowhere").await;
        assert_eq!(app.route(), Route::SignIn);
        assert!(app.render().contains("== Sign In =="));
    }

    #[tokio::test]
    async fn test_sign_in_opens_dashboard() {
        let (app, _) = signed_in(false).await;
        assert_eq!(app.route(), Route::Dashboard);
        assert_eq!(app.navigator().current(), View::Dashboard);
        assert!(app.render().starts_with("[Ada Lovelace]"));
    }

    #[tokio::test]
    async fn test_bad_password_stays_on_sign_in() {
        let (mut app, _) = app(false);
        app.start("/").await;
        run_lines(&mut app, &["set email ada@example.com", "set password nope", "submit"]).await;
        assert_eq!(app.route(), Route::SignIn);
        assert!(app.render().contains("Error: Invalid login credentials"));
    }

    #[tokio::test]
    async fn test_sign_up_returns_to_sign_in_with_notice() {
        let (mut app, _) = app(false);
        app.start("/signup").await;
        run_lines(
            &mut app,
            &[
                "set full_name Ada Lovelace",
                "set email ada@example.com",
                "set password abcdef",
                "set confirm abcdef",
                "submit",
            ],
        )
        .await;
        assert_eq!(app.route(), Route::SignIn);
        assert!(app.render().contains(SIGN_UP_DONE));
        assert!(app.session().session().is_none());
    }

    #[tokio::test]
    async fn test_sidebar_logout_returns_to_sign_in() {
        let (mut app, _) = signed_in(false).await;
        run_lines(&mut app, &["view builder", "view Logout"]).await;
        assert_eq!(app.route(), Route::SignIn);
        assert!(app.session().session().is_none());
        assert_eq!(app.navigator().current(), View::Dashboard);

        run_lines(&mut app, &["go /dashboard"]).await;
        assert_eq!(app.route(), Route::SignIn);
    }

    #[tokio::test]
    async fn test_job_search_from_shell() {
        let (mut app, api) = signed_in(true).await;
        run_lines(&mut app, &["view job-recommendations", "set location Berlin", "submit"]).await;
        let out = app.render();
        assert!(out.contains("Rust Engineer @ Acme (Berlin)"));
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_builder_export_writes_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = signed_in(false).await;
        run_lines(
            &mut app,
            &[
                "view builder",
                "set full_name Ada Lovelace",
                "set target_job_title Rust Engineer",
                "set skills Rust",
                "set work_experience Analytical Engines",
                "set education Self-taught",
                "set job_description Senior Rust engineer to build async services with Tokio and Axum.",
                "submit",
            ],
        )
        .await;
        let export = format!("export {}", dir.path().display());
        run_lines(&mut app, &[export.as_str()]).await;

        let bytes = std::fs::read(dir.path().join("Ada_Lovelace_Resume.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_export_cannot_escape_target_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b");
        std::fs::create_dir_all(&out).unwrap();
        let (mut app, _) = signed_in(false).await;
        run_lines(
            &mut app,
            &[
                "view builder",
                "set full_name ../../escaped",
                "set target_job_title Rust Engineer",
                "set skills Rust",
                "set work_experience Analytical Engines",
                "set education Self-taught",
                "set job_description Senior Rust engineer to build async services with Tokio and Axum.",
                "submit",
            ],
        )
        .await;
        let export = format!("export {}", out.display());
        run_lines(&mut app, &[export.as_str()]).await;

        assert!(out.join("______escaped_Resume.pdf").exists());
        assert!(!dir.path().join("escaped_Resume.pdf").exists());
    }

    #[tokio::test]
    async fn test_command_on_wrong_screen_is_reported() {
        let (mut app, _) = signed_in(false).await;
        run_lines(&mut app, &["save"]).await;
        assert!(app
            .render()
            .contains("'save' is not available on this screen."));
    }
}
