use std::path::PathBuf;

use clap::Parser;

use crate::config::Config;

/// Command-line arguments. Anything given here wins over the environment.
#[derive(Parser, Debug)]
#[command(name = "client")]
#[command(about = "Terminal client for the resume builder, analyzer and job search")]
#[command(version)]
pub struct Cli {
    /// Path to open first, the way a browser opens a URL (/signin, /signup, /dashboard)
    #[arg(default_value = "/")]
    pub start: String,

    /// Backend base URL
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// File that keeps the session between runs
    #[arg(long)]
    pub session_file: Option<PathBuf>,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(url) = &self.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(path) = &self.session_file {
            config.session_file = Some(path.clone());
        }
    }
}
