//! Line-oriented command parser for the shell.

use std::path::PathBuf;

use crate::models::analysis::ResumeSource;

pub const HELP: &str = "\
Commands:
  go <path>              open /signin, /signup or /dashboard
  view <name>            open a view (dashboard, builder, resume-analyzer,
                         upload-resume, job-recommendations, profile-analytics)
                         or a sidebar entry by label
  back                   return to the dashboard
  set <field> <value>    edit a form field; \\n in the value starts a new line
  file <path>            pick a resume file
  source upload|profile  choose which resume to use
  submit                 run the current form's action
  save                   builder: save the generated resume to the profile
  confirm | cancel       answer an open confirmation dialog
  close                  close an open dialog without answering
  export [dir]           builder: write the generated resume as a PDF
  logout                 sign out
  show                   print the current screen again
  help                   this text
  quit                   exit";

/// Primary command words, offered by line completion.
pub const WORDS: [&str; 16] = [
    "go", "view", "back", "set", "file", "source", "submit", "save", "confirm", "cancel",
    "close", "export", "logout", "show", "help", "quit",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    View(String),
    Back,
    Set { field: String, value: String },
    File(PathBuf),
    Source(ResumeSource),
    Submit,
    Save,
    Confirm,
    Cancel,
    Close,
    Export(Option<PathBuf>),
    Logout,
    Show,
    Help,
    Quit,
}

impl Command {
    /// Parses one input line. Blank lines are `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Command>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let cmd = match word.to_ascii_lowercase().as_str() {
            "go" => Command::Go(required(rest, "go <path>")?.to_string()),
            "view" | "open" => Command::View(required(rest, "view <name>")?.to_string()),
            "back" => Command::Back,
            "set" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .map(|(f, v)| (f, v.trim_start()))
                    .unwrap_or((rest, ""));
                Command::Set {
                    field: required(field, "set <field> <value>")?.to_string(),
                    value: value.replace("\\n", "\n"),
                }
            }
            "file" => Command::File(PathBuf::from(required(rest, "file <path>")?)),
            "source" => Command::Source(match rest.to_ascii_lowercase().as_str() {
                "upload" => ResumeSource::Upload,
                "profile" => ResumeSource::Profile,
                _ => return Err("Usage: source upload|profile".to_string()),
            }),
            "submit" => Command::Submit,
            "save" => Command::Save,
            "confirm" | "yes" => Command::Confirm,
            "cancel" | "no" => Command::Cancel,
            "close" => Command::Close,
            "export" | "download" => {
                Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest)))
            }
            "logout" | "signout" => Command::Logout,
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("Unknown command '{other}'. Type 'help'.")),
        };
        Ok(Some(cmd))
    }
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, String> {
    if value.is_empty() {
        Err(format!("Usage: {usage}"))
    } else {
        Ok(value)
    }
}
