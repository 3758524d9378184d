//! Tab completion for the interactive shell.

use rustyline::completion::{Completer, Pair};
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Helper};

use super::commands::WORDS;
use crate::navigator::View;

const ROUTES: [&str; 3] = ["/signin", "/signup", "/dashboard"];
const SOURCES: [&str; 2] = ["upload", "profile"];

/// Completes command words, then view names, routes and resume sources
/// for the commands that take them.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellHelper;

impl Helper for ShellHelper {}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Completer for ShellHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, words) = candidates(&line[..pos]);
        let pairs = words
            .into_iter()
            .map(|word| Pair {
                display: word.to_string(),
                replacement: word.to_string(),
            })
            .collect();
        Ok((start, pairs))
    }
}

/// Where the replacement starts, and the candidates for the text left of
/// the cursor.
pub fn candidates(before_cursor: &str) -> (usize, Vec<&'static str>) {
    let trimmed = before_cursor.trim_start();
    let Some((word, rest)) = trimmed.split_once(char::is_whitespace) else {
        let start = before_cursor.len() - trimmed.len();
        return (start, matching(WORDS, trimmed));
    };

    let arg = rest.trim_start();
    let start = before_cursor.len() - arg.len();
    if arg.contains(char::is_whitespace) {
        return (start, Vec::new());
    }
    let pool: Vec<&'static str> = match word.to_ascii_lowercase().as_str() {
        "view" | "open" => View::ALL.iter().map(|v| v.as_str()).collect(),
        "go" => ROUTES.to_vec(),
        "source" => SOURCES.to_vec(),
        _ => Vec::new(),
    };
    (start, matching(pool, arg))
}

fn matching(pool: impl IntoIterator<Item = &'static str>, prefix: &str) -> Vec<&'static str> {
    let prefix = prefix.to_ascii_lowercase();
    pool.into_iter().filter(|c| c.starts_with(&prefix)).collect()
}
