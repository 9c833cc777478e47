//! Non-recursive platform glob primitive.
//!
//! Matches POSIX glob(3) semantics: a `**` segment matches within a single
//! path level, exactly like `*`. Unbounded recursive descent is realized by
//! the caller re-invoking this primitive with an extended pattern (see
//! `ops::glob`). Directory matches carry a trailing separator so callers can
//! filter files from folders without re-statting.

use std::path::MAIN_SEPARATOR;

use crate::error::{Error, Result};

// glob(3) hides dotfiles from wildcards unless the dot is literal; the glob
// crate needs to be told.
const MATCH_OPTIONS: glob::MatchOptions = glob::MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: true,
};

pub(crate) fn platform_glob(pattern: &str) -> Result<Vec<String>> {
    // The glob crate expands `**` recursively on its own; collapse star runs
    // so each invocation descends exactly one level.
    let single_level = collapse_star_runs(pattern);
    let entries = glob::glob_with(&single_level, MATCH_OPTIONS)
        .map_err(|err| Error::InvalidPattern(format!("{pattern}: {err}")))?;

    let mut results = Vec::new();
    for entry in entries {
        let path = match entry {
            Ok(path) => path,
            // Unreadable entries are skipped, as glob(3) does.
            Err(_) => continue,
        };
        let mut text = path.to_string_lossy().into_owned();
        if path.is_dir() && !text.ends_with(MAIN_SEPARATOR) {
            text.push(MAIN_SEPARATOR);
        }
        results.push(text);
    }
    Ok(results)
}

fn collapse_star_runs(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut last_star = false;
    for ch in pattern.chars() {
        if ch == '*' && last_star {
            continue;
        }
        last_star = ch == '*';
        out.push(ch);
    }
    out
}
