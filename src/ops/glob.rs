//! Glob pattern resolution.
//!
//! Patterns are normalized once (SQL `%` wildcards, working-directory
//! anchoring, canonicalized wildcard-free prefix) and then expanded by
//! repeatedly invoking the non-recursive platform primitive; a trailing
//! double-star segment re-expands one level per iteration under a fixed cap.

use std::ffi::OsStr;
use std::path::{Path, MAIN_SEPARATOR};

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::platform::glob::platform_glob;

bitflags! {
    /// Match filtering for pattern resolution.
    ///
    /// At least one of `FILES`/`FOLDERS` must be set for a resolution to
    /// produce results; the filtering step prunes everything otherwise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct GlobLimits: u32 {
        const FILES = 0b001;
        const FOLDERS = 0b010;
        /// Skip canonicalization of the wildcard-free pattern prefix.
        const NO_CANONICALIZE = 0b100;
    }
}

impl GlobLimits {
    pub const ALL: Self = Self::FILES.union(Self::FOLDERS);
}

impl Default for GlobLimits {
    fn default() -> Self {
        Self::ALL
    }
}

/// Iteration cap for recursive double-star expansion: a safety bound against
/// pathological or cyclic symlink structures, not an expected-case limit.
/// External tooling depends on the exact value; do not re-derive it.
pub const MAX_RECURSIVE_GLOBS: usize = 64;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobRequest {
    pub pattern: String,
    #[serde(default)]
    pub limits: GlobLimits,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobResponse {
    /// Matched paths; directory matches carry a trailing separator.
    pub matches: Vec<String>,
}

/// Expand a wildcard pattern (including recursive `**`) into a concrete,
/// filtered list of matching paths.
pub fn resolve_file_pattern(request: GlobRequest) -> Result<GlobResponse> {
    let mut matches = Vec::new();
    generate_globs(&request.pattern, request.limits, &mut matches)?;
    Ok(GlobResponse { matches })
}

/// List files directly in (or recursively under) a directory.
///
/// A nonexistent or non-directory target is a definitive failure, not an
/// empty result, so callers can distinguish "no matches" from "invalid
/// query target".
pub fn list_files_in_directory(path: &Path, recursive: bool) -> Result<Vec<String>> {
    list_in_absolute_directory(
        &path.join(if recursive { "**" } else { "*" }),
        GlobLimits::FILES,
    )
}

/// List directories directly in (or recursively under) a directory.
pub fn list_directories_in_directory(path: &Path, recursive: bool) -> Result<Vec<String>> {
    list_in_absolute_directory(
        &path.join(if recursive { "**" } else { "*" }),
        GlobLimits::FOLDERS,
    )
}

fn list_in_absolute_directory(path: &Path, limits: GlobLimits) -> Result<Vec<String>> {
    if path.file_name() == Some(OsStr::new("*")) {
        let parent = path.parent().unwrap_or_else(|| Path::new("")).to_path_buf();
        if !parent.exists() {
            return Err(Error::DirectoryNotFound(parent));
        }
        if !parent.is_dir() {
            return Err(Error::NotADirectory(parent));
        }
    }

    let mut results = Vec::new();
    generate_globs(&path.to_string_lossy(), limits, &mut results)?;
    Ok(results)
}

fn generate_globs(pattern: &str, limits: GlobLimits, results: &mut Vec<String>) -> Result<()> {
    let mut pattern = replace_glob_wildcards(pattern, limits);

    // Recurse for a trailing double star by re-expanding one level per
    // iteration, accumulating matches across iterations.
    let mut glob_index = 0;
    loop {
        glob_index += 1;
        if glob_index >= MAX_RECURSIVE_GLOBS {
            break;
        }

        let iteration = platform_glob(&pattern)?;
        let matched = !iteration.is_empty();
        results.extend(iteration);

        // The end state is a non-recursive ending or an empty iteration.
        if !matched || !ends_with_double_star(&pattern) {
            break;
        }
        pattern.push_str("/**");
    }

    filter_matches(results, limits);
    Ok(())
}

/// True when the pattern's last `**` is the final segment, allowing one
/// trailing separator after it.
fn ends_with_double_star(pattern: &str) -> bool {
    match pattern.rfind("**") {
        Some(index) => index + 3 >= pattern.len(),
        None => false,
    }
}

fn filter_matches(results: &mut Vec<String>, limits: GlobLimits) {
    results.retain(|found| {
        let is_folder = found.ends_with('/') || found.ends_with('\\');
        if is_folder {
            limits.contains(GlobLimits::FOLDERS)
        } else {
            limits.contains(GlobLimits::FILES)
        }
    });
}

/// Normalize a pattern in place before expansion: translate SQL `%`
/// wildcards, anchor relative patterns to the working directory, and
/// canonicalize the longest wildcard-free prefix (the wildcard suffix itself
/// cannot be canonicalized).
fn replace_glob_wildcards(pattern: &str, limits: GlobLimits) -> String {
    let mut pattern = pattern.replace('%', "*");

    // Relative patterns are a bad idea against a live host, but accommodate
    // them by anchoring to the current directory. `~` is left for the shell.
    if !pattern.starts_with('~') && Path::new(&pattern).is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            pattern = cwd.join(&pattern).to_string_lossy().into_owned();
        }
    }

    if limits.contains(GlobLimits::NO_CANONICALIZE) {
        return pattern;
    }

    let base_len = pattern.find('*').unwrap_or(pattern.len());
    let base = &pattern[..base_len];
    if base.is_empty() {
        return pattern;
    }

    // Canonicalization failure (nonexistent base) falls back to the
    // uncanonicalized pattern.
    let canonical = match std::fs::canonicalize(base) {
        Ok(canonical) => canonical,
        Err(_) => return pattern,
    };
    let mut canonical = canonical.to_string_lossy().into_owned();
    if canonical.is_empty() || canonical == base {
        return pattern;
    }
    if Path::new(&canonical).is_dir() && !canonical.ends_with(MAIN_SEPARATOR) {
        // Canonical directory paths drop the trailing separator, but a
        // following wildcard must keep meaning "children of this directory",
        // not "siblings of this directory".
        canonical.push(MAIN_SEPARATOR);
    }
    format!("{canonical}{}", &pattern[base_len..])
}

#[cfg(test)]
mod tests {
    use super::{ends_with_double_star, filter_matches, replace_glob_wildcards, GlobLimits};

    #[test]
    fn double_star_detection_allows_one_trailing_separator() {
        assert!(ends_with_double_star("/a/**"));
        assert!(ends_with_double_star("/a/**/"));
        assert!(!ends_with_double_star("/a/**/b"));
        assert!(!ends_with_double_star("/a/*"));
        assert!(!ends_with_double_star("/a/b"));
    }

    #[test]
    fn filtering_prunes_by_trailing_separator() {
        let mut results = vec![
            "/a/file".to_string(),
            "/a/dir/".to_string(),
            "/a/other".to_string(),
        ];
        filter_matches(&mut results, GlobLimits::FILES);
        assert_eq!(results, vec!["/a/file".to_string(), "/a/other".to_string()]);

        let mut results = vec!["/a/file".to_string(), "/a/dir/".to_string()];
        filter_matches(&mut results, GlobLimits::FOLDERS);
        assert_eq!(results, vec!["/a/dir/".to_string()]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let mut results = vec!["/a/file".to_string(), "/a/dir/".to_string()];
        filter_matches(&mut results, GlobLimits::FILES);
        let once = results.clone();
        filter_matches(&mut results, GlobLimits::FILES);
        assert_eq!(results, once);
    }

    #[test]
    fn sql_wildcards_translate_to_stars() {
        let pattern =
            replace_glob_wildcards("/nonexistent/db%", GlobLimits::ALL | GlobLimits::NO_CANONICALIZE);
        assert_eq!(pattern, "/nonexistent/db*");
    }

    #[test]
    fn default_limits_match_everything() {
        assert_eq!(GlobLimits::default(), GlobLimits::ALL);
        assert!(GlobLimits::default().contains(GlobLimits::FILES));
        assert!(GlobLimits::default().contains(GlobLimits::FOLDERS));
        assert!(!GlobLimits::default().contains(GlobLimits::NO_CANONICALIZE));
    }
}
