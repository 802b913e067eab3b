//! # Heuristic Cleanup Rules
//!
//! Rules describing disposable cache and log files. A *heuristic* rule scans a
//! `search_path` for files filtered by extension and age; a *direct* rule names
//! whole directories under `paths`. This module only decides whether a given
//! file is a cleanup candidate. Walking directories and deleting files is left
//! to the caller.

use crate::error::KnowledgeError;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

/// How safe it is to clean a category without asking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Safety {
    Low,
    #[default]
    Medium,
    High,
}

impl Safety {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for Safety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cleanup rule keyed by its category id in `heuristic_rules`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicRule {
    pub description: String,
    /// Scan `search_path` with the filters below instead of cleaning `paths` wholesale.
    pub heuristic: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub paths: Vec<String>,
    /// Minimum age in days. Absent means any age.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age_days: Option<u32>,
    /// Accepted file extensions, with or without the leading dot. Empty means any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub extensions: Vec<String>,
    /// Path prefixes that are never candidates.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
    pub safety: Safety,
}

/// A file observed on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Matching files of one rule: how many and how many bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupTally {
    pub count: usize,
    pub size: u64,
}

impl FileCandidate {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, size: u64, modified: SystemTime) -> Self {
        Self { path: path.into(), size, modified }
    }
}

impl HeuristicRule {
    /// Checks that the rule names the paths its mode needs.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::Invalid`] naming the category.
    pub fn validate(&self, category: &str) -> Result<(), KnowledgeError> {
        let blank = |s: &str| s.trim().is_empty();

        if self.heuristic && self.search_path.as_deref().is_none_or(blank) {
            return Err(KnowledgeError::invalid(format!(
                "heuristic rule '{category}' has no search_path"
            )));
        }
        if !self.heuristic && self.paths.iter().all(|p| blank(p)) {
            return Err(KnowledgeError::invalid(format!(
                "direct rule '{category}' lists no paths"
            )));
        }
        if self.extensions.iter().any(|e| blank(e.trim_start_matches('.'))) {
            return Err(KnowledgeError::invalid(format!(
                "rule '{category}' has an empty extension"
            )));
        }
        Ok(())
    }

    /// The directories this rule covers, with environment references expanded.
    #[must_use]
    pub fn roots(&self) -> Vec<PathBuf> {
        let raw: Vec<&String> =
            if self.heuristic { self.search_path.iter().collect() } else { self.paths.iter().collect() };
        raw.into_iter().map(|p| PathBuf::from(expand_env(p).into_owned())).collect()
    }

    /// Whether `candidate` should be offered for cleanup at time `now`.
    ///
    /// A heuristic rule only looks at files directly inside its `search_path`;
    /// a direct rule covers everything beneath its `paths`. The file must also
    /// carry an accepted extension, be older than `age_days`, and sit outside
    /// every `exclude` prefix. Path comparisons ignore case and separator style.
    #[must_use]
    pub fn matches(&self, candidate: &FileCandidate, now: SystemTime) -> bool {
        let path = fold(&candidate.path.to_string_lossy());
        let in_root = |root: &PathBuf| {
            let root = fold(&root.to_string_lossy());
            if self.heuristic { directly_in(&path, &root) } else { under(&path, &root) }
        };

        self.roots().iter().any(in_root)
            && self.extension_matches(&path)
            && self.is_old_enough(candidate.modified, now)
            && !self.exclude.iter().any(|ex| under(&path, &fold(&expand_env(ex))))
    }

    /// Counts the matching candidates and adds up their sizes.
    #[must_use]
    pub fn tally<'a, I>(&self, candidates: I, now: SystemTime) -> CleanupTally
    where
        I: IntoIterator<Item = &'a FileCandidate>,
    {
        candidates.into_iter().filter(|c| self.matches(c, now)).fold(
            CleanupTally::default(),
            |mut tally, c| {
                tally.count += 1;
                tally.size = tally.size.saturating_add(c.size);
                tally
            },
        )
    }

    fn extension_matches(&self, folded_path: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        self.extensions.iter().any(|ext| {
            let ext = ext.trim().trim_start_matches('.').to_lowercase();
            folded_path.ends_with(&format!(".{ext}"))
        })
    }

    fn is_old_enough(&self, modified: SystemTime, now: SystemTime) -> bool {
        let Some(days) = self.age_days else { return true };
        let threshold = Duration::from_secs(u64::from(days) * SECONDS_PER_DAY);
        now.duration_since(modified).is_ok_and(|age| age > threshold)
    }
}

/// Lowercases and normalizes separators to `\`, dropping a trailing separator.
fn fold(path: &str) -> String {
    let folded = path.to_lowercase().replace('/', "\\");
    folded.trim_end_matches('\\').to_owned()
}

/// `path` equals `prefix` or lies beneath it.
fn under(path: &str, prefix: &str) -> bool {
    !prefix.is_empty()
        && path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest.starts_with('\\'))
}

/// `path` names an entry immediately inside `dir`.
fn directly_in(path: &str, dir: &str) -> bool {
    !dir.is_empty()
        && path
            .strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('\\'))
            .is_some_and(|name| !name.is_empty() && !name.contains('\\'))
}

/// Expands `%VAR%` and `${VAR}` references from the process environment.
///
/// Unknown variables are left untouched.
#[must_use]
pub fn expand_env(input: &str) -> Cow<'_, str> {
    expand_with(input, |name| std::env::var(name).ok())
}

/// Expands `%VAR%` and `${VAR}` references using `lookup`.
pub fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Cow<'_, str> {
    if !input.contains('%') && !input.contains("${") {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(['%', '$']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        let reference = if let Some(after) = tail.strip_prefix("${") {
            after.find('}').map(|end| (&after[..end], end + 3))
        } else if let Some(after) = tail.strip_prefix('%') {
            after.find('%').map(|end| (&after[..end], end + 2))
        } else {
            None
        };

        match reference {
            Some((name, consumed)) if is_var_name(name) => {
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => out.push_str(&tail[..consumed]),
                }
                rest = &tail[consumed..];
            },
            _ => {
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            },
        }
    }

    out.push_str(rest);
    Cow::Owned(out)
}

fn is_var_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '(' || c == ')')
}

/// Whether `path` equals `root` or lies beneath it, ignoring case and separator style.
#[must_use]
pub fn is_within(path: &Path, root: &Path) -> bool {
    under(&fold(&path.to_string_lossy()), &fold(&root.to_string_lossy()))
}
