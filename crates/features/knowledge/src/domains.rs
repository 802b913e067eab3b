//! # Telemetry Domain Lists
//!
//! Two sources describe telemetry endpoints:
//!
//! * [`Blocklist`]: a flat text file, one domain per line, grouped under
//!   `#` comment headings. Hosts-file lines (`0.0.0.0 example.com`) are accepted.
//! * [`DomainCatalog`]: an annotated YAML or JSON list carrying a category,
//!   a breakage risk and provenance for each domain.
//!
//! Domains are stored lowercase without a trailing dot.

use crate::error::{KnowledgeError, KnowledgeErrorExt};
use crate::loader::read_source;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use tracing::{debug, info};

/// Normalizes a domain token, or returns `None` if it is not a host name.
///
/// A leading `*.` wildcard is dropped since lookups already match subdomains.
#[must_use]
pub fn normalize_domain(raw: &str) -> Option<String> {
    let lowered = raw.trim().trim_end_matches('.').to_lowercase();
    let domain = lowered.strip_prefix("*.").unwrap_or(&lowered);

    let valid = !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        });

    valid.then(|| domain.to_owned())
}

/// Yields `domain` and each of its parent domains, most specific first.
pub(crate) fn self_and_parents(domain: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(domain), |d| d.split_once('.').map(|(_, parent)| parent))
}

/// A blocklisted domain and the comment heading it appeared under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlocklistEntry {
    pub domain: String,
    pub group: Option<String>,
    /// 1-based line in the source file.
    pub line: usize,
}

/// The flat telemetry blocklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blocklist {
    entries: BTreeMap<String, BlocklistEntry>,
}

impl Blocklist {
    /// Reads and parses a blocklist file.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::NotFound`] if the file is missing, or
    /// [`KnowledgeError::Invalid`] for a malformed line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let list = Self::parse(&read_source(path)?)
            .context(format!("Failed to parse blocklist {}", path.display()))?;
        info!(path = %path.display(), domains = list.len(), "Loaded telemetry blocklist");
        Ok(list)
    }

    /// Parses blocklist text.
    ///
    /// Blank lines and `#` comment lines are skipped, trailing `# ...` comments
    /// are stripped. The last non-empty comment seen names the group of the
    /// domains that follow it.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::Invalid`] naming the first malformed line.
    pub fn parse(source: &str) -> Result<Self, KnowledgeError> {
        let mut entries = BTreeMap::new();
        let mut group: Option<String> = None;

        for (idx, raw) in source.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();

            if let Some(comment) = line.strip_prefix('#') {
                let heading = comment.trim_matches(|c: char| c == '#' || c.is_whitespace());
                if !heading.is_empty() {
                    group = Some(heading.to_owned());
                }
                continue;
            }

            let content = line.split_once('#').map_or(line, |(before, _)| before).trim();
            if content.is_empty() {
                continue;
            }

            let domain = parse_line(content).ok_or_else(|| {
                KnowledgeError::invalid(format!("line {line_no}: invalid domain entry '{content}'"))
            })?;

            if entries.contains_key(&domain) {
                debug!(domain = %domain, line = line_no, "Duplicate blocklist entry skipped");
                continue;
            }
            entries.insert(
                domain.clone(),
                BlocklistEntry { domain, group: group.clone(), line: line_no },
            );
        }

        Ok(Self { entries })
    }

    /// Exact lookup of an already normalized domain.
    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&BlocklistEntry> {
        self.entries.get(domain)
    }

    #[must_use]
    pub fn contains(&self, domain: &str) -> bool {
        normalize_domain(domain).is_some_and(|d| self.entries.contains_key(&d))
    }

    /// Domains in sorted order.
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn entries(&self) -> impl Iterator<Item = &BlocklistEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses the content of a non-comment line into a domain.
fn parse_line(content: &str) -> Option<String> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    match tokens.as_slice() {
        [domain] => normalize_domain(domain),
        [address, domain] if address.parse::<IpAddr>().is_ok() => normalize_domain(domain),
        _ => None,
    }
}

/// How likely blocking a domain is to break legitimate functionality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BreakageRisk {
    None,
    Low,
    Medium,
    High,
    Critical,
}

impl BreakageRisk {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for BreakageRisk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who added and verified an entry, and how sure they were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Provenance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified_by: Option<String>,
    /// In `[0.0, 1.0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEntry {
    pub domain: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    pub breakage_risk: BreakageRisk,
    #[serde(default)]
    pub provenance: Provenance,
}

/// Accepted shapes of an annotated domain file.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<DomainEntry>),
    Wrapped { domains: Vec<DomainEntry> },
}

impl CatalogFile {
    fn into_entries(self) -> Vec<DomainEntry> {
        match self {
            Self::List(entries) | Self::Wrapped { domains: entries } => entries,
        }
    }
}

/// The annotated domain list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainCatalog {
    entries: BTreeMap<String, DomainEntry>,
}

impl DomainCatalog {
    /// Reads an annotated list. Files ending in `.json` are parsed as JSON,
    /// anything else as YAML.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::NotFound`], a parse error, or
    /// [`KnowledgeError::Invalid`] for duplicate domains and bad confidence values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let source = read_source(path)?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let parsed =
            if is_json { Self::from_json_str(&source) } else { Self::from_yaml_str(&source) };
        let catalog = parsed.context(format!("Failed to load domain catalog {}", path.display()))?;

        info!(path = %path.display(), domains = catalog.len(), "Loaded domain catalog");
        Ok(catalog)
    }

    /// # Errors
    /// See [`DomainCatalog::load`].
    pub fn from_yaml_str(source: &str) -> Result<Self, KnowledgeError> {
        let file: CatalogFile = serde_yaml::from_str(source)?;
        Self::from_entries(file.into_entries())
    }

    /// # Errors
    /// See [`DomainCatalog::load`].
    pub fn from_json_str(source: &str) -> Result<Self, KnowledgeError> {
        let file: CatalogFile = serde_json::from_str(source)?;
        Self::from_entries(file.into_entries())
    }

    /// Builds a catalog, normalizing every domain.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::Invalid`] on an invalid or duplicate domain, or
    /// a confidence outside `[0, 1]`.
    pub fn from_entries(entries: Vec<DomainEntry>) -> Result<Self, KnowledgeError> {
        let mut map = BTreeMap::new();

        for mut entry in entries {
            let domain = normalize_domain(&entry.domain).ok_or_else(|| {
                KnowledgeError::invalid(format!("invalid domain '{}'", entry.domain))
            })?;

            if let Some(confidence) = entry.provenance.confidence
                && !(0.0..=1.0).contains(&confidence)
            {
                return Err(KnowledgeError::invalid(format!(
                    "confidence {confidence} for '{domain}' is outside [0, 1]"
                )));
            }

            if map.contains_key(&domain) {
                return Err(KnowledgeError::invalid(format!("duplicate domain '{domain}'")));
            }
            entry.domain.clone_from(&domain);
            map.insert(domain, entry);
        }

        Ok(Self { entries: map })
    }

    #[must_use]
    pub fn get(&self, domain: &str) -> Option<&DomainEntry> {
        self.entries.get(domain)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DomainEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
