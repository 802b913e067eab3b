//! # Knowledge Base Loader
//!
//! Reads `knowledge_base.yaml` (and optionally the domain lists) into an
//! immutable [`KnowledgeBase`]. Loading is all-or-nothing: any syntax error,
//! missing required section or invalid rule fails the whole load.

use crate::classifier::Classifier;
use crate::domains::{Blocklist, DomainCatalog};
use crate::error::{KnowledgeError, KnowledgeErrorExt};
use crate::heuristics::HeuristicRule;
use crate::profiler::{Profiler, UserProfileMarkers};
use crate::rules::{KindLists, RuleConflict, RuleSet};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use wspec_domain::config::KnowledgeConfig;
use wspec_domain::constants::{
    ABSOLUTELY_CRITICAL, HEURISTIC_RULES, HIGHLY_RECOMMENDED_TO_REMOVE, USER_PROFILER_CONFIG,
};

const REQUIRED_SECTIONS: [&str; 2] = [ABSOLUTELY_CRITICAL, HIGHLY_RECOMMENDED_TO_REMOVE];
const OPTIONAL_SECTIONS: [&str; 2] = [USER_PROFILER_CONFIG, HEURISTIC_RULES];

/// Reads a knowledge file, reporting a missing file as [`KnowledgeError::NotFound`].
pub(crate) fn read_source(path: &Path) -> Result<String, KnowledgeError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => KnowledgeError::NotFound { path: path.to_path_buf(), context: None },
        _ => KnowledgeError::Io {
            source: e,
            context: Some(format!("Failed to read {}", path.display()).into()),
        },
    })
}

#[derive(Deserialize)]
struct RawKnowledgeBase {
    #[serde(default)]
    user_profiler_config: Option<UserProfileMarkers>,
    absolutely_critical: KindLists,
    highly_recommended_to_remove: KindLists,
    #[serde(default)]
    heuristic_rules: BTreeMap<String, HeuristicRule>,
}

/// The loaded, read-only knowledge base.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    rules: RuleSet,
    markers: UserProfileMarkers,
    heuristic_rules: BTreeMap<String, HeuristicRule>,
    conflicts: Vec<RuleConflict>,
    blocklist: Blocklist,
    domains: DomainCatalog,
}

impl KnowledgeBase {
    /// Parses knowledge base YAML. Conflicts are logged and kept, never fatal.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::Parse`] for invalid YAML,
    /// [`KnowledgeError::MissingSection`] when a required section is absent and
    /// [`KnowledgeError::Invalid`] for a non-mapping root or an invalid rule.
    pub fn from_yaml_str(source: &str) -> Result<Self, KnowledgeError> {
        Self::parse(source, false)
    }

    fn parse(source: &str, strict: bool) -> Result<Self, KnowledgeError> {
        let mut root: Value =
            serde_yaml::from_str(source).context("Failed to parse knowledge base YAML")?;

        let Value::Mapping(map) = &mut root else {
            return Err(KnowledgeError::invalid("knowledge base root must be a mapping"));
        };

        for section in REQUIRED_SECTIONS {
            if !map.contains_key(section) {
                return Err(KnowledgeError::MissingSection { section: section.into(), context: None });
            }
        }

        // An empty `section:` means an empty section, not a type error.
        for section in REQUIRED_SECTIONS.into_iter().chain(OPTIONAL_SECTIONS) {
            if !map.get(section).is_some_and(Value::is_null) {
                continue;
            }
            if section == USER_PROFILER_CONFIG {
                map.remove(section);
            } else {
                map.insert(section.into(), Value::Mapping(Mapping::new()));
            }
        }

        let raw: RawKnowledgeBase =
            serde_yaml::from_value(root).context("Invalid knowledge base structure")?;

        for (category, rule) in &raw.heuristic_rules {
            rule.validate(category)?;
        }

        let rules = RuleSet {
            absolutely_critical: raw.absolutely_critical,
            highly_recommended_to_remove: raw.highly_recommended_to_remove,
        };

        let conflicts = rules.conflicts();
        if !conflicts.is_empty() {
            if strict {
                let message =
                    conflicts.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");
                return Err(KnowledgeError::Conflict { message: message.into(), context: None });
            }
            for conflict in &conflicts {
                warn!(kind = %conflict.kind, id = %conflict.id, "Identifier listed in both risk categories; treating as critical");
            }
        }

        let markers = raw.user_profiler_config.unwrap_or_else(|| {
            debug!("No user_profiler_config section, using built-in persona markers");
            UserProfileMarkers::default()
        });

        Ok(Self {
            rules,
            markers,
            heuristic_rules: raw.heuristic_rules,
            conflicts,
            blocklist: Blocklist::default(),
            domains: DomainCatalog::default(),
        })
    }

    /// Attaches a parsed blocklist.
    #[must_use]
    pub fn with_blocklist(mut self, blocklist: Blocklist) -> Self {
        self.blocklist = blocklist;
        self
    }

    /// Attaches a parsed domain catalog.
    #[must_use]
    pub fn with_domains(mut self, domains: DomainCatalog) -> Self {
        self.domains = domains;
        self
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleSet {
        &self.rules
    }

    #[must_use]
    pub const fn markers(&self) -> &UserProfileMarkers {
        &self.markers
    }

    #[must_use]
    pub const fn heuristic_rules(&self) -> &BTreeMap<String, HeuristicRule> {
        &self.heuristic_rules
    }

    #[must_use]
    pub fn heuristic_rule(&self, category: &str) -> Option<&HeuristicRule> {
        self.heuristic_rules.get(category)
    }

    /// Identifiers listed in both risk categories.
    #[must_use]
    pub fn conflicts(&self) -> &[RuleConflict] {
        &self.conflicts
    }

    #[must_use]
    pub const fn blocklist(&self) -> &Blocklist {
        &self.blocklist
    }

    #[must_use]
    pub const fn domains(&self) -> &DomainCatalog {
        &self.domains
    }

    #[must_use]
    pub const fn classifier(&self) -> Classifier<'_> {
        Classifier::new(self)
    }

    #[must_use]
    pub const fn profiler(&self) -> Profiler<'_> {
        Profiler::new(&self.markers)
    }
}

/// Builder for loading a [`KnowledgeBase`] from disk.
///
/// ```no_run
/// # use wspec_knowledge::KnowledgeBaseLoader;
/// let _kb = KnowledgeBaseLoader::new("data/knowledge_base.yaml")
///     .blocklist("data/telemetry_domains.txt")
///     .strict(true)
///     .load()?;
/// # Ok::<(), wspec_knowledge::KnowledgeError>(())
/// ```
#[derive(Debug, Clone)]
pub struct KnowledgeBaseLoader {
    kb_path: PathBuf,
    blocklist_path: Option<PathBuf>,
    domains_path: Option<PathBuf>,
    strict: bool,
}

impl KnowledgeBaseLoader {
    #[must_use = "The loader does nothing until `load` is called."]
    pub fn new(kb_path: impl Into<PathBuf>) -> Self {
        Self { kb_path: kb_path.into(), blocklist_path: None, domains_path: None, strict: false }
    }

    /// Creates a loader from the `[knowledge]` section of the app config.
    #[must_use = "The loader does nothing until `load` is called."]
    pub fn from_config(config: &KnowledgeConfig) -> Self {
        Self {
            kb_path: config.kb_path.clone(),
            blocklist_path: config.blocklist_path.clone(),
            domains_path: config.domains_path.clone(),
            strict: config.strict,
        }
    }

    #[must_use = "The loader does nothing until `load` is called."]
    pub fn blocklist(mut self, path: impl Into<PathBuf>) -> Self {
        self.blocklist_path = Some(path.into());
        self
    }

    #[must_use = "The loader does nothing until `load` is called."]
    pub fn domains(mut self, path: impl Into<PathBuf>) -> Self {
        self.domains_path = Some(path.into());
        self
    }

    /// Fail the load when an identifier is in both risk categories.
    #[must_use = "The loader does nothing until `load` is called."]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Reads and validates every configured file.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::NotFound`] for a missing file, any parse or
    /// validation error of the individual files, and
    /// [`KnowledgeError::Conflict`] in strict mode.
    pub fn load(self) -> Result<KnowledgeBase, KnowledgeError> {
        let path = &self.kb_path;
        let source = read_source(path)?;

        let mut kb = KnowledgeBase::parse(&source, self.strict)
            .context(format!("Failed to load {}", path.display()))?;

        if let Some(blocklist) = &self.blocklist_path {
            kb.blocklist = Blocklist::load(blocklist)?;
        }
        if let Some(domains) = &self.domains_path {
            kb.domains = DomainCatalog::load(domains)?;
        }

        info!(
            path = %path.display(),
            critical = kb.rules.absolutely_critical.len(),
            removable = kb.rules.highly_recommended_to_remove.len(),
            heuristic_rules = kb.heuristic_rules.len(),
            conflicts = kb.conflicts.len(),
            "Knowledge base loaded"
        );

        Ok(kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sections_are_empty_not_errors() {
        let kb = KnowledgeBase::from_yaml_str(
            "absolutely_critical:\nhighly_recommended_to_remove:\nheuristic_rules:\nuser_profiler_config:\n",
        )
        .expect("empty sections should load");

        assert!(kb.rules().absolutely_critical.is_empty());
        assert!(kb.heuristic_rules().is_empty());
        assert_eq!(kb.markers(), &UserProfileMarkers::default());
    }

    #[test]
    fn non_mapping_root_is_rejected() {
        let err = KnowledgeBase::from_yaml_str("- just\n- a list\n").expect_err("list root");
        assert!(matches!(err, KnowledgeError::Invalid { .. }));
    }

    #[test]
    fn invalid_heuristic_rule_fails_the_load() {
        let yaml = "absolutely_critical: {}\nhighly_recommended_to_remove: {}\nheuristic_rules:\n  temp:\n    heuristic: true\n";
        let err = KnowledgeBase::from_yaml_str(yaml).expect_err("rule without search_path");
        assert!(err.to_string().contains("temp"), "{err}");
    }
}
