//! # Classifier
//!
//! Membership lookups against a loaded [`KnowledgeBase`]. Unknown identifiers
//! and domains are an answer, not an error.

use crate::domains::{BlocklistEntry, DomainEntry, normalize_domain, self_and_parents};
use crate::loader::KnowledgeBase;
use crate::rules::{RiskCategory, RuleConflict};
use serde::Serialize;
use std::fmt;
use tracing::trace;
use wspec_domain::component::ComponentKind;

/// Risk classification of a component identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Critical,
    RecommendedRemoval,
    Unknown,
}

impl Classification {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::RecommendedRemoval => "recommended-removal",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the domain lists know about a host name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum DomainVerdict<'kb> {
    /// Present in the annotated catalog (possibly via a parent domain).
    Annotated { entry: &'kb DomainEntry },
    /// Present only in the flat blocklist.
    Blocklisted { entry: &'kb BlocklistEntry },
    Unknown,
}

/// Read-only queries over a knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'kb> {
    kb: &'kb KnowledgeBase,
}

impl<'kb> Classifier<'kb> {
    #[must_use]
    pub const fn new(kb: &'kb KnowledgeBase) -> Self {
        Self { kb }
    }

    /// Classifies `id` within `kind`, ignoring case.
    ///
    /// An identifier in both categories is [`Classification::Critical`].
    #[must_use]
    pub fn classify(&self, kind: ComponentKind, id: &str) -> Classification {
        let rules = self.kb.rules();
        let result = if rules.contains(RiskCategory::Critical, kind, id) {
            Classification::Critical
        } else if rules.contains(RiskCategory::RecommendedRemoval, kind, id) {
            Classification::RecommendedRemoval
        } else {
            Classification::Unknown
        };
        trace!(%kind, id, %result, "Classified component");
        result
    }

    /// Classifies `id` across every kind. A critical hit under any kind wins
    /// over a removal hit under another; otherwise kinds are tried in
    /// declaration order. Returns `None` when no kind knows the identifier.
    #[must_use]
    pub fn classify_any(&self, id: &str) -> Option<(ComponentKind, Classification)> {
        let hits: Vec<_> = ComponentKind::ALL
            .into_iter()
            .map(|kind| (kind, self.classify(kind, id)))
            .filter(|(_, c)| *c != Classification::Unknown)
            .collect();

        hits.iter().find(|(_, c)| *c == Classification::Critical).or_else(|| hits.first()).copied()
    }

    #[must_use]
    pub fn conflicts(&self) -> &'kb [RuleConflict] {
        self.kb.conflicts()
    }

    /// Looks up a host name in the domain lists.
    ///
    /// The name and then each parent domain is tried, so the most specific
    /// entry wins. At the same level the annotated catalog is preferred.
    #[must_use]
    pub fn lookup_domain(&self, name: &str) -> DomainVerdict<'kb> {
        let Some(domain) = normalize_domain(name) else {
            return DomainVerdict::Unknown;
        };

        for candidate in self_and_parents(&domain) {
            if let Some(entry) = self.kb.domains().get(candidate) {
                return DomainVerdict::Annotated { entry };
            }
            if let Some(entry) = self.kb.blocklist().get(candidate) {
                return DomainVerdict::Blocklisted { entry };
            }
        }

        DomainVerdict::Unknown
    }
}
