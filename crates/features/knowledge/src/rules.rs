//! # Rule Sets
//!
//! The two risk categories of the knowledge base (`absolutely_critical` and
//! `highly_recommended_to_remove`), each holding one identifier set per
//! [`ComponentKind`].
//!
//! Identifiers are matched case-insensitively because Windows service, package
//! and task names are. The first spelling seen is kept for display and
//! re-serialisation.

use crate::error::{KnowledgeError, KnowledgeErrorExt};
use fxhash::FxHashSet;
use serde::de::{SeqAccess, Visitor};
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::warn;
use wspec_domain::component::ComponentKind;
use wspec_domain::constants::{ABSOLUTELY_CRITICAL, HIGHLY_RECOMMENDED_TO_REMOVE};

/// A risk category section of the knowledge base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskCategory {
    /// Components that must never be disabled or removed.
    Critical,
    /// Components that are safe and worthwhile to remove.
    RecommendedRemoval,
}

impl RiskCategory {
    pub const ALL: [Self; 2] = [Self::Critical, Self::RecommendedRemoval];

    #[must_use]
    pub const fn section_key(self) -> &'static str {
        match self {
            Self::Critical => ABSOLUTELY_CRITICAL,
            Self::RecommendedRemoval => HIGHLY_RECOMMENDED_TO_REMOVE,
        }
    }
}

/// Normalized lookup key for an identifier.
pub(crate) fn id_key(id: &str) -> String {
    id.trim().to_lowercase()
}

/// An ordered set of identifiers compared case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct IdentifierSet {
    entries: Vec<String>,
    index: FxHashSet<String>,
}

impl IdentifierSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an identifier. Returns `false` if an identifier differing at most
    /// in case was already present, or if it is blank.
    pub fn insert(&mut self, id: impl Into<String>) -> bool {
        let id = id.into().trim().to_owned();
        if id.is_empty() || !self.index.insert(id_key(&id)) {
            return false;
        }
        self.entries.push(id);
        true
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(&id_key(id))
    }

    /// Returns the stored spelling of `id`, if present.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&str> {
        let key = id_key(id);
        if !self.index.contains(&key) {
            return None;
        }
        self.entries.iter().map(String::as_str).find(|e| id_key(e) == key)
    }

    /// Iterates identifiers in file order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The lowercase keys of the set, for order-independent comparison.
    #[must_use]
    pub const fn keys(&self) -> &FxHashSet<String> {
        &self.index
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

impl PartialEq for IdentifierSet {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for IdentifierSet {}

impl<S: Into<String>> FromIterator<S> for IdentifierSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

impl Serialize for IdentifierSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for id in &self.entries {
            seq.serialize_element(id)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for IdentifierSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SetVisitor;

        impl<'de> Visitor<'de> for SetVisitor {
            type Value = IdentifierSet;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a list of component identifiers")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(IdentifierSet::new())
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut set = IdentifierSet::new();
                while let Some(id) = seq.next_element::<String>()? {
                    if !set.insert(id.as_str()) {
                        warn!(id = %id, "Duplicate or blank identifier collapsed");
                    }
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(SetVisitor)
    }
}

/// One identifier set per component kind. Missing kinds are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KindLists {
    pub services: IdentifierSet,
    pub uwp_apps: IdentifierSet,
    pub scheduled_tasks: IdentifierSet,
}

impl KindLists {
    #[must_use]
    pub const fn get(&self, kind: ComponentKind) -> &IdentifierSet {
        match kind {
            ComponentKind::Service => &self.services,
            ComponentKind::UwpApp => &self.uwp_apps,
            ComponentKind::ScheduledTask => &self.scheduled_tasks,
        }
    }

    pub const fn get_mut(&mut self, kind: ComponentKind) -> &mut IdentifierSet {
        match kind {
            ComponentKind::Service => &mut self.services,
            ComponentKind::UwpApp => &mut self.uwp_apps,
            ComponentKind::ScheduledTask => &mut self.scheduled_tasks,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        ComponentKind::ALL.iter().map(|k| self.get(*k).len()).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An identifier present in both risk categories for the same kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleConflict {
    pub kind: ComponentKind,
    pub id: String,
}

impl fmt::Display for RuleConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' is both critical and recommended for removal", self.kind, self.id)
    }
}

/// The classification rule set of the knowledge base.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    pub absolutely_critical: KindLists,
    pub highly_recommended_to_remove: KindLists,
}

impl RuleSet {
    #[must_use]
    pub const fn category(&self, category: RiskCategory) -> &KindLists {
        match category {
            RiskCategory::Critical => &self.absolutely_critical,
            RiskCategory::RecommendedRemoval => &self.highly_recommended_to_remove,
        }
    }

    pub const fn category_mut(&mut self, category: RiskCategory) -> &mut KindLists {
        match category {
            RiskCategory::Critical => &mut self.absolutely_critical,
            RiskCategory::RecommendedRemoval => &mut self.highly_recommended_to_remove,
        }
    }

    #[must_use]
    pub fn contains(&self, category: RiskCategory, kind: ComponentKind, id: &str) -> bool {
        self.category(category).get(kind).contains(id)
    }

    /// Every identifier listed in both categories, per kind, in file order.
    #[must_use]
    pub fn conflicts(&self) -> Vec<RuleConflict> {
        ComponentKind::ALL
            .into_iter()
            .flat_map(|kind| {
                let removable = self.highly_recommended_to_remove.get(kind);
                self.absolutely_critical
                    .get(kind)
                    .iter()
                    .filter(move |id| removable.contains(id))
                    .map(move |id| RuleConflict { kind, id: id.to_owned() })
            })
            .collect()
    }

    /// Serializes both categories back to knowledge base YAML.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::Parse`] if YAML serialization fails.
    pub fn to_yaml(&self) -> Result<String, KnowledgeError> {
        serde_yaml::to_string(self).context("Failed to serialize rule set")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_set_is_case_insensitive_and_keeps_first_spelling() {
        let mut set = IdentifierSet::new();
        assert!(set.insert("DiagTrack"));
        assert!(!set.insert("diagtrack"));
        assert!(!set.insert("   "));

        assert!(set.contains("DIAGTRACK"));
        assert_eq!(set.get("diagTRACK"), Some("DiagTrack"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn null_kind_list_is_empty() {
        let lists: KindLists = serde_yaml::from_str("services:\nuwp_apps: [Microsoft.BingNews]\n")
            .expect("lists should parse");
        assert!(lists.services.is_empty());
        assert!(lists.scheduled_tasks.is_empty());
        assert_eq!(lists.len(), 1);
    }

    #[test]
    fn conflicts_are_detected_per_kind() {
        let mut rules = RuleSet::default();
        rules.absolutely_critical.services.insert("WinDefend");
        rules.highly_recommended_to_remove.services.insert("windefend");
        // Same name under another kind is not a conflict.
        rules.highly_recommended_to_remove.uwp_apps.insert("Spooler");
        rules.absolutely_critical.services.insert("Spooler");

        let conflicts = rules.conflicts();
        assert_eq!(
            conflicts,
            vec![RuleConflict { kind: ComponentKind::Service, id: "WinDefend".to_owned() }]
        );
        assert_eq!(
            conflicts[0].to_string(),
            "service 'WinDefend' is both critical and recommended for removal"
        );
    }
}
