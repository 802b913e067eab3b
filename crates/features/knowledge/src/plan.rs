//! # Plan Vetting
//!
//! An optimisation plan proposes actions on components (`action_plan`) and
//! decisions per cleanup category (`cleanup_plan`). Before anything executes a
//! plan, [`PlanVetter`] filters it against the knowledge base:
//!
//! * action entries that do not parse are rejected on their own;
//! * actions on critical components are rejected;
//! * actions a component kind cannot take (removing a service) are rejected;
//! * cleanup decisions for unknown categories are dropped;
//! * low-safety categories are forced off for sensitive personas.

use crate::classifier::Classification;
use crate::error::{KnowledgeError, KnowledgeErrorExt};
use crate::heuristics::Safety;
use crate::loader::{KnowledgeBase, read_source};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use tracing::{info, warn};
use wspec_domain::component::ComponentKind;
use wspec_domain::persona::PersonaSet;

/// What to do with a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Disable,
    SetManual,
    Stop,
    Remove,
}

impl ActionKind {
    /// Whether a component of `kind` supports this action.
    #[must_use]
    pub const fn applies_to(self, kind: ComponentKind) -> bool {
        matches!(
            (kind, self),
            (ComponentKind::Service, Self::Disable | Self::SetManual | Self::Stop)
                | (ComponentKind::UwpApp, Self::Remove)
                | (ComponentKind::ScheduledTask, Self::Disable)
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Disable => "disable",
            Self::SetManual => "set_manual",
            Self::Stop => "stop",
            Self::Remove => "remove",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A proposed action. Fields beyond `type`, `id` and `action` are carried through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub id: String,
    pub action: ActionKind,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanupDecision {
    pub clean: bool,
}

/// An `action_plan` entry that could not be read as a [`PlannedAction`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedAction {
    /// Position in the submitted `action_plan`.
    pub index: usize,
    pub entry: serde_json::Value,
    pub message: String,
}

impl MalformedAction {
    /// `type:id` when the entry names both, `action_plan[index]` otherwise.
    #[must_use]
    pub fn item(&self) -> String {
        match (self.entry.get("type").and_then(|v| v.as_str()), self.entry.get("id")) {
            (Some(kind), Some(serde_json::Value::String(id))) => format!("{kind}:{id}"),
            _ => format!("action_plan[{}]", self.index),
        }
    }
}

/// A plan as produced by an advisor.
///
/// Both keys are required. Individual actions that do not parse are set
/// aside in [`malformed`](Self::malformed) instead of failing the plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPlan")]
pub struct OptimizationPlan {
    pub action_plan: Vec<PlannedAction>,
    pub cleanup_plan: BTreeMap<String, CleanupDecision>,
    #[serde(skip_serializing)]
    pub malformed: Vec<MalformedAction>,
}

#[derive(Deserialize)]
struct RawPlan {
    action_plan: Vec<serde_json::Value>,
    cleanup_plan: BTreeMap<String, CleanupDecision>,
}

impl From<RawPlan> for OptimizationPlan {
    fn from(raw: RawPlan) -> Self {
        let mut action_plan = Vec::with_capacity(raw.action_plan.len());
        let mut malformed = Vec::new();

        for (index, entry) in raw.action_plan.into_iter().enumerate() {
            match PlannedAction::deserialize(&entry) {
                Ok(action) => action_plan.push(action),
                Err(e) => {
                    warn!(index, error = %e, "Skipping malformed planned action");
                    malformed.push(MalformedAction { index, entry, message: e.to_string() });
                },
            }
        }

        Self { action_plan, cleanup_plan: raw.cleanup_plan, malformed }
    }
}

impl OptimizationPlan {
    /// Reads a plan file. `.json` files are parsed as JSON, anything else as YAML.
    ///
    /// # Errors
    /// Returns [`KnowledgeError::NotFound`] or a parse error. Only a plan that
    /// is not a mapping with `action_plan` and `cleanup_plan` fails; a bad
    /// action entry is kept in [`malformed`](Self::malformed).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KnowledgeError> {
        let path = path.as_ref();
        let source = read_source(path)?;
        let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let plan = if is_json { Self::from_json_str(&source) } else { Self::from_yaml_str(&source) };
        plan.context(format!("Failed to read plan {}", path.display()))
    }

    /// # Errors
    /// Returns [`KnowledgeError::Json`] for malformed input.
    pub fn from_json_str(source: &str) -> Result<Self, KnowledgeError> {
        Ok(serde_json::from_str(source)?)
    }

    /// # Errors
    /// Returns [`KnowledgeError::Parse`] for malformed input.
    pub fn from_yaml_str(source: &str) -> Result<Self, KnowledgeError> {
        Ok(serde_yaml::from_str(source)?)
    }
}

/// Why an item was removed or altered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectionReason {
    CriticalComponent,
    UnsupportedAction { action: ActionKind, kind: ComponentKind },
    UnknownCategory,
    SensitivePersona { safety: Safety },
    Malformed { message: String },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalComponent => f.write_str("component is critical"),
            Self::UnsupportedAction { action, kind } => {
                write!(f, "action '{action}' does not apply to a {kind}")
            },
            Self::UnknownCategory => f.write_str("cleanup category is not in the knowledge base"),
            Self::SensitivePersona { .. } => {
                f.write_str("low-safety category kept for a sensitive persona")
            },
            Self::Malformed { message } => write!(f, "malformed action: {message}"),
        }
    }
}

/// A rejected or downgraded plan item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    /// `kind:id` for actions, `cleanup:category` for cleanup entries.
    pub item: String,
    #[serde(flatten)]
    pub reason: RejectionReason,
}

/// The vetted plan plus everything that was taken out of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlanReview {
    pub accepted: OptimizationPlan,
    pub rejected: Vec<Rejection>,
}

/// Vets plans against a knowledge base for a given set of personas.
#[derive(Debug, Clone, Copy)]
pub struct PlanVetter<'kb> {
    kb: &'kb KnowledgeBase,
    personas: PersonaSet,
}

impl<'kb> PlanVetter<'kb> {
    #[must_use]
    pub const fn new(kb: &'kb KnowledgeBase, personas: PersonaSet) -> Self {
        Self { kb, personas }
    }

    #[must_use]
    pub fn vet(&self, plan: OptimizationPlan) -> PlanReview {
        let mut review = PlanReview::default();
        let classifier = self.kb.classifier();

        for malformed in plan.malformed {
            review.rejected.push(Rejection {
                item: malformed.item(),
                reason: RejectionReason::Malformed { message: malformed.message },
            });
        }

        for action in plan.action_plan {
            let reason = if classifier.classify(action.kind, &action.id) == Classification::Critical {
                Some(RejectionReason::CriticalComponent)
            } else if !action.action.applies_to(action.kind) {
                Some(RejectionReason::UnsupportedAction { action: action.action, kind: action.kind })
            } else {
                None
            };

            match reason {
                Some(reason) => {
                    warn!(kind = %action.kind, id = %action.id, %reason, "Rejected planned action");
                    review
                        .rejected
                        .push(Rejection { item: format!("{}:{}", action.kind, action.id), reason });
                },
                None => review.accepted.action_plan.push(action),
            }
        }

        let sensitive = self.personas.intersects(PersonaSet::SENSITIVE);

        for (category, decision) in plan.cleanup_plan {
            let item = format!("cleanup:{category}");

            if !decision.clean {
                review.accepted.cleanup_plan.insert(category, decision);
                continue;
            }

            let Some(rule) = self.kb.heuristic_rule(&category) else {
                warn!(%category, "Dropped cleanup decision for unknown category");
                review.rejected.push(Rejection { item, reason: RejectionReason::UnknownCategory });
                continue;
            };

            if sensitive && rule.safety == Safety::Low {
                warn!(%category, personas = ?self.personas, "Low-safety cleanup disabled for sensitive persona");
                review.rejected.push(Rejection {
                    item,
                    reason: RejectionReason::SensitivePersona { safety: rule.safety },
                });
                review.accepted.cleanup_plan.insert(category, CleanupDecision { clean: false });
            } else {
                review.accepted.cleanup_plan.insert(category, decision);
            }
        }

        info!(
            actions = review.accepted.action_plan.len(),
            cleanup = review.accepted.cleanup_plan.len(),
            rejected = review.rejected.len(),
            "Plan vetted"
        );
        review
    }
}
