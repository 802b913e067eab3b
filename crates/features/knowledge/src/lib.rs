//! # Knowledge Base
//!
//! The read-only core of WinSpector: loads the curated knowledge files and
//! answers questions about them.
//!
//! ## Architecture
//!
//! 1.  **Loading ([`loader`]):** [`KnowledgeBaseLoader`] reads `knowledge_base.yaml`
//!     and the optional domain lists into an immutable [`KnowledgeBase`].
//! 2.  **Classification ([`classifier`]):** is a service, UWP app or scheduled task
//!     critical, recommended for removal, or unknown? What do the domain lists say
//!     about a host name?
//! 3.  **Profiling ([`profiler`]):** which personas does the observed evidence point at?
//! 4.  **Cleanup rules ([`heuristics`])** and **plan vetting ([`plan`])**.
//!
//! The knowledge base is loaded once and passed by reference; every query type
//! borrows it.
//!
//! ```
//! use wspec_knowledge::{Classification, KnowledgeBase};
//! use wspec_knowledge::domain::component::ComponentKind;
//!
//! let kb = KnowledgeBase::from_yaml_str(
//!     "absolutely_critical: {services: [WinDefend]}\nhighly_recommended_to_remove: {services: [DiagTrack]}",
//! )?;
//! let classifier = kb.classifier();
//! assert_eq!(classifier.classify(ComponentKind::Service, "diagtrack"), Classification::RecommendedRemoval);
//! # Ok::<(), wspec_knowledge::KnowledgeError>(())
//! ```

pub mod classifier;
pub mod domains;
mod error;
pub mod heuristics;
pub mod loader;
pub mod plan;
pub mod profiler;
pub mod rules;

pub use crate::classifier::{Classification, Classifier, DomainVerdict};
pub use crate::domains::{Blocklist, BreakageRisk, DomainCatalog, DomainEntry, Provenance};
pub use crate::error::{KnowledgeError, KnowledgeErrorExt};
pub use crate::heuristics::{CleanupTally, FileCandidate, HeuristicRule, Safety};
pub use crate::loader::{KnowledgeBase, KnowledgeBaseLoader};
pub use crate::plan::{OptimizationPlan, PlanReview, PlanVetter};
pub use crate::profiler::{PersonaScore, Profiler, UserProfileMarkers};
pub use crate::rules::{RiskCategory, RuleConflict, RuleSet};
pub use wspec_domain as domain;
