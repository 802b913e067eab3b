//! Facade crate for `WinSpector`.
//! Re-exports domain/kernel primitives and the knowledge base core.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Load the app config with [`kernel::config::load_app_config`].
//! - Call [`load`] to read the knowledge files it points at.

pub use wspec_domain as domain;
pub use wspec_kernel as kernel;
pub use wspec_knowledge as knowledge;

use wspec_domain::config::AppConfig;
use wspec_knowledge::{KnowledgeBase, KnowledgeBaseLoader, KnowledgeError};

/// Loads the knowledge base described by the `[knowledge]` section of `config`.
///
/// # Errors
/// Returns any [`KnowledgeError`] raised while reading the configured files.
pub fn load(config: &AppConfig) -> Result<KnowledgeBase, KnowledgeError> {
    KnowledgeBaseLoader::from_config(&config.knowledge).load()
}

pub mod prelude {
    pub use wspec_domain::component::ComponentKind;
    pub use wspec_domain::persona::{Persona, PersonaSet};
    pub use wspec_knowledge::{
        Classification, Classifier, DomainVerdict, KnowledgeBase, KnowledgeBaseLoader,
        KnowledgeError, OptimizationPlan, PlanVetter, Profiler,
    };
}
