use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level application configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfigInner {
    pub knowledge: KnowledgeConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(flatten, default)]
    inner: Arc<AppConfigInner>,
}

impl Deref for AppConfig {
    type Target = AppConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for AppConfig {
    fn deref_mut(&mut self) -> &mut AppConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Locations of the static knowledge files and how strictly to load them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub kb_path: PathBuf,
    /// Flat telemetry blocklist, one domain per line.
    pub blocklist_path: Option<PathBuf>,
    /// Annotated domain list (YAML or JSON).
    pub domains_path: Option<PathBuf>,
    /// Fail the load when an identifier is both critical and recommended for removal.
    pub strict: bool,
}

/// Logging sinks. `level` is a tracing directive such as `info` or `wspec_knowledge=debug`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub console: bool,
    pub directory: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

// --- Default ---

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            kb_path: PathBuf::from("data/knowledge_base.yaml"),
            blocklist_path: Some(PathBuf::from("data/telemetry_domains.txt")),
            domains_path: Some(PathBuf::from("data/telemetry_domains.yaml")),
            strict: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, directory: None, json: false, max_files: 10 }
    }
}
