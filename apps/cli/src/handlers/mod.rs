pub mod classify;
pub mod domain;
pub mod plan;
pub mod profile;
pub mod rules;
pub mod validate;

use anyhow::{Context, Result};
use serde::Serialize;
use wspec::domain::config::AppConfig;
use wspec::prelude::KnowledgeBase;

/// How a handler prints its result.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    /// Prints `value` as pretty JSON in JSON mode, otherwise runs `text`.
    pub fn emit<T: Serialize>(self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value).context("Failed to serialise output")?);
        } else {
            text();
        }
        Ok(())
    }
}

pub(crate) fn load_kb(config: &AppConfig) -> Result<KnowledgeBase> {
    wspec::load(config).context("Knowledge base could not be loaded")
}
