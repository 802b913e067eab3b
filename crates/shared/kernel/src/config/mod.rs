use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use wspec_domain::config::AppConfig;

/// Prefix for environment overrides (`WSPEC__KNOWLEDGE__KB_PATH`).
pub const ENV_PREFIX: &str = "WSPEC";

/// Base name of the config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG: &str = "winspector";

/// Custom error type for config loading.
#[wspec_derive::wspec_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// A reusable configuration loader that combines file-based settings with environment overrides.
///
/// This function implements a layered configuration strategy:
/// 1. **Base File**: Loads settings from a file (e.g., `winspector.toml`). An explicit path must
///    exist; the implicit default (`winspector.*` in the working directory) is optional, so the
///    built-in defaults apply when it is absent.
/// 2. **Environment Overrides**: Overlays values from environment variables prefixed with `WSPEC__`.
///    Nested structures are accessed using double underscores (e.g., `WSPEC__KNOWLEDGE__STRICT`
///    maps to `knowledge.strict`).
///
/// # Errors
/// This function will return an error if:
/// * An explicitly specified configuration file cannot be found.
/// * The content of the file does not match the structure of type `T`.
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (effective_path, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), required, "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}

/// Loads the [`AppConfig`] and rebases relative knowledge file paths onto the
/// directory of the config file, so a config can ship next to its data.
///
/// # Errors
/// Same as [`load_config`].
pub fn load_app_config(path: Option<impl AsRef<Path>>) -> Result<AppConfig, ConfigError> {
    let base = path
        .as_ref()
        .and_then(|p| p.as_ref().parent())
        .filter(|dir| !dir.as_os_str().is_empty())
        .map(Path::to_path_buf);

    let mut config: AppConfig = load_config(path)?;

    if let Some(base) = base {
        let knowledge = &mut config.knowledge;
        knowledge.kb_path = rebase(&knowledge.kb_path, &base);
        knowledge.blocklist_path = knowledge.blocklist_path.as_deref().map(|p| rebase(p, &base));
        knowledge.domains_path = knowledge.domains_path.as_deref().map(|p| rebase(p, &base));
        debug!(base = %base.display(), "Rebased knowledge paths onto config directory");
    }

    Ok(config)
}

/// Joins `path` onto `base` unless it is already absolute.
#[must_use]
pub fn rebase(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() { path.to_path_buf() } else { base.join(path) }
}
