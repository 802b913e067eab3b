//! Kernel utilities shared across apps.
//! Keep this crate lightweight: layered config loading and path helpers.
//!
//! ## Config loading
//! ```rust,no_run
//! use wspec_kernel::config::load_app_config;
//!
//! let cfg = load_app_config(Some("winspector.toml")).unwrap();
//! println!("{}", cfg.knowledge.kb_path.display());
//! ```
pub mod config;

pub use wspec_domain as domain;
