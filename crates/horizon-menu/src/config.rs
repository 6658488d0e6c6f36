//! Menu configuration.
//!
//! Configuration is plain data with serde defaults for every field, so a
//! partial TOML document only overrides what it names:
//!
//! ```
//! use horizon_menu::config::{AccountLinkMode, MenuConfig};
//!
//! let config = MenuConfig::from_toml_str(r#"
//!     account_links = "expanded"
//!     developer_tools = true
//! "#).unwrap();
//!
//! assert_eq!(config.account_links, AccountLinkMode::Expanded);
//! assert_eq!(config.wake_settle_delay_ms, 500);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{MenuError, Result};

/// Placeholder replaced with the percent-encoded query in URL templates.
pub const QUERY_PLACEHOLDER: &str = "{query}";

/// How links fan out across accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountLinkMode {
    /// One "open in a new window" entry per account.
    #[default]
    Flat,
    /// One submenu per account listing each of its sub-accounts.
    Expanded,
}

/// The external search engine used by the lookup section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchEngine {
    /// Display name, e.g. "Google".
    pub name: String,
    /// URL template containing [`QUERY_PLACEHOLDER`].
    pub url_template: String,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self {
            name: "Google".to_string(),
            url_template: "https://www.google.com/search?q={query}".to_string(),
        }
    }
}

/// Configuration for menu composition and command dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    /// Per-account link fan-out mode.
    pub account_links: AccountLinkMode,
    /// Delay between waking a sub-account and loading a URL into it.
    pub wake_settle_delay_ms: u64,
    /// Whether "open link in background" is offered.
    pub open_in_background: bool,
    /// Selections this long or longer are truncated for display.
    pub selection_display_limit: usize,
    /// Number of characters kept when a selection is truncated.
    pub selection_truncate_to: usize,
    /// Translation URL template containing [`QUERY_PLACEHOLDER`].
    pub translate_url_template: String,
    /// Whether spellchecking (and the dictionary switch action) is enabled.
    pub spellcheck_enabled: bool,
    /// Whether the "inspect element" action is offered.
    pub developer_tools: bool,
    /// External search engine.
    pub search: SearchEngine,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            account_links: AccountLinkMode::Flat,
            wake_settle_delay_ms: 500,
            open_in_background: cfg!(target_os = "macos"),
            selection_display_limit: 50,
            selection_truncate_to: 47,
            translate_url_template: "https://translate.google.com/?text={query}".to_string(),
            spellcheck_enabled: true,
            developer_tools: false,
            search: SearchEngine::default(),
        }
    }
}

impl MenuConfig {
    /// Parse configuration from a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Load configuration from a TOML file.
    pub fn load_toml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| MenuError::io(path, e))?;
        Self::from_toml_str(&source)
    }

    /// The wake settling delay as a `Duration`.
    pub fn wake_settle_delay(&self) -> Duration {
        Duration::from_millis(self.wake_settle_delay_ms)
    }
}
