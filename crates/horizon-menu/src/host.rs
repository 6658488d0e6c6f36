//! Collaborator interfaces.
//!
//! The menu subsystem does not own windows, surfaces, accounts or spelling
//! dictionaries. It talks to whoever does through the traits in this module.
//! All calls happen on the event thread.

use std::fmt;
use std::sync::Arc;

use horizon_menu_core::Signal;
use serde::{Deserialize, Serialize};

use crate::context::RawContextParams;

/// Process-unique identifier of a content surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Wrap a raw surface id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a top-level window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WindowId(u64);

impl WindowId {
    /// Wrap a raw window id.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw id.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// What the surface manager knows about a window that owns surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowInfo {
    /// The window's id.
    pub id: WindowId,
    /// The window's primary (root) surface, if it has one.
    pub primary_surface: Option<SurfaceId>,
    /// Whether this kind of window opts its primary surface out of menus.
    pub primary_surface_opts_out: bool,
}

/// A context menu request fired by a bound surface.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextRequest {
    /// The surface the user acted on.
    pub surface: SurfaceId,
    /// Facts the surface reported about the click target.
    pub params: RawContextParams,
}

/// Lifecycle signals exposed by the surface manager.
#[derive(Default)]
pub struct SurfaceEvents {
    /// Fired once per user request for a context menu on any surface.
    pub context_requested: Signal<ContextRequest>,
    /// Fired when a surface is destroyed.
    pub surface_destroyed: Signal<SurfaceId>,
}

impl SurfaceEvents {
    /// Create a new, unconnected set of surface events.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Editing primitives a surface supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EditCommand {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    PasteAndMatchStyle,
    SelectAll,
    Unselect,
}

/// In-page navigation primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    Back,
    Forward,
    Reload,
}

/// The window/surface manager.
pub trait SurfaceHost: Send + Sync {
    /// The manager's lifecycle signals.
    fn events(&self) -> Arc<SurfaceEvents>;

    /// Whether the surface still exists.
    fn is_alive(&self, surface: SurfaceId) -> bool;

    /// The top-level surface `surface` belongs to, if resolvable.
    fn root_surface(&self, surface: SurfaceId) -> Option<SurfaceId>;

    /// The window owning a root surface, if any.
    fn owning_window(&self, root: SurfaceId) -> Option<WindowInfo>;

    /// A window's primary surface, if it has one yet.
    fn primary_surface(&self, window: WindowId) -> Option<SurfaceId>;

    /// Whether the surface hosts an internal application page.
    fn is_internal_surface(&self, surface: SurfaceId) -> bool;

    /// Run an editing primitive on a surface.
    fn edit(&self, surface: SurfaceId, command: EditCommand);

    /// Replace the current selection (or misspelled word) with `text`.
    fn replace_selection(&self, surface: SurfaceId, text: &str);

    /// Run an in-page navigation primitive.
    fn navigate(&self, surface: SurfaceId, navigation: Navigation);

    /// Load a URL into a surface.
    fn load_url(&self, surface: SurfaceId, url: &str);

    /// Save the resource at `url` (download).
    fn download(&self, surface: SurfaceId, url: &str);

    /// Open developer tools focused on the element at a position.
    fn inspect_element(&self, surface: SurfaceId, x: i32, y: i32);
}

/// Application shell services: external apps, clipboard, app-level windows.
pub trait Shell: Send + Sync {
    /// Open a URL in the system's default handler.
    fn open_external(&self, url: &str, background: bool);

    /// Put text on the clipboard.
    fn copy_to_clipboard(&self, text: &str);

    /// Open a URL in a new popup content window.
    fn open_popup_window(&self, url: &str);

    /// Open a URL in a new window scoped to an account.
    fn open_account_window(&self, account_id: &str, url: &str);

    /// Open the application settings, optionally at a specific page.
    fn open_settings(&self, page: SettingsPage);
}

/// Settings pages commands can jump to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SettingsPage {
    General,
    Account(String),
    SpellcheckLanguage,
    Passwords,
    AddPassword,
}

/// A service/sub-account inside an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAccount {
    pub id: String,
    pub display_name: String,
    /// Asleep sub-accounts have no live surface until woken.
    #[serde(default)]
    pub asleep: bool,
}

/// A logical account known to the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub sub_accounts: Vec<SubAccount>,
}

impl Account {
    /// Find a sub-account by id.
    pub fn sub_account(&self, id: &str) -> Option<&SubAccount> {
        self.sub_accounts.iter().find(|s| s.id == id)
    }
}

/// Which account a surface belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccountAssociation {
    /// The surface is not bound to any account.
    #[default]
    None,
    /// The surface belongs to a sub-account of an account.
    Account {
        account_id: String,
        sub_account_id: String,
    },
}

impl AccountAssociation {
    /// The associated account id, if any.
    pub fn account_id(&self) -> Option<&str> {
        match self {
            Self::None => None,
            Self::Account { account_id, .. } => Some(account_id),
        }
    }
}

/// The account/identity store.
pub trait AccountDirectory: Send + Sync {
    /// All accounts in display order.
    fn accounts(&self) -> Vec<Account>;

    /// Which account a surface belongs to.
    fn association(&self, surface: SurfaceId) -> AccountAssociation;

    /// Make a sub-account the active one in its window.
    fn activate(&self, account_id: &str, sub_account_id: &str);

    /// Start waking an asleep sub-account. Completion is asynchronous.
    fn wake(&self, account_id: &str, sub_account_id: &str);

    /// The live surface of a sub-account, if it has one.
    fn surface_of(&self, account_id: &str, sub_account_id: &str) -> Option<SurfaceId>;
}

/// Ranked suggestions for one language.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LanguageSuggestions {
    pub language: String,
    pub suggestions: Vec<String>,
}

/// Suggestions for a misspelled word, from up to two dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpellingSuggestions {
    pub primary: Option<LanguageSuggestions>,
    pub secondary: Option<LanguageSuggestions>,
}

impl SpellingSuggestions {
    /// Whether both dictionaries are configured.
    pub fn is_dual_language(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }

    /// Both lists merged in rank order, primary first, without duplicates.
    pub fn merged(&self) -> Vec<String> {
        let mut merged: Vec<String> = Vec::new();
        for list in [&self.primary, &self.secondary].into_iter().flatten() {
            for suggestion in &list.suggestions {
                if !merged.contains(suggestion) {
                    merged.push(suggestion.clone());
                }
            }
        }
        merged
    }
}

/// The spelling service.
pub trait SpellingService: Send + Sync {
    /// Suggestions for a misspelled word.
    fn suggestions(&self, word: &str) -> SpellingSuggestions;

    /// Add a word to the user dictionary.
    fn add_to_dictionary(&self, word: &str);
}
