//! Section renderers.
//!
//! Each renderer is a pure function from a [`ContextSnapshot`] (plus read-only
//! [`RenderInputs`]) to a [`MenuSection`]. Renderers never perform I/O: any
//! data that needs a collaborator, like spelling suggestions or the account
//! list, is fetched before rendering and handed in through `RenderInputs`.
//!
//! [`render_sections`] runs every renderer in the fixed order that decides
//! final menu order:
//!
//! 1. spelling suggestions
//! 2. link actions
//! 3. lookup / search
//! 4. undo / redo
//! 5. editing (cut/copy/paste, or image actions)
//! 6. in-page navigation
//! 7. external-open actions
//! 8. extension-contributed items
//! 9. application-level actions

pub mod application;
pub mod editing;
pub mod external;
pub mod link;
pub mod lookup;
pub mod navigation;
pub mod spelling;
pub mod undo;

use crate::config::MenuConfig;
use crate::context::ContextSnapshot;
use crate::host::{Account, SpellingSuggestions};
use crate::item::MenuSection;

/// Read-only data renderers may consult besides the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct RenderInputs<'a> {
    pub config: &'a MenuConfig,
    /// All known accounts, in display order.
    pub accounts: &'a [Account],
    /// Prefetched suggestions for the snapshot's misspelled word.
    pub suggestions: Option<&'a SpellingSuggestions>,
}

impl<'a> RenderInputs<'a> {
    /// Inputs with no accounts and no suggestions.
    pub fn new(config: &'a MenuConfig) -> Self {
        Self {
            config,
            accounts: &[],
            suggestions: None,
        }
    }

    pub fn with_accounts(mut self, accounts: &'a [Account]) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_suggestions(mut self, suggestions: Option<&'a SpellingSuggestions>) -> Self {
        self.suggestions = suggestions;
        self
    }
}

/// Run every synchronous renderer in menu order.
///
/// The extension section is built separately by the tree builder and slotted
/// into its fixed position here. Empty sections are kept; the aggregator
/// decides what to elide.
pub fn render_sections(
    snapshot: &ContextSnapshot,
    inputs: &RenderInputs<'_>,
    extension_section: MenuSection,
) -> Vec<MenuSection> {
    vec![
        spelling::render(snapshot, inputs),
        link::render(snapshot, inputs),
        lookup::render(snapshot, inputs),
        undo::render(snapshot, inputs),
        editing::render(snapshot, inputs),
        navigation::render(snapshot, inputs),
        external::render(snapshot, inputs),
        extension_section,
        application::render(snapshot, inputs),
    ]
}
