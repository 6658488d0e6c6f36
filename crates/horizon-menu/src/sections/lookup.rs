//! Lookup actions for selected text: dictionary add, search and translate.

use crate::config::MenuConfig;
use crate::context::ContextSnapshot;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render the lookup section.
pub fn render(snapshot: &ContextSnapshot, inputs: &RenderInputs<'_>) -> MenuSection {
    if !snapshot.has_selection() {
        return MenuSection::empty();
    }

    let text = &snapshot.selection_text;
    let display = display_selection(text, inputs.config);
    let mut items = Vec::with_capacity(3);

    if let Some(word) = snapshot.editable_misspelling() {
        items.push(MenuItem::action(
            "Add to Dictionary",
            MenuCommand::AddToDictionary {
                word: word.to_string(),
            },
        ));
    }
    items.push(MenuItem::action(
        format!("Search {} for \u{201c}{display}\u{201d}", inputs.config.search.name),
        MenuCommand::Search {
            query: text.clone(),
        },
    ));
    items.push(MenuItem::action(
        format!("Translate \u{201c}{display}\u{201d}"),
        MenuCommand::Translate { text: text.clone() },
    ));
    MenuSection::new(items)
}

/// The selection as shown in labels.
///
/// Selections of `selection_display_limit` characters or more are cut to
/// `selection_truncate_to` characters plus an ellipsis. Length is counted in
/// Unicode scalar values.
pub fn display_selection(text: &str, config: &MenuConfig) -> String {
    if text.chars().count() < config.selection_display_limit {
        return text.to_string();
    }
    let mut display: String = text.chars().take(config.selection_truncate_to).collect();
    display.push('\u{2026}');
    display
}
