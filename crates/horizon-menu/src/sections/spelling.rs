//! Spelling suggestions for a flagged misspelling.

use crate::context::ContextSnapshot;
use crate::host::LanguageSuggestions;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Label of the disabled item shown when a list has no suggestions.
pub const NO_SUGGESTIONS: &str = "No Spelling Suggestions";

/// Render suggestion items for the misspelled word under the pointer.
///
/// With two dictionaries configured, each language gets its own labelled
/// list; otherwise the lists are merged. An empty list renders a disabled
/// placeholder instead of disappearing.
pub fn render(snapshot: &ContextSnapshot, inputs: &RenderInputs<'_>) -> MenuSection {
    if snapshot.editable_misspelling().is_none() {
        return MenuSection::empty();
    }

    let mut items = Vec::new();
    match inputs.suggestions {
        Some(suggestions) if suggestions.is_dual_language() => {
            let lists = [&suggestions.primary, &suggestions.secondary];
            for (i, list) in lists.into_iter().flatten().enumerate() {
                if i > 0 {
                    items.push(MenuItem::separator());
                }
                push_language(&mut items, list);
            }
        }
        Some(suggestions) => push_suggestions(&mut items, suggestions.merged()),
        None => push_suggestions(&mut items, Vec::new()),
    }
    MenuSection::new(items)
}

fn push_language(items: &mut Vec<MenuItem>, list: &LanguageSuggestions) {
    items.push(MenuItem::placeholder(list.language.clone()));
    push_suggestions(items, list.suggestions.clone());
}

fn push_suggestions(items: &mut Vec<MenuItem>, suggestions: Vec<String>) {
    if suggestions.is_empty() {
        items.push(MenuItem::placeholder(NO_SUGGESTIONS));
        return;
    }
    items.extend(suggestions.into_iter().map(|replacement| {
        MenuItem::action(
            replacement.clone(),
            MenuCommand::ReplaceMisspelling { replacement },
        )
    }));
}
