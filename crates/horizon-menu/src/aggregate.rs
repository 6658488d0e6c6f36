//! Section aggregation.
//!
//! [`compose`] folds an ordered list of sections into one template. Empty
//! sections vanish; every boundary between two non-empty sections gets
//! exactly one separator. The result never starts or ends with a separator
//! and never has two in a row, whatever the sections contained at their own
//! edges.

use crate::item::{MenuItem, MenuSection, MenuTemplate};

/// Compose sections into a final template.
pub fn compose<I>(sections: I) -> MenuTemplate
where
    I: IntoIterator<Item = MenuSection>,
{
    let mut items: Vec<MenuItem> = Vec::new();
    let mut pending_boundary = false;

    for section in sections {
        // A section holding nothing but separators counts as empty.
        if section.items().iter().all(MenuItem::is_separator) {
            continue;
        }
        if pending_boundary {
            push_item(&mut items, MenuItem::separator());
        }
        for item in section.items() {
            push_item(&mut items, item.clone());
        }
        pending_boundary = true;
    }

    while items.last().is_some_and(MenuItem::is_separator) {
        items.pop();
    }
    MenuTemplate::from_items(items)
}

/// Number of sections [`compose`] keeps.
///
/// Equals the template's group count when no section carries separators of
/// its own.
pub fn section_count<'a, I>(sections: I) -> usize
where
    I: IntoIterator<Item = &'a MenuSection>,
{
    sections
        .into_iter()
        .filter(|s| !s.items().iter().all(MenuItem::is_separator))
        .count()
}

fn push_item(items: &mut Vec<MenuItem>, item: MenuItem) {
    if item.is_separator() && items.last().is_none_or(MenuItem::is_separator) {
        return;
    }
    items.push(item);
}
