//! Actions that take the current page outside the application.

use crate::context::ContextSnapshot;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render "Open Page in Browser" and "Copy Current Page Address".
pub fn render(snapshot: &ContextSnapshot, _inputs: &RenderInputs<'_>) -> MenuSection {
    if snapshot.is_internal_surface || !snapshot.is_http_page() {
        return MenuSection::empty();
    }
    let Some(url) = snapshot.page_url.clone() else {
        return MenuSection::empty();
    };
    MenuSection::new(vec![
        MenuItem::action(
            "Open Page in Browser",
            MenuCommand::OpenExternal {
                url: url.clone(),
                background: false,
            },
        ),
        MenuItem::action("Copy Current Page Address", MenuCommand::CopyText { text: url }),
    ])
}
