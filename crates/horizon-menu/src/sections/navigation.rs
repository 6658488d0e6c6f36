//! In-page navigation, shown for plain page clicks.

use crate::context::ContextSnapshot;
use crate::host::Navigation;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render Back / Forward / Reload.
pub fn render(snapshot: &ContextSnapshot, _inputs: &RenderInputs<'_>) -> MenuSection {
    if !snapshot.is_page_context() || snapshot.page_url.is_none() {
        return MenuSection::empty();
    }
    MenuSection::new(vec![
        MenuItem::action("Back", MenuCommand::Navigate(Navigation::Back))
            .with_enabled(snapshot.can_go_back),
        MenuItem::action("Forward", MenuCommand::Navigate(Navigation::Forward))
            .with_enabled(snapshot.can_go_forward),
        MenuItem::action("Reload", MenuCommand::Navigate(Navigation::Reload)),
    ])
}
