//! Undo and redo.

use crate::context::ContextSnapshot;
use crate::host::EditCommand;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render undo/redo, only if at least one of them is available.
pub fn render(snapshot: &ContextSnapshot, _inputs: &RenderInputs<'_>) -> MenuSection {
    let flags = snapshot.edit_flags;
    if !flags.can_undo && !flags.can_redo {
        return MenuSection::empty();
    }
    MenuSection::new(vec![
        MenuItem::action("Undo", MenuCommand::Edit(EditCommand::Undo)).with_enabled(flags.can_undo),
        MenuItem::action("Redo", MenuCommand::Edit(EditCommand::Redo)).with_enabled(flags.can_redo),
    ])
}
