//! Editing actions: image actions for images, clipboard actions for text.

use crate::context::ContextSnapshot;
use crate::host::EditCommand;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render the editing section.
pub fn render(snapshot: &ContextSnapshot, _inputs: &RenderInputs<'_>) -> MenuSection {
    if snapshot.is_image() {
        return image_actions(snapshot);
    }

    let flags = snapshot.edit_flags;
    let edit = |label: &str, command: EditCommand, enabled: bool| {
        MenuItem::action(label, MenuCommand::Edit(command)).with_enabled(enabled)
    };

    if snapshot.is_editable {
        MenuSection::new(vec![
            edit("Cut", EditCommand::Cut, flags.can_cut),
            edit("Copy", EditCommand::Copy, flags.can_copy),
            edit("Paste", EditCommand::Paste, flags.can_paste),
            edit(
                "Paste and Match Style",
                EditCommand::PasteAndMatchStyle,
                flags.can_paste,
            ),
            edit("Select All", EditCommand::SelectAll, flags.can_select_all),
        ])
    } else if snapshot.has_selection() {
        MenuSection::new(vec![
            edit("Copy", EditCommand::Copy, flags.can_copy),
            edit("Select All", EditCommand::SelectAll, flags.can_select_all),
        ])
    } else {
        MenuSection::empty()
    }
}

fn image_actions(snapshot: &ContextSnapshot) -> MenuSection {
    let Some(url) = snapshot.src_url.clone() else {
        return MenuSection::empty();
    };
    MenuSection::new(vec![
        MenuItem::action("Open Image", MenuCommand::OpenImage { url: url.clone() }),
        MenuItem::action("Save Image As\u{2026}", MenuCommand::SaveImage { url: url.clone() }),
        MenuItem::action("Copy Image Address", MenuCommand::CopyText { text: url }),
    ])
}
