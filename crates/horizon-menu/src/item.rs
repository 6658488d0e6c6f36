//! Menu item model.
//!
//! A context menu is described declaratively: renderers produce
//! [`MenuItem`] values, and each invocable item carries a [`MenuCommand`]
//! describing what happens when it is chosen. Nothing in a template holds a
//! reference back into live application state, so templates can be built,
//! compared and logged freely; the [`CommandDispatcher`] is the only place
//! commands touch the outside world.
//!
//! [`CommandDispatcher`]: crate::dispatch::CommandDispatcher

use crate::extension::ExtensionClick;
use crate::host::{EditCommand, Navigation};

// ============================================================================
// MenuCommand
// ============================================================================

/// What happens when a menu item is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuCommand {
    /// Replace the misspelled word with a suggestion.
    ReplaceMisspelling { replacement: String },
    /// Add a word to the user dictionary.
    AddToDictionary { word: String },
    /// Open a URL in the system's default handler.
    OpenExternal { url: String, background: bool },
    /// Put text on the clipboard.
    CopyText { text: String },
    /// Open a URL in a new popup content window.
    OpenInPopupWindow { url: String },
    /// Open a URL in a new window scoped to an account.
    OpenInAccountWindow { account_id: String, url: String },
    /// Load a URL into a sub-account, waking it first if asleep.
    OpenInSubAccount {
        account_id: String,
        sub_account_id: String,
        url: String,
        asleep: bool,
    },
    /// Search the configured engine for a query.
    Search { query: String },
    /// Translate text with the configured translator.
    Translate { text: String },
    /// An editing primitive.
    Edit(EditCommand),
    /// An in-page navigation primitive.
    Navigate(Navigation),
    /// Open an image in the current surface.
    OpenImage { url: String },
    /// Save an image to disk.
    SaveImage { url: String },
    /// Forward a click to the extension that owns a menu node.
    Extension(ExtensionClick),
    /// Fill the focused password field with a saved secret.
    FillCredential { secret: String },
    /// Open the saved password manager.
    ManagePasswords,
    /// Start adding a new saved password.
    AddPassword,
    /// Open application settings.
    OpenSettings,
    /// Open settings for one account.
    OpenAccountSettings { account_id: String },
    /// Open the spellcheck language picker.
    ChangeSpellcheckLanguage,
    /// Open developer tools at a position.
    InspectElement { x: i32, y: i32 },
}

// ============================================================================
// MenuItem
// ============================================================================

/// A clickable entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionItem {
    pub label: String,
    pub enabled: bool,
    /// `None` for informational entries such as "No suggestions".
    pub command: Option<MenuCommand>,
}

/// A checkbox or radio entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleItem {
    pub label: String,
    pub checked: bool,
    pub enabled: bool,
    pub command: MenuCommand,
}

/// A nested menu. Never constructed with zero items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submenu {
    pub label: String,
    pub items: Vec<MenuItem>,
}

/// An item in a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    /// A clickable action item.
    Action(ActionItem),
    /// A checkable item.
    Checkbox(ToggleItem),
    /// One item of an exclusive group.
    Radio(ToggleItem),
    /// A visual separator line.
    Separator,
    /// A nested menu.
    Submenu(Submenu),
}

impl MenuItem {
    /// Create an enabled action item.
    pub fn action(label: impl Into<String>, command: MenuCommand) -> Self {
        MenuItem::Action(ActionItem {
            label: label.into(),
            enabled: true,
            command: Some(command),
        })
    }

    /// Create a disabled, informational item.
    pub fn placeholder(label: impl Into<String>) -> Self {
        MenuItem::Action(ActionItem {
            label: label.into(),
            enabled: false,
            command: None,
        })
    }

    /// Create a checkbox item.
    pub fn checkbox(label: impl Into<String>, checked: bool, command: MenuCommand) -> Self {
        MenuItem::Checkbox(ToggleItem {
            label: label.into(),
            checked,
            enabled: true,
            command,
        })
    }

    /// Create a radio item.
    pub fn radio(label: impl Into<String>, checked: bool, command: MenuCommand) -> Self {
        MenuItem::Radio(ToggleItem {
            label: label.into(),
            checked,
            enabled: true,
            command,
        })
    }

    /// Create a separator item.
    pub fn separator() -> Self {
        MenuItem::Separator
    }

    /// Create a submenu item, or `None` if there is nothing to put in it.
    pub fn submenu(label: impl Into<String>, items: Vec<MenuItem>) -> Option<Self> {
        if items.is_empty() {
            return None;
        }
        Some(MenuItem::Submenu(Submenu {
            label: label.into(),
            items,
        }))
    }

    /// Set the enabled state (no-op for separators and submenus).
    pub fn with_enabled(mut self, value: bool) -> Self {
        match &mut self {
            MenuItem::Action(item) => item.enabled = value,
            MenuItem::Checkbox(item) | MenuItem::Radio(item) => item.enabled = value,
            MenuItem::Separator | MenuItem::Submenu(_) => {}
        }
        self
    }

    /// Check if this item is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, MenuItem::Separator)
    }

    /// Check if this item is a submenu.
    pub fn is_submenu(&self) -> bool {
        matches!(self, MenuItem::Submenu(_))
    }

    /// Check if this item is enabled.
    pub fn is_enabled(&self) -> bool {
        match self {
            MenuItem::Action(item) => item.enabled,
            MenuItem::Checkbox(item) | MenuItem::Radio(item) => item.enabled,
            MenuItem::Separator => false,
            MenuItem::Submenu(submenu) => submenu.items.iter().any(MenuItem::is_enabled),
        }
    }

    /// Get the display text for this item.
    pub fn label(&self) -> Option<&str> {
        match self {
            MenuItem::Action(item) => Some(&item.label),
            MenuItem::Checkbox(item) | MenuItem::Radio(item) => Some(&item.label),
            MenuItem::Separator => None,
            MenuItem::Submenu(submenu) => Some(&submenu.label),
        }
    }

    /// The command run when this item is invoked, if any.
    pub fn command(&self) -> Option<&MenuCommand> {
        match self {
            MenuItem::Action(item) => item.command.as_ref(),
            MenuItem::Checkbox(item) | MenuItem::Radio(item) => Some(&item.command),
            MenuItem::Separator | MenuItem::Submenu(_) => None,
        }
    }

    /// Child items, for submenus.
    pub fn children(&self) -> &[MenuItem] {
        match self {
            MenuItem::Submenu(submenu) => &submenu.items,
            _ => &[],
        }
    }
}

// ============================================================================
// Sections and templates
// ============================================================================

/// One renderer's ordered contribution to a menu. May be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuSection {
    items: Vec<MenuItem>,
}

impl MenuSection {
    /// An empty section.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap a list of items.
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }
}

impl FromIterator<MenuItem> for MenuSection {
    fn from_iter<I: IntoIterator<Item = MenuItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// The final, flattened menu handed to presentation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MenuTemplate {
    items: Vec<MenuItem>,
}

impl MenuTemplate {
    pub(crate) fn from_items(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[MenuItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Number of runs of items separated by separators.
    pub fn group_count(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            1 + self.items.iter().filter(|item| item.is_separator()).count()
        }
    }

    /// Find the first item, at any depth, whose label matches.
    pub fn find(&self, label: &str) -> Option<&MenuItem> {
        fn search<'a>(items: &'a [MenuItem], label: &str) -> Option<&'a MenuItem> {
            items.iter().find_map(|item| {
                if item.label() == Some(label) {
                    Some(item)
                } else {
                    search(item.children(), label)
                }
            })
        }
        search(&self.items, label)
    }

    /// Labels of the top-level items, with `---` for separators.
    pub fn outline(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| item.label().unwrap_or("---"))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submenu_with_no_items_is_elided() {
        assert_eq!(MenuItem::submenu("Empty", Vec::new()), None);

        let submenu = MenuItem::submenu("Open With", vec![MenuItem::placeholder("x")]).unwrap();
        assert!(submenu.is_submenu());
        assert_eq!(submenu.children().len(), 1);
    }

    #[test]
    fn test_item_kinds() {
        let action = MenuItem::action("Copy", MenuCommand::Edit(EditCommand::Copy));
        assert!(action.is_enabled());
        assert_eq!(action.label(), Some("Copy"));
        assert_eq!(action.command(), Some(&MenuCommand::Edit(EditCommand::Copy)));

        let sep = MenuItem::separator();
        assert!(sep.is_separator());
        assert!(!sep.is_enabled());
        assert_eq!(sep.label(), None);

        let placeholder = MenuItem::placeholder("No Spelling Suggestions");
        assert!(!placeholder.is_enabled());
        assert_eq!(placeholder.command(), None);
    }

    #[test]
    fn test_with_enabled() {
        let item = MenuItem::action("Paste", MenuCommand::Edit(EditCommand::Paste))
            .with_enabled(false);
        match item {
            MenuItem::Action(ActionItem { enabled, .. }) => assert!(!enabled),
            other => panic!("unexpected item {other:?}"),
        }
    }

    #[test]
    fn test_submenu_enabled_if_any_child_enabled() {
        let submenu = MenuItem::submenu(
            "More",
            vec![
                MenuItem::placeholder("disabled"),
                MenuItem::action("Reload", MenuCommand::Navigate(Navigation::Reload)),
            ],
        )
        .unwrap();
        assert!(submenu.is_enabled());
    }

    #[test]
    fn test_template_find_and_outline() {
        let template = MenuTemplate::from_items(vec![
            MenuItem::action("Back", MenuCommand::Navigate(Navigation::Back)),
            MenuItem::separator(),
            MenuItem::submenu(
                "Open Link With",
                vec![MenuItem::action(
                    "New Window",
                    MenuCommand::OpenInPopupWindow {
                        url: "https://example.com".into(),
                    },
                )],
            )
            .unwrap(),
        ]);

        assert_eq!(template.outline(), vec!["Back", "---", "Open Link With"]);
        assert_eq!(template.group_count(), 2);
        assert!(template.find("New Window").is_some());
        assert!(template.find("Missing").is_none());
    }
}
