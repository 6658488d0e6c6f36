//! Application-level actions: settings, dictionary switch, inspect.

use crate::context::ContextSnapshot;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render the application section.
///
/// "Account Settings" only appears when the surface's account association
/// names a known account. An unresolved association omits the entry.
pub fn render(snapshot: &ContextSnapshot, inputs: &RenderInputs<'_>) -> MenuSection {
    let mut items = Vec::with_capacity(4);

    let account = snapshot
        .account
        .account_id()
        .and_then(|id| inputs.accounts.iter().find(|account| account.id == id));
    if let Some(account) = account {
        items.push(MenuItem::action(
            format!("{} Settings", account.display_name),
            MenuCommand::OpenAccountSettings {
                account_id: account.id.clone(),
            },
        ));
    }

    items.push(MenuItem::action("Settings", MenuCommand::OpenSettings));

    if inputs.config.spellcheck_enabled {
        items.push(MenuItem::action(
            "Change Spellcheck Language",
            MenuCommand::ChangeSpellcheckLanguage,
        ));
    }

    if inputs.config.developer_tools {
        let (x, y) = snapshot.position;
        items.push(MenuItem::action(
            "Inspect Element",
            MenuCommand::InspectElement { x, y },
        ));
    }

    MenuSection::new(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuConfig;
    use crate::context::RawContextParams;
    use crate::host::{Account, AccountAssociation};

    fn associated(account_id: &str) -> ContextSnapshot {
        ContextSnapshot::capture(
            RawContextParams {
                x: 4,
                y: 9,
                ..Default::default()
            },
            AccountAssociation::Account {
                account_id: account_id.into(),
                sub_account_id: "mail".into(),
            },
            false,
        )
    }

    fn accounts() -> Vec<Account> {
        vec![Account {
            id: "work".into(),
            display_name: "Work".into(),
            sub_accounts: Vec::new(),
        }]
    }

    #[test]
    fn test_account_settings_for_known_account() {
        let config = MenuConfig::default();
        let accounts = accounts();
        let inputs = RenderInputs::new(&config).with_accounts(&accounts);
        let section = render(&associated("work"), &inputs);
        assert_eq!(section.items()[0].label(), Some("Work Settings"));
    }

    #[test]
    fn test_unknown_account_degrades_silently() {
        let config = MenuConfig::default();
        let accounts = accounts();
        let inputs = RenderInputs::new(&config).with_accounts(&accounts);
        let section = render(&associated("gone"), &inputs);
        assert_eq!(section.items()[0].label(), Some("Settings"));
    }

    #[test]
    fn test_config_gated_actions() {
        let config = MenuConfig {
            spellcheck_enabled: false,
            developer_tools: true,
            ..Default::default()
        };
        let section = render(&associated("none"), &RenderInputs::new(&config));
        let labels: Vec<_> = section.items().iter().filter_map(MenuItem::label).collect();
        assert_eq!(labels, vec!["Settings", "Inspect Element"]);
        assert_eq!(
            section.items()[1].command(),
            Some(&MenuCommand::InspectElement { x: 4, y: 9 })
        );
    }
}
