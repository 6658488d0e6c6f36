//! Link actions.
//!
//! Shown when the pointer is over a link on a non-internal surface. Http(s)
//! links also get an "Open Link With" submenu that fans out to a popup
//! window and, when more than one account exists, to each account.

use crate::config::AccountLinkMode;
use crate::context::ContextSnapshot;
use crate::host::Account;
use crate::item::{MenuCommand, MenuItem, MenuSection};

use super::RenderInputs;

/// Render the link section.
pub fn render(snapshot: &ContextSnapshot, inputs: &RenderInputs<'_>) -> MenuSection {
    let Some(url) = snapshot.link_url.as_deref() else {
        return MenuSection::empty();
    };
    if snapshot.is_internal_surface {
        return MenuSection::empty();
    }

    let mut items = vec![MenuItem::action(
        "Open Link",
        MenuCommand::OpenExternal {
            url: url.to_string(),
            background: false,
        },
    )];
    if inputs.config.open_in_background {
        items.push(MenuItem::action(
            "Open Link in Background",
            MenuCommand::OpenExternal {
                url: url.to_string(),
                background: true,
            },
        ));
    }
    items.push(MenuItem::action(
        "Copy Link Address",
        MenuCommand::CopyText {
            text: copy_address(url).to_string(),
        },
    ));

    if snapshot.is_http_link()
        && let Some(open_with) = open_with_submenu(url, inputs)
    {
        items.push(open_with);
    }
    MenuSection::new(items)
}

/// The text "Copy Link Address" puts on the clipboard.
///
/// A `mailto:` link without query parameters is copied as the bare address.
pub fn copy_address(url: &str) -> &str {
    const MAILTO: &str = "mailto:";
    match url.split_at_checked(MAILTO.len()) {
        Some((scheme, address)) if scheme.eq_ignore_ascii_case(MAILTO) && !url.contains('?') => {
            address
        }
        _ => url,
    }
}

fn open_with_submenu(url: &str, inputs: &RenderInputs<'_>) -> Option<MenuItem> {
    let mut items = vec![MenuItem::action(
        "New Window",
        MenuCommand::OpenInPopupWindow {
            url: url.to_string(),
        },
    )];

    if inputs.accounts.len() > 1 {
        let fan_out: Vec<MenuItem> = match inputs.config.account_links {
            AccountLinkMode::Flat => inputs
                .accounts
                .iter()
                .map(|account| account_window_item(account, url))
                .collect(),
            AccountLinkMode::Expanded => inputs
                .accounts
                .iter()
                .filter_map(|account| account_submenu(account, url))
                .collect(),
        };
        if !fan_out.is_empty() {
            items.push(MenuItem::separator());
            items.extend(fan_out);
        }
    }

    MenuItem::submenu("Open Link With", items)
}

fn account_window_item(account: &Account, url: &str) -> MenuItem {
    MenuItem::action(
        format!("New Window in {}", account.display_name),
        MenuCommand::OpenInAccountWindow {
            account_id: account.id.clone(),
            url: url.to_string(),
        },
    )
}

fn account_submenu(account: &Account, url: &str) -> Option<MenuItem> {
    let items = account
        .sub_accounts
        .iter()
        .map(|sub| {
            MenuItem::action(
                sub.display_name.clone(),
                MenuCommand::OpenInSubAccount {
                    account_id: account.id.clone(),
                    sub_account_id: sub.id.clone(),
                    url: url.to_string(),
                    asleep: sub.asleep,
                },
            )
        })
        .collect();
    MenuItem::submenu(account.display_name.clone(), items)
}
