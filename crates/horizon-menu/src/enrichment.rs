//! Autofill enrichment.
//!
//! When the user right-clicks a password field on a secure page, the menu
//! can offer saved credentials for that page. Looking them up is the one
//! asynchronous step of menu composition, and it is strictly best-effort:
//!
//! - an eligibility check runs synchronously and decides whether the lookup
//!   starts at all;
//! - exactly one lookup is issued per menu, keyed by the page URL;
//! - any failure (including the capability vanishing after the check)
//!   yields no section, and the rest of the menu is shown unchanged.

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::context::{ContextSnapshot, InputFieldKind};
use crate::error::Result;
use crate::item::{MenuCommand, MenuItem, MenuSection};

/// A saved credential matching the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// Account name shown in the menu.
    pub account: String,
    /// Secret filled into the field.
    pub secret: String,
}

/// The credential lookup service.
pub trait CredentialLookup: Send + Sync {
    /// Whether the capability is present at all.
    fn is_available(&self) -> bool;

    /// Whether the service handles credentials for this URL.
    fn applies_to(&self, url: &str) -> bool;

    /// Look up credentials saved for a URL.
    ///
    /// May fail with [`MenuError::LookupUnavailable`] if the capability went
    /// away after [`is_available`](Self::is_available) was checked.
    ///
    /// [`MenuError::LookupUnavailable`]: crate::MenuError::LookupUnavailable
    fn lookup(&self, url: &str) -> BoxFuture<'static, Result<Vec<Credential>>>;
}

/// Produces the autofill section ahead of the rest of the menu.
#[derive(Clone, Default)]
pub struct AutofillPipeline {
    lookup: Option<Arc<dyn CredentialLookup>>,
}

impl AutofillPipeline {
    /// Create a pipeline backed by a lookup service.
    pub fn new(lookup: Arc<dyn CredentialLookup>) -> Self {
        Self {
            lookup: Some(lookup),
        }
    }

    /// A pipeline that never produces a section.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Whether the lookup should start for this click.
    ///
    /// Requires an available capability that applies to the page, a password
    /// field that is editable, and a secure page.
    pub fn is_eligible(&self, snapshot: &ContextSnapshot) -> bool {
        let Some(lookup) = &self.lookup else {
            return false;
        };
        let Some(url) = snapshot.page_url.as_deref() else {
            return false;
        };
        lookup.is_available()
            && lookup.applies_to(url)
            && snapshot.input_field_kind == InputFieldKind::Password
            && snapshot.is_editable
            && snapshot.is_secure_page()
    }

    /// Run the lookup and render its section, or `None` if there is nothing
    /// to add.
    pub async fn enrich(&self, snapshot: &ContextSnapshot) -> Option<MenuSection> {
        if !self.is_eligible(snapshot) {
            return None;
        }
        let lookup = self.lookup.as_ref()?;
        let url = snapshot.page_url.as_deref()?;

        tracing::debug!(target: "horizon_menu::enrichment", url, "looking up credentials");
        match lookup.lookup(url).await {
            Ok(credentials) => {
                tracing::debug!(
                    target: "horizon_menu::enrichment",
                    count = credentials.len(),
                    "credential lookup resolved"
                );
                Some(autofill_section(credentials))
            }
            Err(e) => {
                tracing::warn!(
                    target: "horizon_menu::enrichment",
                    "credential lookup failed, continuing without autofill: {}",
                    e
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for AutofillPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutofillPipeline")
            .field("enabled", &self.lookup.is_some())
            .finish()
    }
}

fn autofill_section(credentials: Vec<Credential>) -> MenuSection {
    credentials
        .into_iter()
        .map(|credential| {
            MenuItem::action(
                credential.account,
                MenuCommand::FillCredential {
                    secret: credential.secret,
                },
            )
        })
        .chain([
            MenuItem::action("Manage Saved Passwords", MenuCommand::ManagePasswords),
            MenuItem::action("Add New Password", MenuCommand::AddPassword),
        ])
        .collect()
}
