//! Command dispatch.
//!
//! Executes the [`MenuCommand`] of an invoked menu item against the
//! collaborators. Dispatch never fails outward: a command whose target went
//! away (a destroyed surface, a removed extension node, a sub-account with
//! no surface) is logged and reported as [`DispatchOutcome::Missed`].
//!
//! Loading a URL into an asleep sub-account is the one command that does not
//! complete immediately. The sub-account is activated and woken, and the
//! load is parked on a [`DeferredScheduler`] for the configured settling
//! delay; [`CommandDispatcher::run_ready`] performs it once the delay has
//! passed. A sub-account has at most one parked load: choosing it again
//! before the delay passes replaces the earlier URL.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_menu_core::{DeferredScheduler, ScheduledTaskId};

use crate::config::{MenuConfig, QUERY_PLACEHOLDER};
use crate::extension::{ExtensionClick, ExtensionRuntime};
use crate::host::{
    AccountDirectory, EditCommand, SettingsPage, Shell, SpellingService, SurfaceHost, SurfaceId,
};
use crate::item::MenuCommand;

/// What happened to a dispatched command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The command ran.
    Done,
    /// The command's target no longer exists; nothing happened.
    Missed,
    /// Part of the command runs later, on [`CommandDispatcher::run_ready`].
    Scheduled(ScheduledTaskId),
}

/// A URL load waiting for a sub-account to finish waking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingLoad {
    pub account_id: String,
    pub sub_account_id: String,
    pub url: String,
}

/// The collaborators commands act on.
#[derive(Clone)]
pub struct DispatchTargets {
    pub host: Arc<dyn SurfaceHost>,
    pub shell: Arc<dyn Shell>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub spelling: Arc<dyn SpellingService>,
    pub extensions: Arc<dyn ExtensionRuntime>,
}

/// Executes menu commands.
pub struct CommandDispatcher {
    targets: DispatchTargets,
    config: Arc<MenuConfig>,
    pending_loads: DeferredScheduler<PendingLoad>,
    /// Parked load per (account, sub-account).
    parked: HashMap<(String, String), ScheduledTaskId>,
}

impl CommandDispatcher {
    pub fn new(targets: DispatchTargets, config: Arc<MenuConfig>) -> Self {
        Self {
            targets,
            config,
            pending_loads: DeferredScheduler::new(),
            parked: HashMap::new(),
        }
    }

    /// Execute a command invoked from a menu shown for `surface`.
    #[tracing::instrument(skip(self, command), target = "horizon_menu::dispatch", level = "debug")]
    pub fn dispatch(
        &mut self,
        surface: SurfaceId,
        command: &MenuCommand,
        now: Instant,
    ) -> DispatchOutcome {
        let host = &self.targets.host;
        let shell = &self.targets.shell;

        if needs_live_surface(command) && !host.is_alive(surface) {
            tracing::debug!(target: "horizon_menu::dispatch", %surface, "surface gone, command dropped");
            return DispatchOutcome::Missed;
        }

        match command {
            MenuCommand::ReplaceMisspelling { replacement } => {
                host.replace_selection(surface, replacement);
            }
            MenuCommand::AddToDictionary { word } => {
                self.targets.spelling.add_to_dictionary(word);
            }
            MenuCommand::OpenExternal { url, background } => {
                shell.open_external(url, *background);
            }
            MenuCommand::CopyText { text } => shell.copy_to_clipboard(text),
            MenuCommand::OpenInPopupWindow { url } => shell.open_popup_window(url),
            MenuCommand::OpenInAccountWindow { account_id, url } => {
                shell.open_account_window(account_id, url);
            }
            MenuCommand::OpenInSubAccount {
                account_id,
                sub_account_id,
                url,
                asleep,
            } => {
                let load = PendingLoad {
                    account_id: account_id.clone(),
                    sub_account_id: sub_account_id.clone(),
                    url: url.clone(),
                };
                return if *asleep {
                    self.wake_then_load(load, now)
                } else {
                    self.load_now(load)
                };
            }
            MenuCommand::Search { query } => {
                let url = fill_template(&self.config.search.url_template, query);
                shell.open_external(&url, false);
            }
            MenuCommand::Translate { text } => {
                let url = fill_template(&self.config.translate_url_template, text);
                shell.open_external(&url, false);
            }
            MenuCommand::Edit(edit) => host.edit(surface, *edit),
            MenuCommand::Navigate(navigation) => host.navigate(surface, *navigation),
            MenuCommand::OpenImage { url } => host.load_url(surface, url),
            MenuCommand::SaveImage { url } => host.download(surface, url),
            MenuCommand::Extension(click) => return self.dispatch_extension(click),
            MenuCommand::FillCredential { secret } => {
                host.edit(surface, EditCommand::SelectAll);
                host.replace_selection(surface, secret);
                host.edit(surface, EditCommand::Unselect);
            }
            MenuCommand::ManagePasswords => shell.open_settings(SettingsPage::Passwords),
            MenuCommand::AddPassword => shell.open_settings(SettingsPage::AddPassword),
            MenuCommand::OpenSettings => shell.open_settings(SettingsPage::General),
            MenuCommand::OpenAccountSettings { account_id } => {
                shell.open_settings(SettingsPage::Account(account_id.clone()));
            }
            MenuCommand::ChangeSpellcheckLanguage => {
                shell.open_settings(SettingsPage::SpellcheckLanguage);
            }
            MenuCommand::InspectElement { x, y } => host.inspect_element(surface, *x, *y),
        }
        DispatchOutcome::Done
    }

    /// Perform every parked load whose settling delay has passed.
    ///
    /// Returns the number of loads that reached a surface.
    pub fn run_ready(&mut self, now: Instant) -> usize {
        let ready = self.pending_loads.take_ready(now);
        if !ready.is_empty() {
            self.parked.retain(|_, id| self.pending_loads.is_pending(*id));
        }
        ready
            .into_iter()
            .filter(|load| self.load_now(load.clone()) == DispatchOutcome::Done)
            .count()
    }

    /// Number of parked loads.
    pub fn pending_count(&self) -> usize {
        self.pending_loads.pending_count()
    }

    /// Time from `now` until the next parked load is due.
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.pending_loads.time_until_next(now)
    }

    fn wake_then_load(&mut self, load: PendingLoad, now: Instant) -> DispatchOutcome {
        let accounts = &self.targets.accounts;
        accounts.activate(&load.account_id, &load.sub_account_id);
        accounts.wake(&load.account_id, &load.sub_account_id);

        let delay = self.config.wake_settle_delay();
        tracing::debug!(
            target: "horizon_menu::dispatch",
            account = %load.account_id,
            sub_account = %load.sub_account_id,
            delay_ms = delay.as_millis() as u64,
            "waking sub-account before load"
        );
        let key = (load.account_id.clone(), load.sub_account_id.clone());
        let id = self.pending_loads.schedule_after(now, delay, load);
        if let Some(previous) = self.parked.insert(key, id)
            && let Ok(superseded) = self.pending_loads.cancel(previous)
        {
            tracing::debug!(
                target: "horizon_menu::dispatch",
                url = %superseded.url,
                "parked load replaced"
            );
        }
        DispatchOutcome::Scheduled(id)
    }

    fn load_now(&self, load: PendingLoad) -> DispatchOutcome {
        let accounts = &self.targets.accounts;
        let surface = accounts
            .surface_of(&load.account_id, &load.sub_account_id)
            .filter(|surface| self.targets.host.is_alive(*surface));
        let Some(surface) = surface else {
            tracing::debug!(
                target: "horizon_menu::dispatch",
                account = %load.account_id,
                sub_account = %load.sub_account_id,
                "sub-account has no surface, load dropped"
            );
            return DispatchOutcome::Missed;
        };

        self.targets.host.load_url(surface, &load.url);
        accounts.activate(&load.account_id, &load.sub_account_id);
        DispatchOutcome::Done
    }

    fn dispatch_extension(&self, click: &ExtensionClick) -> DispatchOutcome {
        match self.targets.extensions.dispatch_menu_click(click) {
            Ok(()) => DispatchOutcome::Done,
            Err(e) if e.is_stale() => {
                tracing::debug!(target: "horizon_menu::dispatch", "extension click missed: {}", e);
                DispatchOutcome::Missed
            }
            Err(e) => {
                tracing::warn!(target: "horizon_menu::dispatch", "extension click failed: {}", e);
                DispatchOutcome::Missed
            }
        }
    }
}

/// Whether a command acts on the surface the menu was shown for.
fn needs_live_surface(command: &MenuCommand) -> bool {
    matches!(
        command,
        MenuCommand::ReplaceMisspelling { .. }
            | MenuCommand::Edit(_)
            | MenuCommand::Navigate(_)
            | MenuCommand::OpenImage { .. }
            | MenuCommand::SaveImage { .. }
            | MenuCommand::FillCredential { .. }
            | MenuCommand::InspectElement { .. }
    )
}

/// Substitute a percent-encoded query into a URL template.
pub fn fill_template(template: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    template.replace(QUERY_PLACEHOLDER, &encoded)
}

static_assertions::assert_impl_all!(CommandDispatcher: Send, Sync);
