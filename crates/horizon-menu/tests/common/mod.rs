//! In-memory collaborators shared by the integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use horizon_menu::prelude::*;
use horizon_menu::MenuError;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ============================================================================
// Surface manager
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Edit(SurfaceId, EditCommand),
    ReplaceSelection(SurfaceId, String),
    Navigate(SurfaceId, Navigation),
    LoadUrl(SurfaceId, String),
    Download(SurfaceId, String),
    Inspect(SurfaceId, i32, i32),
}

#[derive(Default)]
pub struct FakeHost {
    pub events: Arc<SurfaceEvents>,
    alive: Mutex<HashSet<SurfaceId>>,
    roots: Mutex<HashMap<SurfaceId, SurfaceId>>,
    windows: Mutex<HashMap<SurfaceId, WindowInfo>>,
    internal: Mutex<HashSet<SurfaceId>>,
    calls: Mutex<Vec<HostCall>>,
}

impl FakeHost {
    /// A window whose primary surface is `primary`.
    pub fn add_window(&self, window: u64, primary: u64, opts_out: bool) {
        let surface = SurfaceId::new(primary);
        self.alive.lock().insert(surface);
        self.roots.lock().insert(surface, surface);
        self.windows.lock().insert(
            surface,
            WindowInfo {
                id: WindowId::new(window),
                primary_surface: Some(surface),
                primary_surface_opts_out: opts_out,
            },
        );
    }

    /// A surface nested under an existing root surface.
    pub fn add_child(&self, child: u64, root: u64) {
        let surface = SurfaceId::new(child);
        self.alive.lock().insert(surface);
        self.roots.lock().insert(surface, SurfaceId::new(root));
    }

    pub fn set_internal(&self, surface: u64) {
        self.internal.lock().insert(SurfaceId::new(surface));
    }

    pub fn destroy(&self, surface: u64) {
        let surface = SurfaceId::new(surface);
        self.alive.lock().remove(&surface);
        self.events.surface_destroyed.emit(surface);
    }

    /// Simulate the user right-clicking a surface.
    pub fn request(&self, surface: u64, params: RawContextParams) {
        self.events.context_requested.emit(ContextRequest {
            surface: SurfaceId::new(surface),
            params,
        });
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().clone()
    }
}

impl SurfaceHost for FakeHost {
    fn events(&self) -> Arc<SurfaceEvents> {
        Arc::clone(&self.events)
    }

    fn is_alive(&self, surface: SurfaceId) -> bool {
        self.alive.lock().contains(&surface)
    }

    fn root_surface(&self, surface: SurfaceId) -> Option<SurfaceId> {
        self.roots.lock().get(&surface).copied()
    }

    fn owning_window(&self, root: SurfaceId) -> Option<WindowInfo> {
        self.windows.lock().get(&root).copied()
    }

    fn primary_surface(&self, window: WindowId) -> Option<SurfaceId> {
        self.windows
            .lock()
            .values()
            .find(|info| info.id == window)
            .and_then(|info| info.primary_surface)
    }

    fn is_internal_surface(&self, surface: SurfaceId) -> bool {
        self.internal.lock().contains(&surface)
    }

    fn edit(&self, surface: SurfaceId, command: EditCommand) {
        self.calls.lock().push(HostCall::Edit(surface, command));
    }

    fn replace_selection(&self, surface: SurfaceId, text: &str) {
        self.calls
            .lock()
            .push(HostCall::ReplaceSelection(surface, text.to_string()));
    }

    fn navigate(&self, surface: SurfaceId, navigation: Navigation) {
        self.calls.lock().push(HostCall::Navigate(surface, navigation));
    }

    fn load_url(&self, surface: SurfaceId, url: &str) {
        self.calls
            .lock()
            .push(HostCall::LoadUrl(surface, url.to_string()));
    }

    fn download(&self, surface: SurfaceId, url: &str) {
        self.calls
            .lock()
            .push(HostCall::Download(surface, url.to_string()));
    }

    fn inspect_element(&self, surface: SurfaceId, x: i32, y: i32) {
        self.calls.lock().push(HostCall::Inspect(surface, x, y));
    }
}

// ============================================================================
// Shell
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCall {
    OpenExternal(String, bool),
    Copy(String),
    Popup(String),
    AccountWindow(String, String),
    Settings(SettingsPage),
}

#[derive(Default)]
pub struct FakeShell {
    calls: Mutex<Vec<ShellCall>>,
}

impl FakeShell {
    pub fn calls(&self) -> Vec<ShellCall> {
        self.calls.lock().clone()
    }
}

impl Shell for FakeShell {
    fn open_external(&self, url: &str, background: bool) {
        self.calls
            .lock()
            .push(ShellCall::OpenExternal(url.to_string(), background));
    }

    fn copy_to_clipboard(&self, text: &str) {
        self.calls.lock().push(ShellCall::Copy(text.to_string()));
    }

    fn open_popup_window(&self, url: &str) {
        self.calls.lock().push(ShellCall::Popup(url.to_string()));
    }

    fn open_account_window(&self, account_id: &str, url: &str) {
        self.calls.lock().push(ShellCall::AccountWindow(
            account_id.to_string(),
            url.to_string(),
        ));
    }

    fn open_settings(&self, page: SettingsPage) {
        self.calls.lock().push(ShellCall::Settings(page));
    }
}

// ============================================================================
// Accounts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountCall {
    Activate(String, String),
    Wake(String, String),
}

#[derive(Default)]
pub struct FakeAccounts {
    accounts: Mutex<Vec<Account>>,
    associations: Mutex<HashMap<SurfaceId, AccountAssociation>>,
    surfaces: Mutex<HashMap<(String, String), SurfaceId>>,
    calls: Mutex<Vec<AccountCall>>,
}

impl FakeAccounts {
    pub fn set_accounts(&self, accounts: Vec<Account>) {
        *self.accounts.lock() = accounts;
    }

    pub fn associate(&self, surface: u64, account_id: &str, sub_account_id: &str) {
        self.associations.lock().insert(
            SurfaceId::new(surface),
            AccountAssociation::Account {
                account_id: account_id.to_string(),
                sub_account_id: sub_account_id.to_string(),
            },
        );
    }

    /// Give a sub-account a live surface, as waking it would.
    pub fn set_surface(&self, account_id: &str, sub_account_id: &str, surface: u64) {
        self.surfaces.lock().insert(
            (account_id.to_string(), sub_account_id.to_string()),
            SurfaceId::new(surface),
        );
    }

    pub fn calls(&self) -> Vec<AccountCall> {
        self.calls.lock().clone()
    }
}

impl AccountDirectory for FakeAccounts {
    fn accounts(&self) -> Vec<Account> {
        self.accounts.lock().clone()
    }

    fn association(&self, surface: SurfaceId) -> AccountAssociation {
        self.associations
            .lock()
            .get(&surface)
            .cloned()
            .unwrap_or_default()
    }

    fn activate(&self, account_id: &str, sub_account_id: &str) {
        self.calls.lock().push(AccountCall::Activate(
            account_id.to_string(),
            sub_account_id.to_string(),
        ));
    }

    fn wake(&self, account_id: &str, sub_account_id: &str) {
        self.calls.lock().push(AccountCall::Wake(
            account_id.to_string(),
            sub_account_id.to_string(),
        ));
    }

    fn surface_of(&self, account_id: &str, sub_account_id: &str) -> Option<SurfaceId> {
        self.surfaces
            .lock()
            .get(&(account_id.to_string(), sub_account_id.to_string()))
            .copied()
    }
}

pub fn account(id: &str, display_name: &str, subs: &[(&str, bool)]) -> Account {
    Account {
        id: id.to_string(),
        display_name: display_name.to_string(),
        sub_accounts: subs
            .iter()
            .map(|(sub, asleep)| SubAccount {
                id: sub.to_string(),
                display_name: sub.to_string(),
                asleep: *asleep,
            })
            .collect(),
    }
}

// ============================================================================
// Spelling
// ============================================================================

#[derive(Default)]
pub struct FakeSpelling {
    suggestions: Mutex<SpellingSuggestions>,
    added: Mutex<Vec<String>>,
}

impl FakeSpelling {
    pub fn set_suggestions(&self, suggestions: SpellingSuggestions) {
        *self.suggestions.lock() = suggestions;
    }

    pub fn added(&self) -> Vec<String> {
        self.added.lock().clone()
    }
}

impl SpellingService for FakeSpelling {
    fn suggestions(&self, _word: &str) -> SpellingSuggestions {
        self.suggestions.lock().clone()
    }

    fn add_to_dictionary(&self, word: &str) {
        self.added.lock().push(word.to_string());
    }
}

// ============================================================================
// Extensions
// ============================================================================

#[derive(Default)]
pub struct FakeExtensions {
    nodes: Mutex<Vec<RawExtensionNode>>,
    names: Mutex<HashMap<String, String>>,
    clicks: Mutex<Vec<ExtensionClick>>,
}

impl FakeExtensions {
    /// Replace the registered nodes with a JSON array of runtime records.
    pub fn set_nodes_json(&self, json: &str) {
        *self.nodes.lock() = serde_json::from_str(json).expect("valid node fixture");
    }

    pub fn set_name(&self, extension_id: &str, name: &str) {
        self.names
            .lock()
            .insert(extension_id.to_string(), name.to_string());
    }

    /// Unregister a node, as an extension reload would.
    pub fn remove_node(&self, node_id: &str) {
        self.nodes.lock().retain(|node| node.id != node_id);
    }

    pub fn clicks(&self) -> Vec<ExtensionClick> {
        self.clicks.lock().clone()
    }
}

impl ExtensionRuntime for FakeExtensions {
    fn registered_menu_nodes(&self) -> Vec<RawExtensionNode> {
        self.nodes.lock().clone()
    }

    fn extension_name(&self, extension_id: &str) -> Option<String> {
        self.names.lock().get(extension_id).cloned()
    }

    fn dispatch_menu_click(&self, click: &ExtensionClick) -> horizon_menu::Result<()> {
        let exists = self
            .nodes
            .lock()
            .iter()
            .any(|node| node.extension_id == click.extension_id && node.id == click.node_id);
        if !exists {
            return Err(MenuError::stale_node(&click.extension_id, &click.node_id));
        }
        self.clicks.lock().push(click.clone());
        Ok(())
    }
}

// ============================================================================
// Credentials
// ============================================================================

pub enum LookupMode {
    Resolve(Vec<Credential>),
    Reject,
    /// The capability reports available but vanishes when asked.
    Vanish,
    /// Resolve with whatever the test later sends.
    Deferred(oneshot::Receiver<Vec<Credential>>),
}

pub struct FakeLookup {
    mode: Mutex<Option<LookupMode>>,
    calls: AtomicUsize,
}

impl FakeLookup {
    pub fn new(mode: LookupMode) -> Arc<Self> {
        Arc::new(Self {
            mode: Mutex::new(Some(mode)),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CredentialLookup for FakeLookup {
    fn is_available(&self) -> bool {
        true
    }

    fn applies_to(&self, url: &str) -> bool {
        url.starts_with("https://")
    }

    fn lookup(&self, _url: &str) -> BoxFuture<'static, horizon_menu::Result<Vec<Credential>>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.mode.lock().take() {
            Some(LookupMode::Resolve(credentials)) => async move { Ok(credentials) }.boxed(),
            Some(LookupMode::Reject) => {
                async { Err(MenuError::LookupFailed("store locked".into())) }.boxed()
            }
            Some(LookupMode::Vanish) | None => async { Err(MenuError::LookupUnavailable) }.boxed(),
            Some(LookupMode::Deferred(rx)) => async move {
                rx.await
                    .map_err(|_| MenuError::LookupFailed("lookup abandoned".into()))
            }
            .boxed(),
        }
    }
}

pub fn credential(account: &str, secret: &str) -> Credential {
    Credential {
        account: account.to_string(),
        secret: secret.to_string(),
    }
}

// ============================================================================
// Presenter
// ============================================================================

#[derive(Default)]
pub struct FakePresenter {
    next: AtomicU64,
    open: Mutex<HashMap<MenuHandle, OnClosed>>,
    presented: Mutex<Vec<(WindowId, MenuTemplate)>>,
    closes: AtomicUsize,
}

impl FakePresenter {
    pub fn presented(&self) -> Vec<(WindowId, MenuTemplate)> {
        self.presented.lock().clone()
    }

    pub fn last_template(&self) -> Option<MenuTemplate> {
        self.presented.lock().last().map(|(_, template)| template.clone())
    }

    pub fn forced_closes(&self) -> usize {
        self.closes.load(Ordering::SeqCst)
    }

    pub fn open_count(&self) -> usize {
        self.open.lock().len()
    }

    /// Simulate the user dismissing every open menu.
    pub fn dismiss_all(&self) {
        let callbacks: Vec<OnClosed> = self.open.lock().drain().map(|(_, cb)| cb).collect();
        for callback in callbacks {
            callback();
        }
    }
}

impl MenuPresenter for FakePresenter {
    fn present(&self, template: &MenuTemplate, anchor: WindowId, on_closed: OnClosed) -> MenuHandle {
        let handle = MenuHandle(self.next.fetch_add(1, Ordering::SeqCst));
        self.open.lock().insert(handle, on_closed);
        self.presented.lock().push((anchor, template.clone()));
        handle
    }

    fn close(&self, handle: MenuHandle) {
        self.closes.fetch_add(1, Ordering::SeqCst);
        let callback = self.open.lock().remove(&handle);
        if let Some(callback) = callback {
            callback();
        }
    }
}

// ============================================================================
// Harness
// ============================================================================

pub struct Harness {
    pub host: Arc<FakeHost>,
    pub shell: Arc<FakeShell>,
    pub accounts: Arc<FakeAccounts>,
    pub spelling: Arc<FakeSpelling>,
    pub extensions: Arc<FakeExtensions>,
    pub lookup: Option<Arc<FakeLookup>>,
    pub presenter: Arc<FakePresenter>,
    pub service: ContextMenuService,
}

impl Harness {
    pub fn new() -> Self {
        Self::build(MenuConfig::default(), None)
    }

    pub fn with_config(config: MenuConfig) -> Self {
        Self::build(config, None)
    }

    pub fn with_lookup(mode: LookupMode) -> Self {
        Self::build(MenuConfig::default(), Some(FakeLookup::new(mode)))
    }

    fn build(config: MenuConfig, lookup: Option<Arc<FakeLookup>>) -> Self {
        init_tracing();

        let host = Arc::new(FakeHost::default());
        let shell = Arc::new(FakeShell::default());
        let accounts = Arc::new(FakeAccounts::default());
        let spelling = Arc::new(FakeSpelling::default());
        let extensions = Arc::new(FakeExtensions::default());
        let presenter = Arc::new(FakePresenter::default());

        let service = ContextMenuService::new(
            config,
            Collaborators {
                host: host.clone(),
                shell: shell.clone(),
                accounts: accounts.clone(),
                spelling: spelling.clone(),
                extensions: extensions.clone(),
                credentials: lookup
                    .clone()
                    .map(|lookup| lookup as Arc<dyn CredentialLookup>),
                presenter: presenter.clone(),
            },
        );

        Self {
            host,
            shell,
            accounts,
            spelling,
            extensions,
            lookup,
            presenter,
            service,
        }
    }

    /// Create window 1 with primary surface 10 and bind it.
    pub fn with_bound_window(mut self) -> Self {
        self.host.add_window(1, 10, false);
        self.service.on_window_created(WindowId::new(1));
        self.service.tick(std::time::Instant::now());
        self
    }
}

pub fn page(url: &str) -> RawContextParams {
    RawContextParams {
        page_url: url.to_string(),
        ..Default::default()
    }
}

pub fn password_field(url: &str) -> RawContextParams {
    RawContextParams {
        page_url: url.to_string(),
        is_editable: true,
        input_field_type: InputFieldKind::Password,
        edit_flags: EditFlags {
            can_paste: true,
            can_select_all: true,
            ..Default::default()
        },
        ..Default::default()
    }
}

pub fn request(surface: u64, params: RawContextParams) -> ContextRequest {
    ContextRequest {
        surface: SurfaceId::new(surface),
        params,
    }
}
