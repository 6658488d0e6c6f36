//! The context menu service.
//!
//! [`ContextMenuService`] wires the binding registry, renderers, extension
//! tree builder, autofill pipeline, aggregator, presentation gate and command
//! dispatcher together. It is driven entirely by its owner on the event
//! thread:
//!
//! ```text
//! surface/window created ──► on_surface_created / on_window_created
//! next turn of the loop   ──► tick(now)          binds surfaces, runs wake loads
//! context_requested fires ──► (queued by the bound trigger)
//! owner polls             ──► process_requests() composes + presents menus
//! item invoked            ──► dispatch(surface, command, now)
//! ```
//!
//! A request is composed in two stages. Every synchronous renderer and the
//! extension tree builder run first, producing a stable section list. Only
//! then is the single asynchronous step, the credential lookup, awaited.
//! Before presenting, the surface is checked again, since it may have been
//! destroyed while the lookup was outstanding. A surface destroyed while its
//! menu is open has that menu closed.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use horizon_menu_core::{ConnectionId, PerfSpan};
use horizon_menu_core::logging::span_names;
use parking_lot::Mutex;
use tracing::Instrument;

use crate::aggregate::{compose, section_count};
use crate::binding::{BindOutcome, SurfaceBindingRegistry, TriggerFn};
use crate::config::MenuConfig;
use crate::context::ContextSnapshot;
use crate::dispatch::{CommandDispatcher, DispatchOutcome, DispatchTargets};
use crate::enrichment::{AutofillPipeline, CredentialLookup};
use crate::extension::{
    ExtensionClickContext, ExtensionRuntime, ExtensionTreeBuilder, parse_nodes,
};
use crate::host::{
    AccountDirectory, ContextRequest, Shell, SpellingService, SurfaceHost, SurfaceId, WindowId,
};
use crate::item::{MenuCommand, MenuSection, MenuTemplate};
use crate::presentation::{MenuHandle, MenuPresenter, PresentationGate};
use crate::sections::{RenderInputs, render_sections};

/// Everything the service talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub host: Arc<dyn SurfaceHost>,
    pub shell: Arc<dyn Shell>,
    pub accounts: Arc<dyn AccountDirectory>,
    pub spelling: Arc<dyn SpellingService>,
    pub extensions: Arc<dyn ExtensionRuntime>,
    /// `None` when no credential store is installed.
    pub credentials: Option<Arc<dyn CredentialLookup>>,
    pub presenter: Arc<dyn MenuPresenter>,
}

/// A composed menu, ready for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedMenu {
    pub surface: SurfaceId,
    pub anchor: WindowId,
    pub template: MenuTemplate,
    /// Number of non-empty sections the template was built from.
    pub section_count: usize,
    pub enriched: bool,
}

/// What one [`ContextMenuService::tick`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub bindings: Vec<(SurfaceId, BindOutcome)>,
    pub loads: usize,
}

/// Builds and shows context menus for content surfaces.
pub struct ContextMenuService {
    config: Arc<MenuConfig>,
    host: Arc<dyn SurfaceHost>,
    accounts: Arc<dyn AccountDirectory>,
    spelling: Arc<dyn SpellingService>,
    extensions: Arc<dyn ExtensionRuntime>,
    registry: SurfaceBindingRegistry,
    autofill: AutofillPipeline,
    gate: Arc<PresentationGate>,
    dispatcher: CommandDispatcher,
    inbox: Arc<Mutex<VecDeque<ContextRequest>>>,
    close_on_destroy: ConnectionId,
}

impl ContextMenuService {
    pub fn new(config: MenuConfig, collaborators: Collaborators) -> Self {
        horizon_menu_core::menu_debug!(
            account_links = ?config.account_links,
            wake_settle_delay_ms = config.wake_settle_delay_ms,
            "context menu service created"
        );
        let config = Arc::new(config);
        let inbox: Arc<Mutex<VecDeque<ContextRequest>>> = Arc::default();

        let queue = Arc::clone(&inbox);
        let trigger: TriggerFn = Arc::new(move |request: &ContextRequest| {
            queue.lock().push_back(request.clone());
        });
        let registry = SurfaceBindingRegistry::new(collaborators.host.events(), trigger);

        let autofill = match collaborators.credentials {
            Some(lookup) => AutofillPipeline::new(lookup),
            None => AutofillPipeline::disabled(),
        };

        let gate = Arc::new(PresentationGate::new(collaborators.presenter));
        let closing_gate = Arc::clone(&gate);
        let close_on_destroy = collaborators
            .host
            .events()
            .surface_destroyed
            .connect(move |surface| {
                if closing_gate.close_for_surface(*surface) {
                    tracing::debug!(target: "horizon_menu::presentation", %surface, "surface destroyed, menu closed");
                }
            });

        let dispatcher = CommandDispatcher::new(
            DispatchTargets {
                host: Arc::clone(&collaborators.host),
                shell: collaborators.shell,
                accounts: Arc::clone(&collaborators.accounts),
                spelling: Arc::clone(&collaborators.spelling),
                extensions: Arc::clone(&collaborators.extensions),
            },
            Arc::clone(&config),
        );

        Self {
            config,
            host: collaborators.host,
            accounts: collaborators.accounts,
            spelling: collaborators.spelling,
            extensions: collaborators.extensions,
            registry,
            autofill,
            gate,
            dispatcher,
            inbox,
            close_on_destroy,
        }
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn registry(&self) -> &SurfaceBindingRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &PresentationGate {
        &self.gate
    }

    /// A content surface was created.
    pub fn on_surface_created(&mut self, surface: SurfaceId) -> bool {
        self.registry.request_bind(surface)
    }

    /// A top-level window was created.
    pub fn on_window_created(&mut self, window: WindowId) -> bool {
        self.registry.on_window_created(self.host.as_ref(), window)
    }

    /// Run one turn of deferred work: queued binding validations, then any
    /// wake-sequence loads whose delay has passed.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        let _span =
            tracing::trace_span!(target: "horizon_menu::binding", "tick", name = span_names::TICK)
                .entered();
        TickReport {
            bindings: self.registry.run_tick(self.host.as_ref()),
            loads: self.dispatcher.run_ready(now),
        }
    }

    /// Number of context requests waiting for [`process_requests`](Self::process_requests).
    pub fn pending_requests(&self) -> usize {
        self.inbox.lock().len()
    }

    /// Compose and present every queued context request.
    ///
    /// Returns the number of menus presented.
    pub async fn process_requests(&self) -> usize {
        let mut presented = 0;
        loop {
            let next = self.inbox.lock().pop_front();
            let Some(request) = next else {
                break;
            };
            if self.handle_context_request(request).await.is_some() {
                presented += 1;
            }
        }
        presented
    }

    /// Compose a menu for one request and present it.
    pub async fn handle_context_request(&self, request: ContextRequest) -> Option<MenuHandle> {
        let menu = self.compose_menu(request).await?;
        let surface = menu.surface;
        self.gate.present(surface, menu.anchor, &menu.template, move || {
            tracing::trace!(target: "horizon_menu::presentation", %surface, "menu resources released");
        })
    }

    /// Compose a menu for one request without presenting it.
    ///
    /// Returns `None` if the surface is gone (before or after enrichment) or
    /// has no owning window to anchor to.
    pub async fn compose_menu(&self, request: ContextRequest) -> Option<ComposedMenu> {
        let surface = request.surface;
        let anchor = self.anchor_of(surface)?;

        let snapshot = Arc::new(ContextSnapshot::capture(
            request.params,
            self.accounts.association(surface),
            self.host.is_internal_surface(surface),
        ));
        let sections = self.render_sync(&snapshot);

        let autofill = self
            .autofill
            .enrich(&snapshot)
            .instrument(tracing::debug_span!(
                target: "horizon_menu::enrichment",
                "enrichment",
                name = span_names::ENRICHMENT,
                %surface
            ))
            .await;

        if !self.host.is_alive(surface) {
            tracing::debug!(target: "horizon_menu::presentation", %surface, "surface destroyed during enrichment");
            return None;
        }

        let _perf = PerfSpan::new(span_names::COMPOSE);
        let enriched = autofill.is_some();
        let all: Vec<MenuSection> = autofill.into_iter().chain(sections).collect();
        let section_count = section_count(&all);
        Some(ComposedMenu {
            surface,
            anchor,
            template: compose(all),
            section_count,
            enriched,
        })
    }

    /// Run every synchronous renderer for a snapshot.
    pub fn render_sync(&self, snapshot: &ContextSnapshot) -> Vec<MenuSection> {
        let accounts = self.accounts.accounts();
        let suggestions = snapshot
            .editable_misspelling()
            .map(|word| self.spelling.suggestions(word));
        let inputs = RenderInputs::new(&self.config)
            .with_accounts(&accounts)
            .with_suggestions(suggestions.as_ref());

        let nodes = parse_nodes(self.extensions.registered_menu_nodes());
        let builder = ExtensionTreeBuilder::new(ExtensionClickContext::from_snapshot(snapshot));
        let extension_section = builder.build_section(&nodes, snapshot.is_editable, |id| {
            self.extensions.extension_name(id)
        });

        render_sections(snapshot, &inputs, extension_section)
    }

    /// Execute an invoked menu item's command.
    pub fn dispatch(
        &mut self,
        surface: SurfaceId,
        command: &MenuCommand,
        now: Instant,
    ) -> DispatchOutcome {
        self.dispatcher.dispatch(surface, command, now)
    }

    /// Number of wake-sequence loads still waiting for their delay.
    pub fn pending_loads(&self) -> usize {
        self.dispatcher.pending_count()
    }

    /// How long the owner may wait before the next [`tick`](Self::tick) has
    /// deferred work to do, if any is parked.
    pub fn next_deadline(&mut self, now: Instant) -> Option<Duration> {
        if self.registry.pending_count() > 0 {
            return Some(Duration::ZERO);
        }
        self.dispatcher.time_until_next(now)
    }

    fn anchor_of(&self, surface: SurfaceId) -> Option<WindowId> {
        if !self.host.is_alive(surface) {
            return None;
        }
        let root = self.host.root_surface(surface)?;
        self.host.owning_window(root).map(|window| window.id)
    }
}

impl Drop for ContextMenuService {
    fn drop(&mut self) {
        self.host
            .events()
            .surface_destroyed
            .disconnect(self.close_on_destroy);
    }
}
