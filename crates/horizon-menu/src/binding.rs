//! Surface binding registry.
//!
//! Attaches the context menu trigger to content surfaces, exactly once per
//! surface. Surfaces are reported from two places, individual surface
//! creation and top-level window creation (which yields the window's primary
//! surface), and both are treated as the same event.
//!
//! Binding is a two-phase protocol:
//!
//! 1. [`request_bind`](SurfaceBindingRegistry::request_bind) queues the
//!    surface for validation on the next tick. A surface may be reported
//!    before it is attached to its window, so nothing is checked inline.
//! 2. [`run_tick`](SurfaceBindingRegistry::run_tick) validates each queued
//!    surface and binds the ones that pass.
//!
//! A bound surface gets one slot on [`SurfaceEvents::context_requested`]
//! that forwards requests for that surface to the trigger callback. The
//! record and its slot are removed when the surface manager reports the
//! surface destroyed.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use horizon_menu_core::{ConnectionId, TickQueue};
use parking_lot::Mutex;

use crate::host::{ContextRequest, SurfaceEvents, SurfaceHost, SurfaceId, WindowId};

/// Callback run for every context request on a bound surface.
pub type TriggerFn = Arc<dyn Fn(&ContextRequest) + Send + Sync>;

/// Why a queued surface was not bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Destroyed before validation ran.
    Destroyed,
    /// No top-level surface could be resolved (transient or devtools surface).
    NoRootSurface,
    /// The root surface has no owning window.
    NoOwningWindow,
    /// The window opts its primary surface out of menus.
    PrimaryOptedOut,
    /// Another request already bound this surface.
    AlreadyBound,
}

/// Result of validating one queued surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    Bound,
    Rejected(RejectReason),
}

/// A bound surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindingRecord {
    pub surface: SurfaceId,
    pub window: WindowId,
    /// The trigger's slot on `context_requested`.
    pub trigger: ConnectionId,
}

/// Tracks which surfaces carry the menu trigger.
pub struct SurfaceBindingRegistry {
    events: Arc<SurfaceEvents>,
    bindings: Arc<Mutex<HashMap<SurfaceId, BindingRecord>>>,
    pending: TickQueue<SurfaceId>,
    trigger: TriggerFn,
    destroyed_slot: ConnectionId,
}

impl SurfaceBindingRegistry {
    /// Create a registry that binds `trigger` to surfaces of `events`.
    pub fn new(events: Arc<SurfaceEvents>, trigger: TriggerFn) -> Self {
        let bindings: Arc<Mutex<HashMap<SurfaceId, BindingRecord>>> = Arc::default();

        let weak_events: Weak<SurfaceEvents> = Arc::downgrade(&events);
        let slot_bindings = Arc::clone(&bindings);
        let destroyed_slot = events.surface_destroyed.connect(move |surface| {
            let removed = slot_bindings.lock().remove(surface);
            let Some(record) = removed else {
                return;
            };
            if let Some(events) = weak_events.upgrade() {
                events.context_requested.disconnect(record.trigger);
            }
            tracing::debug!(target: "horizon_menu::binding", %surface, "surface destroyed, binding removed");
        });

        Self {
            events,
            bindings,
            pending: TickQueue::new(),
            trigger,
            destroyed_slot,
        }
    }

    /// Queue a newly created surface for validation on the next tick.
    ///
    /// Returns `false` if the surface is already bound or already queued.
    pub fn request_bind(&mut self, surface: SurfaceId) -> bool {
        if self.is_bound(surface) || self.pending.any_pending(|s| *s == surface) {
            tracing::trace!(target: "horizon_menu::binding", %surface, "duplicate bind request ignored");
            return false;
        }
        self.pending.post(surface);
        true
    }

    /// Queue a newly created window's primary surface.
    pub fn on_window_created(&mut self, host: &dyn SurfaceHost, window: WindowId) -> bool {
        match host.primary_surface(window) {
            Some(surface) => self.request_bind(surface),
            None => {
                tracing::debug!(
                    target: "horizon_menu::binding",
                    window = window.as_u64(),
                    "window has no primary surface yet"
                );
                false
            }
        }
    }

    /// Validate and bind everything queued before this tick.
    #[tracing::instrument(skip_all, target = "horizon_menu::binding", level = "trace")]
    pub fn run_tick(&mut self, host: &dyn SurfaceHost) -> Vec<(SurfaceId, BindOutcome)> {
        self.pending
            .begin_tick()
            .into_iter()
            .map(|surface| {
                let outcome = match self.validate(host, surface) {
                    Ok(window) => {
                        self.attach(surface, window);
                        BindOutcome::Bound
                    }
                    Err(reason) => {
                        tracing::debug!(target: "horizon_menu::binding", %surface, ?reason, "surface not bound");
                        BindOutcome::Rejected(reason)
                    }
                };
                (surface, outcome)
            })
            .collect()
    }

    /// Check whether a surface may be bound, without binding it.
    ///
    /// Returns the owning window on success.
    pub fn validate(
        &self,
        host: &dyn SurfaceHost,
        surface: SurfaceId,
    ) -> Result<WindowId, RejectReason> {
        if !host.is_alive(surface) {
            return Err(RejectReason::Destroyed);
        }
        let root = host
            .root_surface(surface)
            .ok_or(RejectReason::NoRootSurface)?;
        let window = host
            .owning_window(root)
            .ok_or(RejectReason::NoOwningWindow)?;
        if window.primary_surface_opts_out && window.primary_surface == Some(surface) {
            return Err(RejectReason::PrimaryOptedOut);
        }
        if self.is_bound(surface) {
            return Err(RejectReason::AlreadyBound);
        }
        Ok(window.id)
    }

    fn attach(&self, surface: SurfaceId, window: WindowId) {
        let trigger = Arc::clone(&self.trigger);
        let connection = self.events.context_requested.connect(move |request| {
            if request.surface == surface {
                trigger(request);
            }
        });
        self.bindings.lock().insert(
            surface,
            BindingRecord {
                surface,
                window,
                trigger: connection,
            },
        );
        tracing::debug!(target: "horizon_menu::binding", %surface, "surface bound");
    }

    /// Whether a surface currently carries the trigger.
    pub fn is_bound(&self, surface: SurfaceId) -> bool {
        self.bindings.lock().contains_key(&surface)
    }

    /// The binding record of a surface.
    pub fn binding(&self, surface: SurfaceId) -> Option<BindingRecord> {
        self.bindings.lock().get(&surface).copied()
    }

    pub fn bound_count(&self) -> usize {
        self.bindings.lock().len()
    }

    /// Number of surfaces waiting for the next tick.
    pub fn pending_count(&self) -> usize {
        self.pending.pending_count()
    }
}

impl Drop for SurfaceBindingRegistry {
    fn drop(&mut self) {
        self.events.surface_destroyed.disconnect(self.destroyed_slot);
        for record in self.bindings.lock().drain().map(|(_, record)| record) {
            self.events.context_requested.disconnect(record.trigger);
        }
    }
}

static_assertions::assert_impl_all!(SurfaceBindingRegistry: Send, Sync);
