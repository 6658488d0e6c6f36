//! Presentation gate.
//!
//! Hands finished templates to the native menu presenter while keeping at
//! most one menu open per window. Presenting a second menu on a window
//! force-closes the first one before the new one is shown.
//!
//! Every presented menu's close callback runs exactly once, whichever way
//! the menu ends: dismissed by the user, replaced by another menu, or closed
//! through the gate.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::host::{SurfaceId, WindowId};
use crate::item::MenuTemplate;

/// Callback run once when a presented menu closes.
pub type OnClosed = Box<dyn FnOnce() + Send + 'static>;

/// Presenter-assigned handle of an open native menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuHandle(pub u64);

/// Native menu rendering.
pub trait MenuPresenter: Send + Sync {
    /// Show a template as a modal menu anchored to a window.
    ///
    /// `on_closed` must be invoked once when the menu is dismissed by any
    /// means, including [`close`](Self::close).
    fn present(
        &self,
        template: &MenuTemplate,
        anchor: WindowId,
        on_closed: OnClosed,
    ) -> MenuHandle;

    /// Close an open menu.
    fn close(&self, handle: MenuHandle);
}

type ReleaseSlot = Arc<Mutex<Option<OnClosed>>>;

struct ActiveMenu {
    token: u64,
    surface: SurfaceId,
    handle: Option<MenuHandle>,
    release: ReleaseSlot,
}

fn release(slot: &ReleaseSlot) {
    let callback = slot.lock().take();
    if let Some(callback) = callback {
        callback();
    }
}

/// Guarantees one presented menu per window.
pub struct PresentationGate {
    presenter: Arc<dyn MenuPresenter>,
    active: Arc<Mutex<HashMap<WindowId, ActiveMenu>>>,
    next_token: AtomicU64,
}

impl PresentationGate {
    pub fn new(presenter: Arc<dyn MenuPresenter>) -> Self {
        Self {
            presenter,
            active: Arc::default(),
            next_token: AtomicU64::new(1),
        }
    }

    /// Present a template for `surface` anchored to `anchor`.
    ///
    /// An empty template is not presented and `on_closed` is dropped
    /// without running. Returns the handle of the shown menu.
    pub fn present(
        &self,
        surface: SurfaceId,
        anchor: WindowId,
        template: &MenuTemplate,
        on_closed: impl FnOnce() + Send + 'static,
    ) -> Option<MenuHandle> {
        if template.is_empty() {
            tracing::debug!(target: "horizon_menu::presentation", %surface, "empty template, nothing to present");
            return None;
        }

        self.close(anchor);

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let on_closed: OnClosed = Box::new(on_closed);
        let release_slot: ReleaseSlot = Arc::new(Mutex::new(Some(on_closed)));
        self.active.lock().insert(
            anchor,
            ActiveMenu {
                token,
                surface,
                handle: None,
                release: Arc::clone(&release_slot),
            },
        );

        let active = Arc::clone(&self.active);
        let closed: OnClosed = Box::new(move || {
            {
                let mut active = active.lock();
                if active.get(&anchor).is_some_and(|menu| menu.token == token) {
                    active.remove(&anchor);
                }
            }
            tracing::debug!(target: "horizon_menu::presentation", %surface, "menu closed");
            release(&release_slot);
        });

        let handle = self.presenter.present(template, anchor, closed);
        if let Some(menu) = self.active.lock().get_mut(&anchor)
            && menu.token == token
        {
            menu.handle = Some(handle);
        }
        tracing::debug!(
            target: "horizon_menu::presentation",
            %surface,
            window = anchor.as_u64(),
            items = template.len(),
            "menu presented"
        );
        Some(handle)
    }

    /// Force-close the menu open on a window, if any.
    ///
    /// Returns `true` if a menu was open.
    pub fn close(&self, anchor: WindowId) -> bool {
        let previous = self.active.lock().remove(&anchor);
        let Some(previous) = previous else {
            return false;
        };
        tracing::debug!(
            target: "horizon_menu::presentation",
            surface = %previous.surface,
            "closing previous menu"
        );
        if let Some(handle) = previous.handle {
            self.presenter.close(handle);
        }
        // The presenter may already have run the callback from `close`.
        release(&previous.release);
        true
    }

    /// Force-close any menu presented for a surface.
    pub fn close_for_surface(&self, surface: SurfaceId) -> bool {
        let anchor = self
            .active
            .lock()
            .iter()
            .find(|(_, menu)| menu.surface == surface)
            .map(|(anchor, _)| *anchor);
        anchor.is_some_and(|anchor| self.close(anchor))
    }

    /// Whether a menu is open on a window.
    pub fn is_presenting(&self, anchor: WindowId) -> bool {
        self.active.lock().contains_key(&anchor)
    }

    /// Number of open menus across all windows.
    pub fn active_count(&self) -> usize {
        self.active.lock().len()
    }
}

static_assertions::assert_impl_all!(PresentationGate: Send, Sync);
