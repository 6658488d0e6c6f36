//! Contextual action menus for content surfaces.
//!
//! This crate builds the right-click menu of a content surface (a web page,
//! mail view or extension page) on demand:
//!
//! - **Binding**: Attaches the menu trigger to each surface exactly once,
//!   tolerating surfaces that are reported before they are attached
//! - **Sections**: Pure renderers mapping a context snapshot to menu fragments
//! - **Extensions**: Rebuilds menu trees from flat, extension-registered nodes
//! - **Enrichment**: Best-effort asynchronous autofill suggestions
//! - **Aggregation**: Merges fragments into one template, eliding empty ones
//! - **Presentation**: Keeps exactly one open menu per window
//! - **Dispatch**: Runs the command of whichever item the user picks
//!
//! Windows, surfaces, accounts, spelling, credentials, extensions and native
//! menus are owned elsewhere; the traits in [`host`], [`extension`],
//! [`enrichment`] and [`presentation`] describe what this crate needs from
//! them.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Instant;
//! use horizon_menu::prelude::*;
//!
//! let mut service = ContextMenuService::new(MenuConfig::default(), collaborators);
//!
//! // From the surface manager's creation callbacks:
//! service.on_surface_created(surface_id);
//!
//! // Each turn of the event loop:
//! service.tick(Instant::now());
//! service.process_requests().await;
//! ```

pub mod aggregate;
pub mod binding;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod enrichment;
pub mod extension;
pub mod host;
pub mod item;
pub mod presentation;
pub mod sections;
pub mod service;

mod error;

pub use error::{MenuError, Result};

/// Prelude module with commonly used types.
pub mod prelude {
    pub use crate::aggregate::compose;
    pub use crate::binding::{BindOutcome, RejectReason, SurfaceBindingRegistry};
    pub use crate::config::{AccountLinkMode, MenuConfig, SearchEngine};
    pub use crate::context::{ContextSnapshot, EditFlags, InputFieldKind, MediaKind, RawContextParams};
    pub use crate::dispatch::{CommandDispatcher, DispatchOutcome, PendingLoad};
    pub use crate::enrichment::{AutofillPipeline, Credential, CredentialLookup};
    pub use crate::extension::{
        ExtensionClick, ExtensionClickContext, ExtensionMenuNode, ExtensionRuntime,
        ExtensionTreeBuilder, NodeKind, RawExtensionNode,
    };
    pub use crate::host::{
        Account, AccountAssociation, AccountDirectory, ContextRequest, EditCommand, Navigation,
        SettingsPage, Shell, SpellingService, SpellingSuggestions, SubAccount, SurfaceEvents,
        SurfaceHost, SurfaceId, WindowId, WindowInfo,
    };
    pub use crate::item::{MenuCommand, MenuItem, MenuSection, MenuTemplate};
    pub use crate::presentation::{MenuHandle, MenuPresenter, OnClosed, PresentationGate};
    pub use crate::service::{Collaborators, ComposedMenu, ContextMenuService, TickReport};
    pub use crate::{MenuError, Result};
}
