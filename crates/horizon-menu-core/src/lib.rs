//! Core event-thread primitives for Horizon Menu.
//!
//! This crate provides the building blocks the context menu subsystem runs on:
//!
//! - **Signal/Slot System**: Type-safe notifications for surface lifecycle events
//! - **Tick Queue**: Work deferred to the next turn of the event thread
//! - **Deferred Scheduler**: Payloads that become ready after a fixed delay
//! - **Logging**: Span names, performance spans and a log macro
//!
//! Everything here is driven explicitly by its owner. Nothing spawns threads
//! or reads the clock behind the caller's back, which keeps the deferred
//! paths testable with a manual driver.
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_menu_core::Signal;
//!
//! let surface_destroyed = Signal::<u64>::new();
//!
//! let conn_id = surface_destroyed.connect(|id| {
//!     println!("surface {} destroyed", id);
//! });
//!
//! surface_destroyed.emit(7);
//! surface_destroyed.disconnect(conn_id);
//! ```
//!
//! # Tick Queue Example
//!
//! ```
//! use horizon_menu_core::TickQueue;
//!
//! let mut queue = TickQueue::new();
//! queue.post("validate surface 1");
//! queue.post("validate surface 2");
//!
//! // Everything posted before the tick is handed back in order.
//! let ready = queue.begin_tick();
//! assert_eq!(ready, vec!["validate surface 1", "validate surface 2"]);
//! ```

mod error;
pub mod logging;
mod scheduler;
pub mod signal;
mod task;

pub use error::{Result, SchedulerError};
pub use logging::PerfSpan;
pub use scheduler::{DeferredScheduler, ScheduledTaskId};
pub use signal::{ConnectionId, Signal};
pub use task::TickQueue;
