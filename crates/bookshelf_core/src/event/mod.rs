//! Intent dispatch and render notification.
//!
//! # Responsibility
//! - Receive user intents and drive the collection store through them.
//! - Fan out a render frame to subscribed renderers after every state
//!   change.
//!
//! # Invariants
//! - Intents are synchronous and terminal; no queueing, no reentry.
//! - Renderers only ever observe persisted state.

pub mod coordinator;
pub mod render_bus;

pub use coordinator::{Coordinator, DispatchOutcome, Intent};
pub use render_bus::{RenderBus, SubscriberId};
