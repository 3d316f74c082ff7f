//! Asynchronous side effects.
//!
//! The engine never sends anything itself. It publishes [`NotificationEvent`]s through [`EventProducers::notify`] and
//! carries on; whatever is subscribed via [`EventHooks`] runs on its own task and its outcome is never inspected.
mod channel;
mod event_types;
mod hooks;

pub use channel::{EventHandler, EventProducer, Handler};
pub use event_types::*;
pub use hooks::{EventHandlers, EventHooks, EventProducers};
