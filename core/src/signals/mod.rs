//! Game signal system
//!
//! Signals are the explicit event-handler replacement for reactive
//! watchers: the tracker emits a [`GameSignal`] whenever something
//! cross-cutting happens (phase change, curse cleared, timer warning) and
//! every registered [`SignalHandler`] decides what to do with it.
//!
//! The notification relay in [`crate::notify`] is one such handler; the UI
//! shell typically registers another for rendering.

mod handler;
mod signal;

pub use handler::SignalHandler;
pub use signal::{GameSignal, TimerRole};
