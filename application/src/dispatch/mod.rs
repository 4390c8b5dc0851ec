//! Event dispatch
//!
//! Decoded messages and status strings travel from the line reader over an
//! unbounded channel to an [`EventPump`], which the host drives on a single
//! task. Observers register through [`Observers`] and stay registered for as
//! long as they hold their [`Subscription`].

mod event;
mod observers;
mod pump;

pub use event::{ClientEvent, EventSink};
pub use observers::{Observers, Subscription};
pub use pump::{EventPump, event_channel};
