//! Orchestration layer that drives the reducer on behalf of the screens.
//!
//! The session owns the state explicitly; there is no global game instance.

pub mod activation;
pub mod event;
pub mod session;

pub use activation::ActivationPanel;
pub use event::{
    EventId, EventSeverity, Reaction, StationEvent, StationEventKind, StationObserver,
    derive_events,
};
pub use session::{Advance, DecisionOutcome, MissionSession, SessionError};
