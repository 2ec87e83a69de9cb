//! Orbital Command Game Engine
//!
//! Platform-agnostic core logic for the Orbital Command space-station safety
//! simulation. This crate provides the mission state machine, the incident
//! catalog and outcome scoring without UI or platform-specific dependencies.

pub mod action;
pub mod constants;
pub mod incidents;
pub mod mission;
pub mod result;
pub mod state;

// Re-export commonly used types
pub use action::{GameAction, reduce};
pub use incidents::{CatalogError, Incident, IncidentCatalog, IncidentChoice, catalog};
pub use mission::{
    ActivationPanel, Advance, DecisionOutcome, EventSeverity, MissionSession, Reaction,
    SessionError, StationEvent, StationEventKind, StationObserver,
};
pub use result::{AccuracyBand, OutcomeSummary, Verdict, score_outcome};
pub use state::{
    CrewStatus, GamePage, GameState, Metric, ParseKeyError, Progress, StationMetrics, Subsystem,
    SubsystemState, Subsystems, SystemStatus,
};
