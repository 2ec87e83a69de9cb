//! Centralized tuning constants for Orbital Command game logic.
//!
//! Thresholds, scoring bands and the Mission AI script live here so that
//! gameplay can only be adjusted through reviewed code changes.

// Initial station readings ---------------------------------------------------
pub(crate) const INITIAL_SUBSYSTEM_VALUE: u8 = 100;
pub(crate) const INITIAL_OXYGEN_LEVEL: f64 = 98.0;
pub(crate) const INITIAL_POWER_RESERVES: f64 = 85.0;
pub(crate) const INITIAL_INTERNAL_TEMP: f64 = 22.0;
pub(crate) const INITIAL_STRUCTURAL_STRESS: f64 = 5.0;

// Crew status thresholds -----------------------------------------------------
/// Oxygen below this level forces the crew indicator to red.
pub const OXYGEN_RED_THRESHOLD: f64 = 70.0;
/// Oxygen below this level (and at or above red) forces yellow.
pub const OXYGEN_YELLOW_THRESHOLD: f64 = 85.0;

// Outcome scoring ------------------------------------------------------------
pub const SUCCESS_RATE_PASS: u32 = 50;
pub const SUCCESS_RATE_EXCELLENT: u32 = 75;
pub const CREW_SAFETY_MAX: u32 = 100;
pub const CREW_SAFETY_PASS: u32 = 85;
pub const CREW_SAFETY_FLOOR: u32 = 70;

// Mission AI script ----------------------------------------------------------
pub const AI_MESSAGE_INITIAL: &str = "Awaiting activation...";
pub const AI_MESSAGE_CONTROL_ROOM: &str =
    "Awaiting activation... Activate all core systems to bring the station online.";
pub const AI_MESSAGE_ALL_SYSTEMS: &str =
    "All systems nominal. Station is fully operational. Ready for standard operations.";
pub const AI_MESSAGE_BEGIN_INCIDENTS: &str =
    "Alert: Multiple system anomalies detected. Prepare for incident response protocol.";
pub const AI_MESSAGE_CORRECT: &str =
    "Excellent decision. Systems stabilizing. Continue monitoring for additional anomalies.";
pub const AI_MESSAGE_WRONG: &str =
    "Warning: Suboptimal response detected. Review consequences and learn from this decision.";
pub const AI_MESSAGE_NEXT_INCIDENT: &str =
    "New alert detected. Assess the situation carefully before responding.";

#[must_use]
pub fn ai_message_partial_activation(active: usize, total: usize) -> String {
    format!(
        "{active}/{total} systems active. Continue activating remaining systems for full operational status."
    )
}

// Outcome screen copy --------------------------------------------------------
pub(crate) const HEADLINE_SAFE_MODE: &str = "STATION ENTERED SAFE MODE";
pub(crate) const HEADLINE_SUCCESS: &str = "SPACE STATION OPERATED SAFELY";
pub(crate) const HEADLINE_REVIEW: &str = "MISSION REQUIRES REVIEW";
pub(crate) const SUBTITLE_SAFE_MODE: &str =
    "Risk threshold exceeded. Automatic protections activated.";
pub(crate) const SUBTITLE_SUCCESS: &str = "All systems stable. Crew safety maintained.";
pub(crate) const SUBTITLE_REVIEW: &str = "Review your decisions to improve performance.";
pub(crate) const KEY_MESSAGE_SAFE_MODE: &str = "Protecting lives is always mission success.";
pub(crate) const STABILITY_EXCELLENT: &str = "Excellent";
pub(crate) const STABILITY_MODERATE: &str = "Moderate";
pub const LESSONS_LEARNED: [&str; 4] = [
    "Life-support priority in all decisions",
    "Systems interdependence awareness",
    "Calm crisis handling techniques",
    "When to pause instead of pushing objectives",
];
