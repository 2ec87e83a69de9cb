use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::constants::{
    AI_MESSAGE_INITIAL, INITIAL_INTERNAL_TEMP, INITIAL_OXYGEN_LEVEL, INITIAL_POWER_RESERVES,
    INITIAL_STRUCTURAL_STRESS, INITIAL_SUBSYSTEM_VALUE, OXYGEN_RED_THRESHOLD,
    OXYGEN_YELLOW_THRESHOLD,
};

/// Error returned when a string key does not name a known page, subsystem,
/// status or metric.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} key `{value}`")]
pub struct ParseKeyError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseKeyError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Screen currently driven by the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GamePage {
    #[default]
    Intro,
    Level1,
    Level2,
    Outcome,
}

impl GamePage {
    pub const ALL: [Self; 4] = [Self::Intro, Self::Level1, Self::Level2, Self::Outcome];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::Level1 => "level1",
            Self::Level2 => "level2",
            Self::Outcome => "outcome",
        }
    }

    /// Whether moving from `self` to `next` follows the mission path
    /// intro -> level1 -> level2 -> outcome, or the outcome -> intro restart.
    #[must_use]
    pub const fn allows_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Intro, Self::Level1)
                | (Self::Level1, Self::Level2)
                | (Self::Level2, Self::Outcome)
                | (Self::Outcome, Self::Intro)
        )
    }
}

impl fmt::Display for GamePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePage {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "intro" => Ok(Self::Intro),
            "level1" => Ok(Self::Level1),
            "level2" => Ok(Self::Level2),
            "outcome" => Ok(Self::Outcome),
            _ => Err(ParseKeyError::new("page", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    #[default]
    Standby,
    Nominal,
    Warning,
    Critical,
}

impl SystemStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standby => "standby",
            Self::Nominal => "nominal",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemStatus {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standby" => Ok(Self::Standby),
            "nominal" => Ok(Self::Nominal),
            "warning" => Ok(Self::Warning),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseKeyError::new("system status", s)),
        }
    }
}

/// Traffic-light crew indicator driven by the oxygen gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CrewStatus {
    #[default]
    Green,
    Yellow,
    Red,
}

impl CrewStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }

    /// Crew status forced by an oxygen reading, if any.
    ///
    /// Readings at or above the yellow threshold return `None`: a recovering
    /// oxygen level never lifts the crew back to green on its own.
    #[must_use]
    pub fn for_oxygen(level: f64) -> Option<Self> {
        if level < OXYGEN_RED_THRESHOLD {
            Some(Self::Red)
        } else if level < OXYGEN_YELLOW_THRESHOLD {
            Some(Self::Yellow)
        } else {
            None
        }
    }
}

impl fmt::Display for CrewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CrewStatus {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "green" => Ok(Self::Green),
            "yellow" => Ok(Self::Yellow),
            "red" => Ok(Self::Red),
            _ => Err(ParseKeyError::new("crew status", s)),
        }
    }
}

/// The five controllable station systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    LifeSupport,
    PowerSystems,
    ThermalControl,
    AttitudeControl,
    Communications,
}

impl Subsystem {
    pub const ALL: [Self; 5] = [
        Self::LifeSupport,
        Self::PowerSystems,
        Self::ThermalControl,
        Self::AttitudeControl,
        Self::Communications,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LifeSupport => "life_support",
            Self::PowerSystems => "power_systems",
            Self::ThermalControl => "thermal_control",
            Self::AttitudeControl => "attitude_control",
            Self::Communications => "communications",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LifeSupport => "Life Support",
            Self::PowerSystems => "Power Systems",
            Self::ThermalControl => "Thermal Control",
            Self::AttitudeControl => "Attitude Control",
            Self::Communications => "Communications",
        }
    }

    /// Position in [`Subsystem::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::LifeSupport => 0,
            Self::PowerSystems => 1,
            Self::ThermalControl => 2,
            Self::AttitudeControl => 3,
            Self::Communications => 4,
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsystem {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|system| system.as_str() == s)
            .ok_or_else(|| ParseKeyError::new("subsystem", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsystemState {
    pub status: SystemStatus,
    pub value: u8,
    pub label: String,
}

impl SubsystemState {
    fn initial(system: Subsystem) -> Self {
        Self {
            status: SystemStatus::Standby,
            value: INITIAL_SUBSYSTEM_VALUE,
            label: system.label().to_string(),
        }
    }
}

/// Panel readings for every subsystem. No cross-subsystem rule is enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsystems {
    pub life_support: SubsystemState,
    pub power_systems: SubsystemState,
    pub thermal_control: SubsystemState,
    pub attitude_control: SubsystemState,
    pub communications: SubsystemState,
}

impl Default for Subsystems {
    fn default() -> Self {
        Self {
            life_support: SubsystemState::initial(Subsystem::LifeSupport),
            power_systems: SubsystemState::initial(Subsystem::PowerSystems),
            thermal_control: SubsystemState::initial(Subsystem::ThermalControl),
            attitude_control: SubsystemState::initial(Subsystem::AttitudeControl),
            communications: SubsystemState::initial(Subsystem::Communications),
        }
    }
}

impl Subsystems {
    #[must_use]
    pub const fn get(&self, system: Subsystem) -> &SubsystemState {
        match system {
            Subsystem::LifeSupport => &self.life_support,
            Subsystem::PowerSystems => &self.power_systems,
            Subsystem::ThermalControl => &self.thermal_control,
            Subsystem::AttitudeControl => &self.attitude_control,
            Subsystem::Communications => &self.communications,
        }
    }

    pub const fn get_mut(&mut self, system: Subsystem) -> &mut SubsystemState {
        match system {
            Subsystem::LifeSupport => &mut self.life_support,
            Subsystem::PowerSystems => &mut self.power_systems,
            Subsystem::ThermalControl => &mut self.thermal_control,
            Subsystem::AttitudeControl => &mut self.attitude_control,
            Subsystem::Communications => &mut self.communications,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subsystem, &SubsystemState)> {
        Subsystem::ALL
            .into_iter()
            .map(move |system| (system, self.get(system)))
    }

    pub fn set_all_status(&mut self, status: SystemStatus) {
        for system in Subsystem::ALL {
            self.get_mut(system).status = status;
        }
    }

    #[must_use]
    pub fn count_with_status(&self, status: SystemStatus) -> usize {
        self.iter().filter(|(_, state)| state.status == status).count()
    }
}

/// Numeric station gauges that can be overwritten independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    OxygenLevel,
    PowerReserves,
    InternalTemp,
    StructuralStress,
}

impl Metric {
    pub const ALL: [Self; 4] = [
        Self::OxygenLevel,
        Self::PowerReserves,
        Self::InternalTemp,
        Self::StructuralStress,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OxygenLevel => "oxygen_level",
            Self::PowerReserves => "power_reserves",
            Self::InternalTemp => "internal_temp",
            Self::StructuralStress => "structural_stress",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.as_str() == s)
            .ok_or_else(|| ParseKeyError::new("metric", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StationMetrics {
    pub oxygen_level: f64,
    pub power_reserves: f64,
    pub internal_temp: f64,
    pub structural_stress: f64,
}

impl Default for StationMetrics {
    fn default() -> Self {
        Self {
            oxygen_level: INITIAL_OXYGEN_LEVEL,
            power_reserves: INITIAL_POWER_RESERVES,
            internal_temp: INITIAL_INTERNAL_TEMP,
            structural_stress: INITIAL_STRUCTURAL_STRESS,
        }
    }
}

impl StationMetrics {
    #[must_use]
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::OxygenLevel => self.oxygen_level,
            Metric::PowerReserves => self.power_reserves,
            Metric::InternalTemp => self.internal_temp,
            Metric::StructuralStress => self.structural_stress,
        }
    }

    pub const fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::OxygenLevel => self.oxygen_level = value,
            Metric::PowerReserves => self.power_reserves = value,
            Metric::InternalTemp => self.internal_temp = value,
            Metric::StructuralStress => self.structural_stress = value,
        }
    }
}

/// Quiz progress counters. All of them only grow within a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Progress {
    pub current_incident_index: usize,
    pub incidents_completed: u32,
    pub correct_decisions: u32,
    pub total_decisions: u32,
}

/// Complete mission state. Only ever replaced through [`crate::reduce`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub current_page: GamePage,
    pub systems: Subsystems,
    pub metrics: StationMetrics,
    pub crew_status: CrewStatus,
    pub progress: Progress,
    pub safe_mode_activated: bool,
    pub ai_message: String,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_page: GamePage::Intro,
            systems: Subsystems::default(),
            metrics: StationMetrics::default(),
            crew_status: CrewStatus::Green,
            progress: Progress::default(),
            safe_mode_activated: false,
            ai_message: AI_MESSAGE_INITIAL.to_string(),
        }
    }
}

impl GameState {
    /// Fresh state for a new playthrough.
    #[must_use]
    pub fn initial() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn subsystem(&self, system: Subsystem) -> &SubsystemState {
        self.systems.get(system)
    }

    #[must_use]
    pub fn all_systems_nominal(&self) -> bool {
        self.systems.count_with_status(SystemStatus::Nominal) == Subsystem::ALL.len()
    }
}
