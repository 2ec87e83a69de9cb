//! Typed actions and the pure reducer that applies them.
//!
//! Every state change in a playthrough is one of the nine [`GameAction`]
//! kinds below. The reducer never fails and never performs I/O; it computes
//! the next snapshot from the previous one, so dispatch order matters.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::AI_MESSAGE_CONTROL_ROOM;
use crate::state::{CrewStatus, GamePage, GameState, Metric, Subsystem, SystemStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameAction {
    SetPage { page: GamePage },
    SetSystemStatus { system: Subsystem, status: SystemStatus },
    UpdateMetric { metric: Metric, value: f64 },
    SetCrewStatus { status: CrewStatus },
    MakeDecision { correct: bool },
    NextIncident,
    ActivateSafeMode,
    SetAiMessage { message: String },
    ResetGame,
}

impl GameAction {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::SetPage { .. } => "set_page",
            Self::SetSystemStatus { .. } => "set_system_status",
            Self::UpdateMetric { .. } => "update_metric",
            Self::SetCrewStatus { .. } => "set_crew_status",
            Self::MakeDecision { .. } => "make_decision",
            Self::NextIncident => "next_incident",
            Self::ActivateSafeMode => "activate_safe_mode",
            Self::SetAiMessage { .. } => "set_ai_message",
            Self::ResetGame => "reset_game",
        }
    }

    pub fn set_ai_message(message: impl Into<String>) -> Self {
        Self::SetAiMessage {
            message: message.into(),
        }
    }
}

impl fmt::Display for GameAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetPage { page } => write!(f, "set_page({page})"),
            Self::SetSystemStatus { system, status } => {
                write!(f, "set_system_status({system}, {status})")
            }
            Self::UpdateMetric { metric, value } => write!(f, "update_metric({metric}, {value})"),
            Self::SetCrewStatus { status } => write!(f, "set_crew_status({status})"),
            Self::MakeDecision { correct } => write!(f, "make_decision({correct})"),
            Self::SetAiMessage { message } => write!(f, "set_ai_message({message:?})"),
            Self::NextIncident | Self::ActivateSafeMode | Self::ResetGame => {
                f.write_str(self.kind())
            }
        }
    }
}

/// Compute the state that follows `state` once `action` is applied.
#[must_use]
pub fn reduce(state: &GameState, action: GameAction) -> GameState {
    let mut next = state.clone();
    match action {
        GameAction::SetPage { page } => {
            next.current_page = page;
            if page == GamePage::Level1 {
                // Entering the control room resets every panel indicator.
                next.systems.set_all_status(SystemStatus::Standby);
                next.ai_message = AI_MESSAGE_CONTROL_ROOM.to_string();
            }
        }
        GameAction::SetSystemStatus { system, status } => {
            next.systems.get_mut(system).status = status;
        }
        GameAction::UpdateMetric { metric, value } => {
            next.metrics.set(metric, value);
            if metric == Metric::OxygenLevel
                && let Some(crew) = CrewStatus::for_oxygen(value)
            {
                next.crew_status = crew;
            }
        }
        GameAction::SetCrewStatus { status } => {
            next.crew_status = status;
        }
        GameAction::MakeDecision { correct } => {
            next.progress.total_decisions += 1;
            if correct {
                next.progress.correct_decisions += 1;
            }
        }
        GameAction::NextIncident => {
            next.progress.current_incident_index += 1;
            next.progress.incidents_completed += 1;
        }
        GameAction::ActivateSafeMode => {
            next.safe_mode_activated = true;
        }
        GameAction::SetAiMessage { message } => {
            next.ai_message = message;
        }
        GameAction::ResetGame => {
            next = GameState::initial();
        }
    }
    next
}

impl GameState {
    /// Consume this snapshot and return the one produced by `action`.
    #[must_use]
    pub fn apply(self, action: GameAction) -> Self {
        reduce(&self, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dispatch_all(actions: impl IntoIterator<Item = GameAction>) -> GameState {
        actions
            .into_iter()
            .fold(GameState::initial(), GameState::apply)
    }

    #[test]
    fn entering_level1_resets_panels_and_message() {
        let mut state = GameState::initial();
        for system in Subsystem::ALL {
            state = state.apply(GameAction::SetSystemStatus {
                system,
                status: SystemStatus::Critical,
            });
        }
        state = state.apply(GameAction::SetPage {
            page: GamePage::Level1,
        });
        assert_eq!(state.current_page, GamePage::Level1);
        assert_eq!(state.systems.count_with_status(SystemStatus::Standby), 5);
        assert_eq!(state.ai_message, AI_MESSAGE_CONTROL_ROOM);
    }

    #[test]
    fn other_page_changes_leave_panels_alone() {
        let state = dispatch_all([
            GameAction::SetSystemStatus {
                system: Subsystem::Communications,
                status: SystemStatus::Nominal,
            },
            GameAction::set_ai_message("hold"),
            GameAction::SetPage {
                page: GamePage::Level2,
            },
        ]);
        assert_eq!(
            state.subsystem(Subsystem::Communications).status,
            SystemStatus::Nominal
        );
        assert_eq!(state.ai_message, "hold");
    }

    #[test]
    fn set_system_status_touches_one_panel() {
        let state = dispatch_all([GameAction::SetSystemStatus {
            system: Subsystem::PowerSystems,
            status: SystemStatus::Warning,
        }]);
        for (system, panel) in state.systems.iter() {
            let expected = if system == Subsystem::PowerSystems {
                SystemStatus::Warning
            } else {
                SystemStatus::Standby
            };
            assert_eq!(panel.status, expected, "{system}");
        }
    }

    #[test]
    fn oxygen_updates_only_ever_lower_crew_status() {
        let red = dispatch_all([GameAction::UpdateMetric {
            metric: Metric::OxygenLevel,
            value: 60.0,
        }]);
        assert_eq!(red.crew_status, CrewStatus::Red);

        let yellow = dispatch_all([GameAction::UpdateMetric {
            metric: Metric::OxygenLevel,
            value: 80.0,
        }]);
        assert_eq!(yellow.crew_status, CrewStatus::Yellow);

        let still_red = red.apply(GameAction::UpdateMetric {
            metric: Metric::OxygenLevel,
            value: 95.0,
        });
        assert_eq!(still_red.crew_status, CrewStatus::Red);
        assert!((still_red.metrics.oxygen_level - 95.0).abs() < f64::EPSILON);

        let restored = still_red.apply(GameAction::SetCrewStatus {
            status: CrewStatus::Green,
        });
        assert_eq!(restored.crew_status, CrewStatus::Green);
    }

    #[test]
    fn non_oxygen_metrics_never_touch_crew_status() {
        let state = dispatch_all([
            GameAction::UpdateMetric {
                metric: Metric::PowerReserves,
                value: 10.0,
            },
            GameAction::UpdateMetric {
                metric: Metric::InternalTemp,
                value: 41.5,
            },
        ]);
        assert_eq!(state.crew_status, CrewStatus::Green);
        assert!((state.metrics.power_reserves - 10.0).abs() < f64::EPSILON);
        assert!((state.metrics.internal_temp - 41.5).abs() < f64::EPSILON);
    }

    #[test]
    fn decisions_and_incidents_count_up() {
        let state = dispatch_all([
            GameAction::MakeDecision { correct: true },
            GameAction::NextIncident,
            GameAction::MakeDecision { correct: false },
            GameAction::MakeDecision { correct: false },
        ]);
        assert_eq!(state.progress.total_decisions, 3);
        assert_eq!(state.progress.correct_decisions, 1);
        assert_eq!(state.progress.current_incident_index, 1);
        assert_eq!(state.progress.incidents_completed, 1);
    }

    #[test]
    fn safe_mode_is_latched_until_reset() {
        let latched = dispatch_all([
            GameAction::ActivateSafeMode,
            GameAction::SetPage {
                page: GamePage::Level1,
            },
            GameAction::MakeDecision { correct: true },
            GameAction::ActivateSafeMode,
        ]);
        assert!(latched.safe_mode_activated);
        let reset = latched.apply(GameAction::ResetGame);
        assert!(!reset.safe_mode_activated);
        assert_eq!(reset, GameState::initial());
    }

    #[test]
    fn action_labels_are_stable() {
        assert_eq!(GameAction::NextIncident.to_string(), "next_incident");
        assert_eq!(
            GameAction::SetPage {
                page: GamePage::Outcome
            }
            .to_string(),
            "set_page(outcome)"
        );
        let json = serde_json::to_string(&GameAction::MakeDecision { correct: true }).unwrap();
        assert_eq!(json, r#"{"type":"make_decision","correct":true}"#);
    }
}
