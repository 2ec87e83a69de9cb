//! Structured events emitted after each dispatched action.
//!
//! Events are plain data derived by comparing the snapshot before and after
//! a dispatch. Presentation layers subscribe to them to trigger one-shot
//! effects (reaction flashes, sounds, shakes); nothing here feeds back into
//! the game state.

use serde::{Deserialize, Serialize};

use crate::action::GameAction;
use crate::state::{CrewStatus, GamePage, GameState};

/// Stable, monotonically increasing identifier for an event within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

/// Immediate cue for how the station reacts to a scored decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reaction {
    Correct,
    Wrong,
}

impl Reaction {
    #[must_use]
    pub const fn from_correct(correct: bool) -> Self {
        if correct { Self::Correct } else { Self::Wrong }
    }
}

/// Severity tier for a station event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StationEventKind {
    PageChanged { from: GamePage, to: GamePage },
    DecisionScored { reaction: Reaction },
    IncidentAdvanced { index: usize },
    SafeModeEngaged,
    CrewStatusChanged { from: CrewStatus, to: CrewStatus },
    AiMessageChanged { message: String },
    Reset,
}

impl StationEventKind {
    #[must_use]
    pub const fn severity(&self) -> EventSeverity {
        match self {
            Self::DecisionScored {
                reaction: Reaction::Wrong,
            } => EventSeverity::Warning,
            Self::CrewStatusChanged {
                to: CrewStatus::Red,
                ..
            }
            | Self::SafeModeEngaged => EventSeverity::Critical,
            Self::CrewStatusChanged {
                to: CrewStatus::Yellow,
                ..
            } => EventSeverity::Warning,
            _ => EventSeverity::Info,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationEvent {
    pub id: EventId,
    pub severity: EventSeverity,
    #[serde(flatten)]
    pub kind: StationEventKind,
}

/// Derive the event kinds produced by applying `action` to `before`.
#[must_use]
pub fn derive_events(
    before: &GameState,
    action: &GameAction,
    after: &GameState,
) -> Vec<StationEventKind> {
    if matches!(action, GameAction::ResetGame) {
        return vec![StationEventKind::Reset];
    }

    let mut kinds = Vec::new();
    if before.current_page != after.current_page {
        kinds.push(StationEventKind::PageChanged {
            from: before.current_page,
            to: after.current_page,
        });
    }
    if let GameAction::MakeDecision { correct } = action {
        kinds.push(StationEventKind::DecisionScored {
            reaction: Reaction::from_correct(*correct),
        });
    }
    if after.progress.current_incident_index > before.progress.current_incident_index {
        kinds.push(StationEventKind::IncidentAdvanced {
            index: after.progress.current_incident_index,
        });
    }
    if after.safe_mode_activated && !before.safe_mode_activated {
        kinds.push(StationEventKind::SafeModeEngaged);
    }
    if before.crew_status != after.crew_status {
        kinds.push(StationEventKind::CrewStatusChanged {
            from: before.crew_status,
            to: after.crew_status,
        });
    }
    if before.ai_message != after.ai_message {
        kinds.push(StationEventKind::AiMessageChanged {
            message: after.ai_message.clone(),
        });
    }
    kinds
}

/// Fire-and-forget consumer of station events.
pub trait StationObserver {
    fn on_event(&mut self, event: &StationEvent);
}

impl<F> StationObserver for F
where
    F: FnMut(&StationEvent),
{
    fn on_event(&mut self, event: &StationEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::reduce;
    use crate::state::Metric;

    fn kinds_for(before: &GameState, action: GameAction) -> Vec<StationEventKind> {
        let after = reduce(before, action.clone());
        derive_events(before, &action, &after)
    }

    #[test]
    fn decision_emits_reaction_cue() {
        let kinds = kinds_for(
            &GameState::initial(),
            GameAction::MakeDecision { correct: false },
        );
        assert_eq!(
            kinds,
            vec![StationEventKind::DecisionScored {
                reaction: Reaction::Wrong
            }]
        );
        assert_eq!(kinds[0].severity(), EventSeverity::Warning);
    }

    #[test]
    fn entering_control_room_reports_page_and_message() {
        let kinds = kinds_for(
            &GameState::initial(),
            GameAction::SetPage {
                page: GamePage::Level1,
            },
        );
        assert!(matches!(
            kinds[0],
            StationEventKind::PageChanged {
                from: GamePage::Intro,
                to: GamePage::Level1
            }
        ));
        assert!(matches!(kinds[1], StationEventKind::AiMessageChanged { .. }));
    }

    #[test]
    fn oxygen_drop_reports_crew_change() {
        let kinds = kinds_for(
            &GameState::initial(),
            GameAction::UpdateMetric {
                metric: Metric::OxygenLevel,
                value: 50.0,
            },
        );
        assert_eq!(
            kinds,
            vec![StationEventKind::CrewStatusChanged {
                from: CrewStatus::Green,
                to: CrewStatus::Red
            }]
        );
        assert_eq!(kinds[0].severity(), EventSeverity::Critical);
    }

    #[test]
    fn repeated_safe_mode_only_reports_once() {
        let latched = reduce(&GameState::initial(), GameAction::ActivateSafeMode);
        assert!(kinds_for(&latched, GameAction::ActivateSafeMode).is_empty());
    }

    #[test]
    fn reset_is_reported_even_from_initial_state() {
        assert_eq!(
            kinds_for(&GameState::initial(), GameAction::ResetGame),
            vec![StationEventKind::Reset]
        );
    }

    #[test]
    fn closures_are_observers() {
        let mut seen = Vec::new();
        {
            let mut observer = |event: &StationEvent| seen.push(event.id);
            observer.on_event(&StationEvent {
                id: EventId(3),
                severity: EventSeverity::Info,
                kind: StationEventKind::Reset,
            });
        }
        assert_eq!(seen, vec![EventId(3)]);
    }
}
