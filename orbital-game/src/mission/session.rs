use std::fmt;
use thiserror::Error;

use crate::action::{GameAction, reduce};
use crate::constants::{
    AI_MESSAGE_ALL_SYSTEMS, AI_MESSAGE_BEGIN_INCIDENTS, AI_MESSAGE_CORRECT,
    AI_MESSAGE_NEXT_INCIDENT, AI_MESSAGE_WRONG, ai_message_partial_activation,
};
use crate::incidents::{Incident, IncidentCatalog, catalog};
use crate::mission::activation::ActivationPanel;
use crate::mission::event::{EventId, Reaction, StationEvent, StationObserver, derive_events};
use crate::result::{OutcomeSummary, score_outcome};
use crate::state::{GamePage, GameState, Subsystem};

/// Misuse of the orchestration layer. State is left untouched when returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("action requires the {expected} page (currently on {actual})")]
    WrongPage { expected: GamePage, actual: GamePage },
    #[error("only {active}/5 systems are active")]
    SystemsOffline { active: usize },
    #[error("incident {incident} has already been answered")]
    AlreadyAnswered { incident: usize },
    #[error("incident {incident} has not been answered yet")]
    Unanswered { incident: usize },
    #[error("choice {index} is out of range ({available} choices)")]
    ChoiceOutOfRange { index: usize, available: usize },
    #[error("incident index {index} is outside the catalog ({len} incidents)")]
    IncidentOutOfRange { index: usize, len: usize },
    #[error("no incidents are loaded")]
    EmptyCatalog,
}

/// What happened when the player answered an incident.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub incident_id: u32,
    pub choice_index: usize,
    pub correct: bool,
    pub reaction: Reaction,
    pub consequence: String,
    pub lesson: String,
}

/// Result of pressing "next" after answering an incident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved on to the incident at this index
    NextIncident(usize),
    /// The last incident was answered; the outcome page is showing
    MissionComplete,
}

/// One playthrough: the single owner and writer of [`GameState`].
///
/// Drives the level-1 activation panel and the level-2 selection record on
/// top of the reducer. All mutation takes `&mut self`, so dispatches are
/// serialized by construction.
pub struct MissionSession {
    state: GameState,
    catalog: IncidentCatalog,
    selections: Vec<Option<usize>>,
    activation: ActivationPanel,
    observers: Vec<Box<dyn StationObserver>>,
    next_event_id: u64,
}

impl fmt::Debug for MissionSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MissionSession")
            .field("state", &self.state)
            .field("selections", &self.selections)
            .field("activation", &self.activation)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for MissionSession {
    fn default() -> Self {
        Self::new()
    }
}

impl MissionSession {
    /// Fresh playthrough over the bundled incident catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(catalog().clone())
    }

    #[must_use]
    pub fn with_catalog(catalog: IncidentCatalog) -> Self {
        let selections = vec![None; catalog.len()];
        Self {
            state: GameState::initial(),
            catalog,
            selections,
            activation: ActivationPanel::default(),
            observers: Vec::new(),
            next_event_id: 0,
        }
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn catalog(&self) -> &IncidentCatalog {
        &self.catalog
    }

    /// Per-incident answers; `None` means unanswered.
    #[must_use]
    pub fn selections(&self) -> &[Option<usize>] {
        &self.selections
    }

    #[must_use]
    pub const fn activation(&self) -> &ActivationPanel {
        &self.activation
    }

    pub fn subscribe(&mut self, observer: impl StationObserver + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Apply a raw action to the state and notify observers.
    ///
    /// This is the only path that replaces the state. It performs none of the
    /// gating the higher-level operations do, but a reset always clears the
    /// selection record and the activation panel along with the state.
    pub fn dispatch(&mut self, action: GameAction) -> &GameState {
        log::debug!("dispatch {action}");
        if matches!(action, GameAction::ResetGame) {
            self.selections = vec![None; self.catalog.len()];
            self.activation.clear();
        }
        let next = reduce(&self.state, action.clone());
        let kinds = derive_events(&self.state, &action, &next);
        if next.current_page != self.state.current_page {
            log::info!(
                "page {} -> {}",
                self.state.current_page,
                next.current_page
            );
        }
        self.state = next;
        for kind in kinds {
            let event = StationEvent {
                id: EventId(self.next_event_id),
                severity: kind.severity(),
                kind,
            };
            self.next_event_id += 1;
            for observer in &mut self.observers {
                observer.on_event(&event);
            }
        }
        &self.state
    }

    fn require_page(&self, expected: GamePage) -> Result<(), SessionError> {
        let actual = self.state.current_page;
        if actual == expected {
            Ok(())
        } else {
            Err(reject(SessionError::WrongPage { expected, actual }))
        }
    }

    /// Leave the briefing and enter the control room.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPage`] unless on the intro page.
    pub fn enter_control_room(&mut self) -> Result<(), SessionError> {
        self.require_page(GamePage::Intro)?;
        self.activation.clear();
        self.dispatch(GameAction::SetPage {
            page: GamePage::Level1,
        });
        Ok(())
    }

    /// Flip one control panel toggle and update the Mission AI line.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPage`] unless on the level-1 page.
    pub fn toggle_system(&mut self, system: Subsystem) -> Result<usize, SessionError> {
        self.require_page(GamePage::Level1)?;
        let status = self.activation.toggle(system);
        self.dispatch(GameAction::SetSystemStatus { system, status });

        let active = self.activation.active_count();
        if self.activation.all_active() {
            self.dispatch(GameAction::set_ai_message(AI_MESSAGE_ALL_SYSTEMS));
        } else if active > 0 {
            self.dispatch(GameAction::set_ai_message(ai_message_partial_activation(
                active,
                Subsystem::ALL.len(),
            )));
        }
        Ok(active)
    }

    /// Start the incident response phase once every system is online.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPage`] unless on level 1,
    /// [`SessionError::EmptyCatalog`] when there is nothing to answer, or
    /// [`SessionError::SystemsOffline`] while any toggle is off.
    pub fn begin_incidents(&mut self) -> Result<(), SessionError> {
        self.require_page(GamePage::Level1)?;
        if self.catalog.is_empty() {
            return Err(reject(SessionError::EmptyCatalog));
        }
        if !self.activation.all_active() {
            return Err(reject(SessionError::SystemsOffline {
                active: self.activation.active_count(),
            }));
        }
        self.dispatch(GameAction::set_ai_message(AI_MESSAGE_BEGIN_INCIDENTS));
        self.dispatch(GameAction::SetPage {
            page: GamePage::Level2,
        });
        Ok(())
    }

    #[must_use]
    pub const fn current_incident_index(&self) -> usize {
        self.state.progress.current_incident_index
    }

    #[must_use]
    pub fn current_incident(&self) -> Option<&Incident> {
        self.catalog.get(self.current_incident_index())
    }

    #[must_use]
    pub fn is_last_incident(&self) -> bool {
        self.catalog.is_last(self.current_incident_index())
    }

    #[must_use]
    pub fn has_selected_choice(&self) -> bool {
        self.selections
            .get(self.current_incident_index())
            .is_some_and(Option::is_some)
    }

    /// Share of the catalog that has been passed or answered, in `0.0..=1.0`.
    #[must_use]
    pub fn progress_fraction(&self) -> f64 {
        if self.catalog.is_empty() {
            return 0.0;
        }
        let done = self.current_incident_index() + usize::from(self.has_selected_choice());
        #[allow(clippy::cast_precision_loss)]
        let fraction = done as f64 / self.catalog.len() as f64;
        fraction.min(1.0)
    }

    /// Answer the current incident. Answers are final.
    ///
    /// # Errors
    ///
    /// Returns an error when not on level 2, when the incident was already
    /// answered, or when `index` does not name one of its choices.
    pub fn select_choice(&mut self, index: usize) -> Result<DecisionOutcome, SessionError> {
        self.require_page(GamePage::Level2)?;
        let incident_index = self.current_incident_index();
        let incident = self
            .catalog
            .get(incident_index)
            .ok_or_else(|| {
                reject(SessionError::IncidentOutOfRange {
                    index: incident_index,
                    len: self.catalog.len(),
                })
            })?
            .clone();
        if self.selections[incident_index].is_some() {
            return Err(reject(SessionError::AlreadyAnswered {
                incident: incident_index,
            }));
        }
        let choice = incident.choice(index).ok_or_else(|| {
            reject(SessionError::ChoiceOutOfRange {
                index,
                available: incident.choices.len(),
            })
        })?;

        self.selections[incident_index] = Some(index);
        let correct = choice.is_correct;
        self.dispatch(GameAction::MakeDecision { correct });
        self.dispatch(GameAction::set_ai_message(if correct {
            AI_MESSAGE_CORRECT
        } else {
            AI_MESSAGE_WRONG
        }));

        Ok(DecisionOutcome {
            incident_id: incident.id,
            choice_index: index,
            correct,
            reaction: Reaction::from_correct(correct),
            consequence: choice.consequence_text.clone(),
            lesson: incident.lesson_text.clone(),
        })
    }

    fn require_answered(&self) -> Result<(), SessionError> {
        if self.has_selected_choice() {
            Ok(())
        } else {
            Err(reject(SessionError::Unanswered {
                incident: self.current_incident_index(),
            }))
        }
    }

    /// Move past an answered incident, finishing the mission after the last one.
    ///
    /// # Errors
    ///
    /// Returns an error when not on level 2 or the current incident is unanswered.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        self.require_page(GamePage::Level2)?;
        self.require_answered()?;
        if self.is_last_incident() {
            self.dispatch(GameAction::SetPage {
                page: GamePage::Outcome,
            });
            return Ok(Advance::MissionComplete);
        }
        self.dispatch(GameAction::NextIncident);
        self.dispatch(GameAction::set_ai_message(AI_MESSAGE_NEXT_INCIDENT));
        Ok(Advance::NextIncident(self.current_incident_index()))
    }

    /// Abort the incident sequence and put the station into safe mode.
    ///
    /// # Errors
    ///
    /// Returns an error when not on level 2 or the current incident is unanswered.
    pub fn activate_safe_mode(&mut self) -> Result<(), SessionError> {
        self.require_page(GamePage::Level2)?;
        self.require_answered()?;
        log::info!(
            "safe mode engaged at incident {}",
            self.current_incident_index()
        );
        self.dispatch(GameAction::ActivateSafeMode);
        self.dispatch(GameAction::SetPage {
            page: GamePage::Outcome,
        });
        Ok(())
    }

    /// Score the finished mission.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPage`] unless on the outcome page.
    pub fn outcome(&self) -> Result<OutcomeSummary, SessionError> {
        self.require_page(GamePage::Outcome)?;
        Ok(score_outcome(&self.state))
    }

    /// Retry the mission from the briefing.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WrongPage`] unless on the outcome page.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.require_page(GamePage::Outcome)?;
        self.dispatch(GameAction::ResetGame);
        Ok(())
    }
}

fn reject(err: SessionError) -> SessionError {
    log::warn!("rejected: {err}");
    err
}
