use anyhow::{Context, Result, bail};
use orbital_game::constants::OXYGEN_RED_THRESHOLD;
use orbital_game::{
    Advance, CrewStatus, GamePage, GameState, Incident, Metric, MissionSession, OutcomeSummary,
    StationEvent, StationEventKind, Subsystem,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;
use std::rc::Rc;

/// How the simulated player answers incidents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayStrategy {
    /// Always pick a correct option
    AllCorrect,
    /// Always pick an incorrect option
    AllWrong,
    /// Correct on even incidents, wrong on odd ones
    Alternating,
    /// Answer wrong, then engage safe mode on the given incident
    SafeModeAt { incident: usize },
    /// Random answers with a per-incident chance of bailing out to safe mode
    Random { safe_mode_chance: f64 },
}

impl PlayStrategy {
    #[must_use]
    pub fn label(self) -> String {
        match self {
            Self::AllCorrect => "all-correct".to_string(),
            Self::AllWrong => "all-wrong".to_string(),
            Self::Alternating => "alternating".to_string(),
            Self::SafeModeAt { incident } => format!("safe-mode@{incident}"),
            Self::Random { safe_mode_chance } => format!("random(p={safe_mode_chance:.2})"),
        }
    }

    fn pick(self, incident: &Incident, position: usize, rng: &mut ChaCha20Rng) -> Option<usize> {
        let correct: Vec<usize> = incident.correct_indices().collect();
        let wrong: Vec<usize> = incident.incorrect_indices().collect();
        match self {
            Self::AllCorrect => correct.choose(rng).copied(),
            Self::AllWrong | Self::SafeModeAt { .. } => wrong.choose(rng).copied(),
            Self::Alternating => {
                let pool = if position % 2 == 0 { &correct } else { &wrong };
                pool.choose(rng).copied()
            }
            Self::Random { .. } => Some(rng.gen_range(0..incident.choices.len())),
        }
    }

    fn bails_out(self, position: usize, rng: &mut ChaCha20Rng) -> bool {
        match self {
            Self::SafeModeAt { incident } => position == incident,
            Self::Random { safe_mode_chance } => rng.gen_bool(safe_mode_chance.clamp(0.0, 1.0)),
            Self::AllCorrect | Self::AllWrong | Self::Alternating => false,
        }
    }

    const fn fiddles_with_panels(self) -> bool {
        matches!(self, Self::Random { .. })
    }
}

#[derive(Debug, Clone)]
pub struct DecisionRecord {
    pub incident_id: u32,
    pub choice_index: usize,
    pub correct: bool,
}

/// Everything observed during one simulated playthrough.
#[derive(Debug, Clone)]
pub struct PlaythroughSummary {
    pub seed: u64,
    pub strategy: String,
    pub decisions: Vec<DecisionRecord>,
    pub page_path: Vec<GamePage>,
    pub events_observed: usize,
    pub outcome: OutcomeSummary,
    pub final_state: GameState,
}

/// Play one mission end to end, checking state invariants after every step.
///
/// # Errors
///
/// Returns an error if the session rejects a move the driver believed legal,
/// or if any invariant is broken along the way.
pub fn run_playthrough(strategy: PlayStrategy, seed: u64) -> Result<PlaythroughSummary> {
    let mut rng = ChaCha20Rng::seed_from_u64(seed);
    let events: Rc<RefCell<Vec<StationEvent>>> = Rc::default();
    let sink = Rc::clone(&events);

    let mut session = MissionSession::new();
    session.subscribe(move |event: &StationEvent| sink.borrow_mut().push(event.clone()));
    let mut guard = InvariantGuard::new(session.state());

    session.enter_control_room().context("entering control room")?;
    guard.check(&session)?;

    activate_all_systems(&mut session, &mut guard, strategy, &mut rng)?;
    session.begin_incidents().context("starting incidents")?;
    guard.check(&session)?;

    let mut decisions = Vec::new();
    loop {
        let position = session.current_incident_index();
        let Some(incident) = session.current_incident().cloned() else {
            bail!("incident index {position} fell off the catalog");
        };
        let Some(choice) = strategy.pick(&incident, position, &mut rng) else {
            bail!("incident {} offers no option for {}", incident.id, strategy.label());
        };
        let outcome = session
            .select_choice(choice)
            .with_context(|| format!("answering incident {}", incident.id))?;
        guard.check(&session)?;
        decisions.push(DecisionRecord {
            incident_id: outcome.incident_id,
            choice_index: outcome.choice_index,
            correct: outcome.correct,
        });

        if strategy.bails_out(position, &mut rng) {
            session.activate_safe_mode().context("engaging safe mode")?;
            guard.check(&session)?;
            break;
        }
        let step = session.advance().context("advancing incident")?;
        guard.check(&session)?;
        if step == Advance::MissionComplete {
            break;
        }
    }

    let outcome = session.outcome().context("scoring outcome")?;
    let page_path = page_path(&events.borrow())?;
    let events_observed = events.borrow().len();
    log::debug!(
        "seed {seed} {} -> {} ({}%)",
        strategy.label(),
        outcome.verdict,
        outcome.success_rate
    );

    Ok(PlaythroughSummary {
        seed,
        strategy: strategy.label(),
        decisions,
        page_path,
        events_observed,
        outcome,
        final_state: session.state().clone(),
    })
}

fn activate_all_systems(
    session: &mut MissionSession,
    guard: &mut InvariantGuard,
    strategy: PlayStrategy,
    rng: &mut ChaCha20Rng,
) -> Result<()> {
    let mut order = Subsystem::ALL;
    order.shuffle(rng);
    for system in order {
        session
            .toggle_system(system)
            .with_context(|| format!("activating {system}"))?;
        guard.check(session)?;
        if strategy.fiddles_with_panels() && rng.gen_bool(0.3) {
            // Switch it off and on again before moving on.
            session.toggle_system(system)?;
            session.toggle_system(system)?;
            guard.check(session)?;
        }
    }
    if !session.activation().all_active() {
        bail!(
            "only {}/5 systems active after activation pass",
            session.activation().active_count()
        );
    }
    Ok(())
}

fn page_path(events: &[StationEvent]) -> Result<Vec<GamePage>> {
    let mut path = vec![GamePage::Intro];
    for event in events {
        if let StationEventKind::PageChanged { from, to } = event.kind {
            if !from.allows_transition_to(to) {
                bail!("illegal page transition {from} -> {to}");
            }
            path.push(to);
        }
    }
    Ok(path)
}

/// Tracks the previous snapshot and asserts the monotone properties.
struct InvariantGuard {
    previous: GameState,
}

impl InvariantGuard {
    fn new(state: &GameState) -> Self {
        Self {
            previous: state.clone(),
        }
    }

    fn check(&mut self, session: &MissionSession) -> Result<()> {
        let prev = &self.previous.progress;
        let state = session.state();
        let now = &state.progress;
        if now.correct_decisions > now.total_decisions {
            bail!(
                "correct decisions {} exceed total {}",
                now.correct_decisions,
                now.total_decisions
            );
        }
        if now.total_decisions < prev.total_decisions
            || now.incidents_completed < prev.incidents_completed
            || now.current_incident_index < prev.current_incident_index
        {
            bail!("progress counters went backwards: {prev:?} -> {now:?}");
        }
        let oxygen = state.metrics.get(Metric::OxygenLevel);
        if oxygen < OXYGEN_RED_THRESHOLD && state.crew_status != CrewStatus::Red {
            bail!("oxygen at {oxygen} but crew status {}", state.crew_status);
        }
        if self.previous.safe_mode_activated && !state.safe_mode_activated {
            bail!("safe mode latch released without a reset");
        }
        let answered = session.selections().iter().flatten().count();
        if usize::try_from(now.total_decisions).ok() != Some(answered) {
            bail!(
                "{} decisions recorded but {answered} incidents answered",
                now.total_decisions
            );
        }
        self.previous = state.clone();
        Ok(())
    }
}
