//! End of mission outcome scoring
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{
    CREW_SAFETY_FLOOR, CREW_SAFETY_MAX, CREW_SAFETY_PASS, HEADLINE_REVIEW, HEADLINE_SAFE_MODE,
    HEADLINE_SUCCESS, KEY_MESSAGE_SAFE_MODE, LESSONS_LEARNED, STABILITY_EXCELLENT,
    STABILITY_MODERATE, SUBTITLE_REVIEW, SUBTITLE_SAFE_MODE, SUBTITLE_SUCCESS,
    SUCCESS_RATE_EXCELLENT, SUCCESS_RATE_PASS,
};
use crate::state::GameState;

/// How the mission ended, in display priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The player pulled the station into safe mode
    SafeMode,
    /// At least half the decisions were correct
    Success,
    /// Too many suboptimal responses
    NeedsReview,
}

impl Verdict {
    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::SafeMode => HEADLINE_SAFE_MODE,
            Self::Success => HEADLINE_SUCCESS,
            Self::NeedsReview => HEADLINE_REVIEW,
        }
    }

    #[must_use]
    pub const fn subtitle(self) -> &'static str {
        match self {
            Self::SafeMode => SUBTITLE_SAFE_MODE,
            Self::Success => SUBTITLE_SUCCESS,
            Self::NeedsReview => SUBTITLE_REVIEW,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SafeMode => write!(f, "safe_mode"),
            Self::Success => write!(f, "success"),
            Self::NeedsReview => write!(f, "needs_review"),
        }
    }
}

/// Colour band for the decision accuracy readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccuracyBand {
    Nominal,
    Warning,
    Critical,
}

impl AccuracyBand {
    #[must_use]
    pub const fn for_rate(success_rate: u32) -> Self {
        if success_rate >= SUCCESS_RATE_EXCELLENT {
            Self::Nominal
        } else if success_rate >= SUCCESS_RATE_PASS {
            Self::Warning
        } else {
            Self::Critical
        }
    }
}

/// Read-only summary consumed by the outcome screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeSummary {
    pub success_rate: u32,
    pub is_success: bool,
    pub crew_safety_percent: u32,
    pub correct_decisions: u32,
    pub total_decisions: u32,
    pub safe_mode_activated: bool,
    pub verdict: Verdict,
    pub headline: String,
    pub subtitle: String,
    pub accuracy_band: AccuracyBand,
    pub system_stability: String,
    pub key_message: Option<String>,
    pub lessons: Vec<String>,
}

/// Percentage of correct decisions, rounded half up. Zero when nothing was answered.
#[must_use]
pub const fn success_rate(correct: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let correct = correct as u64;
    let total = total as u64;
    ((200 * correct + total) / (2 * total)) as u32
}

/// Crew safety readout.
///
/// Safe mode always reports the maximum, even when every decision was wrong.
#[must_use]
pub const fn crew_safety_percent(safe_mode_activated: bool, success_rate: u32) -> u32 {
    if safe_mode_activated || success_rate >= SUCCESS_RATE_EXCELLENT {
        CREW_SAFETY_MAX
    } else if success_rate >= SUCCESS_RATE_PASS {
        CREW_SAFETY_PASS
    } else {
        CREW_SAFETY_FLOOR
    }
}

/// Score a finished (or abandoned) mission. Pure and repeatable.
#[must_use]
pub fn score_outcome(state: &GameState) -> OutcomeSummary {
    let correct = state.progress.correct_decisions;
    let total = state.progress.total_decisions;
    let safe_mode = state.safe_mode_activated;
    let rate = success_rate(correct, total);
    let is_success = !safe_mode && rate >= SUCCESS_RATE_PASS;

    let verdict = if safe_mode {
        Verdict::SafeMode
    } else if is_success {
        Verdict::Success
    } else {
        Verdict::NeedsReview
    };

    OutcomeSummary {
        success_rate: rate,
        is_success,
        crew_safety_percent: crew_safety_percent(safe_mode, rate),
        correct_decisions: correct,
        total_decisions: total,
        safe_mode_activated: safe_mode,
        verdict,
        headline: verdict.headline().to_string(),
        subtitle: verdict.subtitle().to_string(),
        accuracy_band: AccuracyBand::for_rate(rate),
        system_stability: if is_success {
            STABILITY_EXCELLENT
        } else {
            STABILITY_MODERATE
        }
        .to_string(),
        key_message: safe_mode.then(|| KEY_MESSAGE_SAFE_MODE.to_string()),
        lessons: LESSONS_LEARNED.iter().map(|s| (*s).to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(correct: u32, total: u32, safe_mode: bool) -> GameState {
        let mut state = GameState::initial();
        state.progress.correct_decisions = correct;
        state.progress.total_decisions = total;
        state.safe_mode_activated = safe_mode;
        state
    }

    #[test]
    fn perfect_run_scores_full_marks() {
        let summary = score_outcome(&finished(4, 4, false));
        assert_eq!(summary.success_rate, 100);
        assert!(summary.is_success);
        assert_eq!(summary.crew_safety_percent, 100);
        assert_eq!(summary.verdict, Verdict::Success);
        assert_eq!(summary.headline, "SPACE STATION OPERATED SAFELY");
        assert_eq!(summary.system_stability, "Excellent");
        assert_eq!(summary.accuracy_band, AccuracyBand::Nominal);
        assert!(summary.key_message.is_none());
    }

    #[test]
    fn safe_mode_forces_failure_but_reports_full_crew_safety() {
        let summary = score_outcome(&finished(0, 1, true));
        assert_eq!(summary.success_rate, 0);
        assert!(!summary.is_success);
        assert_eq!(summary.crew_safety_percent, 100);
        assert_eq!(summary.verdict, Verdict::SafeMode);
        assert_eq!(summary.system_stability, "Moderate");
        assert_eq!(
            summary.key_message.as_deref(),
            Some("Protecting lives is always mission success.")
        );
    }

    #[test]
    fn half_correct_passes_with_reduced_crew_safety() {
        let summary = score_outcome(&finished(2, 4, false));
        assert_eq!(summary.success_rate, 50);
        assert!(summary.is_success);
        assert_eq!(summary.crew_safety_percent, 85);
        assert_eq!(summary.accuracy_band, AccuracyBand::Warning);
    }

    #[test]
    fn mostly_wrong_needs_review() {
        let summary = score_outcome(&finished(1, 4, false));
        assert_eq!(summary.success_rate, 25);
        assert!(!summary.is_success);
        assert_eq!(summary.crew_safety_percent, 70);
        assert_eq!(summary.verdict, Verdict::NeedsReview);
        assert_eq!(summary.headline, "MISSION REQUIRES REVIEW");
        assert_eq!(summary.accuracy_band, AccuracyBand::Critical);
    }

    #[test]
    fn no_decisions_scores_zero() {
        let summary = score_outcome(&GameState::initial());
        assert_eq!(summary.success_rate, 0);
        assert!(!summary.is_success);
        assert_eq!(summary.crew_safety_percent, 70);
    }

    #[test]
    fn success_rate_rounds_half_up() {
        assert_eq!(success_rate(1, 3), 33);
        assert_eq!(success_rate(2, 3), 67);
        assert_eq!(success_rate(1, 8), 13);
        assert_eq!(success_rate(3, 4), 75);
        assert_eq!(success_rate(0, 0), 0);
    }

    #[test]
    fn scoring_is_idempotent() {
        let state = finished(3, 4, false);
        let first = score_outcome(&state);
        let second = score_outcome(&state);
        assert_eq!(first, second);
        assert_eq!(first.lessons.len(), 4);
    }
}
