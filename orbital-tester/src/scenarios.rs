use anyhow::{Result, bail, ensure};
use orbital_game::Verdict;

use crate::logic::{PlayStrategy, PlaythroughSummary};

/// Check applied to every playthrough a scenario produces.
pub type Expectation = fn(&PlaythroughSummary) -> Result<()>;

#[derive(Debug, Clone)]
pub struct Scenario {
    pub key: &'static str,
    pub description: &'static str,
    pub strategy: PlayStrategy,
    pub expectations: Vec<Expectation>,
}

impl Scenario {
    fn new(key: &'static str, description: &'static str, strategy: PlayStrategy) -> Self {
        Self {
            key,
            description,
            strategy,
            expectations: Vec::new(),
        }
    }

    fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }
}

const SCENARIO_KEYS: [(&str, &str); 6] = [
    (
        "smoke",
        "Activate every system and answer all incidents correctly",
    ),
    (
        "all-wrong",
        "Answer every incident wrong and never engage safe mode",
    ),
    (
        "mixed",
        "Alternate correct and wrong answers across the mission",
    ),
    (
        "early-safe-mode",
        "Answer the first incident wrong and bail out to safe mode",
    ),
    (
        "late-safe-mode",
        "Answer wrong through the last incident, then engage safe mode",
    ),
    (
        "random-walk",
        "Random answers with occasional safe mode; invariants only",
    ),
];

#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIO_KEYS.to_vec()
}

#[must_use]
pub fn all_scenario_keys() -> Vec<String> {
    SCENARIO_KEYS
        .iter()
        .map(|(key, _)| (*key).to_string())
        .collect()
}

#[must_use]
pub fn get_scenario(key: &str) -> Option<Scenario> {
    let description = SCENARIO_KEYS
        .iter()
        .find(|(candidate, _)| *candidate == key)
        .map(|(_, description)| *description)?;
    let scenario = match key {
        "smoke" => Scenario::new("smoke", description, PlayStrategy::AllCorrect)
            .with_expectation(expect_every_page_visited)
            .with_expectation(|summary| {
                expect_score(summary, Verdict::Success, 100, 100)?;
                ensure!(
                    summary.outcome.key_message.is_none(),
                    "perfect run should not carry a key message"
                );
                Ok(())
            }),
        "all-wrong" => Scenario::new("all-wrong", description, PlayStrategy::AllWrong)
            .with_expectation(expect_every_page_visited)
            .with_expectation(|summary| expect_score(summary, Verdict::NeedsReview, 0, 70)),
        "mixed" => Scenario::new("mixed", description, PlayStrategy::Alternating)
            .with_expectation(expect_every_page_visited)
            .with_expectation(|summary| expect_score(summary, Verdict::Success, 50, 85)),
        "early-safe-mode" => Scenario::new(
            "early-safe-mode",
            description,
            PlayStrategy::SafeModeAt { incident: 0 },
        )
        .with_expectation(|summary| {
            expect_score(summary, Verdict::SafeMode, 0, 100)?;
            ensure!(
                summary.decisions.len() == 1,
                "expected one decision before safe mode, got {}",
                summary.decisions.len()
            );
            Ok(())
        }),
        "late-safe-mode" => Scenario::new(
            "late-safe-mode",
            description,
            PlayStrategy::SafeModeAt { incident: 3 },
        )
        .with_expectation(|summary| expect_score(summary, Verdict::SafeMode, 0, 100)),
        "random-walk" => Scenario::new(
            "random-walk",
            description,
            PlayStrategy::Random {
                safe_mode_chance: 0.2,
            },
        )
        .with_expectation(expect_consistent_outcome),
        _ => return None,
    };
    Some(scenario)
}

fn expect_every_page_visited(summary: &PlaythroughSummary) -> Result<()> {
    ensure!(
        summary.page_path.len() == 4,
        "expected intro -> level1 -> level2 -> outcome, saw {:?}",
        summary.page_path
    );
    ensure!(
        summary.decisions.len() == 4,
        "expected 4 decisions, got {}",
        summary.decisions.len()
    );
    ensure!(
        summary.events_observed > 0,
        "no station events reached the observer"
    );
    Ok(())
}

fn expect_score(
    summary: &PlaythroughSummary,
    verdict: Verdict,
    success_rate: u32,
    crew_safety: u32,
) -> Result<()> {
    let outcome = &summary.outcome;
    if outcome.verdict != verdict {
        bail!("verdict {} (expected {verdict})", outcome.verdict);
    }
    if outcome.success_rate != success_rate {
        bail!(
            "success rate {}% (expected {success_rate}%)",
            outcome.success_rate
        );
    }
    if outcome.crew_safety_percent != crew_safety {
        bail!(
            "crew safety {}% (expected {crew_safety}%)",
            outcome.crew_safety_percent
        );
    }
    Ok(())
}

fn expect_consistent_outcome(summary: &PlaythroughSummary) -> Result<()> {
    let outcome = &summary.outcome;
    let correct = summary.decisions.iter().filter(|d| d.correct).count();
    ensure!(
        usize::try_from(outcome.correct_decisions).ok() == Some(correct),
        "scored {} correct decisions, driver recorded {correct}",
        outcome.correct_decisions
    );
    ensure!(
        usize::try_from(outcome.total_decisions).ok() == Some(summary.decisions.len()),
        "scored {} decisions, driver recorded {}",
        outcome.total_decisions,
        summary.decisions.len()
    );
    ensure!(outcome.success_rate <= 100, "success rate above 100%");
    ensure!(
        summary.final_state.safe_mode_activated == outcome.safe_mode_activated,
        "outcome disagrees with the final state about safe mode"
    );
    if outcome.safe_mode_activated {
        ensure!(
            outcome.verdict == Verdict::SafeMode && outcome.crew_safety_percent == 100,
            "safe mode run scored {} with crew safety {}%",
            outcome.verdict,
            outcome.crew_safety_percent
        );
    } else {
        ensure!(
            summary.decisions.len() == 4,
            "run ended without safe mode after {} decisions",
            summary.decisions.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, _) in list_scenarios() {
            let scenario = get_scenario(key).unwrap();
            assert_eq!(scenario.key, key);
            assert!(!scenario.expectations.is_empty());
        }
    }

    #[test]
    fn unknown_scenario_is_none() {
        assert!(get_scenario("warp-drive").is_none());
    }
}
