use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::logic::playthrough::{PlaythroughSummary, run_playthrough};
use crate::scenarios::Scenario;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &Scenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (strategy: {} seed: {})",
                        scenario.key.bright_white(),
                        scenario.strategy.label(),
                        seed
                    );
                    println!("   {}", scenario.description.dimmed());
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &Scenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut performance_data = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let verdict = run_playthrough(scenario.strategy, iteration_seed)
                .map_err(|err| format!("{err:#}"))
                .and_then(|summary| {
                    evaluate_expectations(scenario, &summary).map_or(Ok(summary), Err)
                });

            match verdict {
                Ok(summary) => {
                    successes += 1;
                    let duration = start_time.elapsed();
                    performance_data.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({duration:?}) verdict:{} rate:{}% decisions:{}",
                            i + 1,
                            iterations,
                            summary.outcome.verdict,
                            summary.outcome.success_rate,
                            summarize_decisions(&summary)
                        );
                    }
                }
                Err(err) => {
                    log::warn!("{} seed {iteration_seed} failed: {err}", scenario.key);
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.clone().red()
                        );
                    }
                    failures.push(format!(
                        "Iteration {} (strategy {}, seed {iteration_seed}): {err}",
                        i + 1,
                        scenario.strategy.label(),
                    ));
                }
            }
        }

        let average_duration = if performance_data.is_empty() {
            Duration::ZERO
        } else {
            performance_data.iter().sum::<Duration>()
                / u32::try_from(performance_data.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.key.to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            performance_data,
        }
    }
}

fn evaluate_expectations(scenario: &Scenario, summary: &PlaythroughSummary) -> Option<String> {
    scenario
        .expectations
        .iter()
        .find_map(|expectation| expectation(summary).err())
        .map(|err| format!("{err:#}"))
}

fn summarize_decisions(summary: &PlaythroughSummary) -> String {
    if summary.decisions.is_empty() {
        return "none".to_string();
    }
    summary
        .decisions
        .iter()
        .map(|d| {
            let mark = if d.correct { "✓" } else { "✗" };
            format!("#{}:{}{mark}", d.incident_id, d.choice_index)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(u64::MAX)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        durations
            .iter()
            .map(Duration::as_micros)
            .collect::<Vec<_>>()
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = Vec::<u128>::deserialize(deserializer)?;
        Ok(micros
            .into_iter()
            .map(|m| Duration::from_micros(u64::try_from(m).unwrap_or(u64::MAX)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{Expectation, get_scenario};

    fn forced_failure(_: &PlaythroughSummary) -> anyhow::Result<()> {
        anyhow::bail!("forced failure")
    }

    #[test]
    fn smoke_scenario_passes_for_every_seed() {
        let tester = LogicTester::new(false);
        let scenario = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(&scenario, &[1, 1337], 3);
        assert_eq!(results.len(), 2);
        for result in results {
            assert!(result.passed, "{:?}", result.failures);
            assert_eq!(result.successful_iterations, 3);
            assert_eq!(result.performance_data.len(), 3);
        }
    }

    #[test]
    fn failing_expectation_is_reported_per_iteration() {
        let tester = LogicTester::new(false);
        let mut scenario = get_scenario("smoke").unwrap();
        scenario.expectations = vec![forced_failure as Expectation];
        let result = tester.run_single_scenario(&scenario, 9, 2);
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 0);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("forced failure"));
        assert!(result.failures[1].contains("seed 10"));
    }

    #[test]
    fn result_serializes_durations_as_integers() {
        let result = ScenarioResult {
            scenario_name: "smoke".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_micros(250),
            performance_data: vec![Duration::from_micros(250)],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 250);
        assert_eq!(json["performance_data"][0], 250);
        let back: ScenarioResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.average_duration, result.average_duration);
    }
}
