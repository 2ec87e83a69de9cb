mod logic;
mod scenarios;
mod util;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use logic::reports::ReportWriter;
use logic::{LogicTester, ScenarioResult};
use scenarios::{all_scenario_keys, get_scenario, list_scenarios};
use util::{parse_seeds, split_csv};

#[derive(Debug, Parser)]
#[command(name = "orbital-tester", version)]
#[command(about = "Automated mission playthroughs for the Orbital Command game engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&split_csv(&args.seeds))?;
    let (results, unknown) = run_scenarios(&args, &scenarios, &seeds);

    write_reports(&args, &results, start_time)?;

    if unknown > 0 || results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut out = ReportWriter::open(args.output.as_deref())?;
    writeln!(out, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(out, "  {key:20} - {description}")?;
    }
    out.finish()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🛰️  Orbital Command Automated Tester".bright_cyan().bold());
    println!("{}", "====================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in all_scenario_keys() {
            if !scenarios.contains(&key) {
                scenarios.push(key);
            }
        }
    }
    scenarios
}

/// Run every requested scenario; returns the results and the number of unknown names.
fn run_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
) -> (Vec<ScenarioResult>, usize) {
    println!("{}", "🧠 Running Mission Playthroughs".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    let mut unknown = 0;
    for name in scenarios {
        if let Some(scenario) = get_scenario(name) {
            results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", name.yellow());
            unknown += 1;
        }
    }
    (results, unknown)
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut report = ReportWriter::open(args.output.as_deref())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut report, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut report,
                    "# Orbital Command Mission Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut report, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut report, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut report,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut report)?;
            writeln!(
                &mut report,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    report.finish()?;
    Ok(())
}
