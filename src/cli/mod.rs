//! Capacity forecast CLI module
//!
//! Reporting harness around the forecasting core: loads a scenario, fits
//! calibration and prints distributions, daily moments, commit levels and
//! success probabilities.

mod scenario;

pub use scenario::{Checkpoint, CommitPlan, FittedScenario, Probe, Scenario, SuccessPlan};

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<14} {}", muted(key), val.white());
}

fn step_ok(msg: &str) {
    println!("  {} {}", ok("✓"), msg);
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "capacity-forecast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bias-calibrated team capacity forecasting")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fit estimator bias and the uncertainty factor
    Fit {
        /// Scenario file (JSON)
        #[arg(short, long)]
        scenario: PathBuf,
    },

    /// Fit, then report distributions, commit levels and success odds
    Report {
        /// Scenario file (JSON); the built-in quickstart when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Number of draws to show from the probe distribution
        #[arg(long, default_value = "5")]
        samples: usize,

        /// Seed for sampling
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn load(path: Option<&Path>) -> anyhow::Result<Scenario> {
    let scenario = match path {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading scenario");
            Scenario::from_path(path)?
        }
        None => Scenario::quickstart()?,
    };
    Ok(scenario)
}

fn print_fit(scenario: &Scenario, fitted: &FittedScenario) {
    section("Calibration");
    kv("Observations", &scenario.observations.len().to_string());
    kv("Coverage", &format!("{:.3}", scenario.target_coverage));
    kv("Shape", &format!("{:.2}", fitted.calibrator.shape()));
    for (estimator, alpha) in fitted.bias.iter() {
        kv(&format!("alpha {}", estimator), &format!("{:.6}", alpha));
    }
    kv("delta_b", &format!("{:.6}", fitted.delta_b));
}

// ─── Fit ───────────────────────────────────────────────────────────────────────

pub fn cmd_fit(scenario_path: &Path) -> anyhow::Result<()> {
    let scenario = load(Some(scenario_path))?;
    let fitted = scenario.fit()?;
    print_fit(&scenario, &fitted);
    println!();
    step_ok("calibration fitted");
    Ok(())
}

// ─── Report ────────────────────────────────────────────────────────────────────

pub fn cmd_report(
    scenario_path: Option<&Path>,
    samples: usize,
    seed: Option<u64>,
) -> anyhow::Result<()> {
    let scenario = load(scenario_path)?;
    let fitted = scenario.fit()?;
    print_fit(&scenario, &fitted);

    if let Some(probe) = &scenario.probe {
        let dist = fitted.calibrator.build_distribution(
            &probe.triad,
            &probe.estimator,
            &fitted.bias,
            fitted.delta_b,
        )?;
        let draws = dist.sample_seeded(samples, seed)?;

        section(&format!("Distribution ({})", probe.estimator));
        kv(
            "Triad",
            &format!(
                "({}, {}, {})",
                probe.triad.optimistic(),
                probe.triad.most_likely(),
                probe.triad.pessimistic()
            ),
        );
        kv("Mean", &format!("{:.6}", dist.mean()));
        kv("Variance", &format!("{:.6}", dist.variance()));
        let rendered: Vec<String> = draws.iter().map(|x| format!("{:.3}", x)).collect();
        kv("Samples", &rendered.join(", "));
    }

    let engine = fitted.engine()?;

    if !scenario.days.is_empty() {
        let moments = engine.daily_schedule_moments(&scenario.days)?;
        section("Daily capacity");
        println!("  {:<6} {:>12} {:>12} {:>12}", muted("Day"), muted("mean"), muted("var"), muted("sd"));
        for (i, (mean, var)) in moments.means.iter().zip(moments.variances.iter()).enumerate() {
            println!("  {:<6} {:>12.6} {:>12.6} {:>12.6}", i + 1, mean, var, var.sqrt());
        }
    }

    if !scenario.commit.horizons.is_empty() {
        section("Commit capacity");
        for &t in &scenario.commit.horizons {
            for &alpha in &scenario.commit.alphas {
                let commit = engine.commit_capacity(&scenario.days, t, alpha)?;
                println!("  t={:<3} alpha={:<6.3} {:>12.6}", t, alpha, commit);
            }
        }
    }

    if let Some(plan) = &scenario.success {
        section(&format!("Probability of success (W = {})", plan.workload));
        for checkpoint in &plan.checkpoints {
            let p = engine.probability_of_success(
                &scenario.days,
                checkpoint.t,
                plan.workload,
                checkpoint.achieved,
            )?;
            println!(
                "  t={:<3} achieved={:<8.1} {:>10.6}",
                checkpoint.t, checkpoint.achieved, p
            );
        }
    }

    println!();
    Ok(())
}
