use std::io::Write;
use std::path::Path;

use rayon::prelude::*;
use tracing::info;

use glider_shared::*;
use glider_sim::analyzer::{self, FlightMetrics};
use glider_sim::autopilots::resolve_policy;
use glider_sim::{run_flight, SimError};

/// A single episode to be flown in parallel.
struct FlightJob {
    policy_name: String,
    seed: u64,
}

struct FlightSummary {
    result: FlightResult,
    metrics: FlightMetrics,
}

/// Aggregated outcomes for one policy across all seeds.
struct PolicyReport {
    name: String,
    flights: u32,
    survived: u32,
    crashed: u32,
    unfinished: u32,
    mean_reward: f32,
    mean_ticks: f32,
    mean_fallback: f32,
    /// Mean closest obstacle gap, glide variants only.
    mean_closest_gap: Option<f32>,
    /// Mean |angle| at ground contact, landing only.
    mean_touchdown_angle: Option<f32>,
}

fn run_job(sim: &SimConfig, job: &FlightJob) -> Result<FlightSummary, SimError> {
    let mut policy = resolve_policy(&job.policy_name, sim)?;
    let config = RunConfig {
        seed: job.seed,
        policy_name: job.policy_name.clone(),
        sim: sim.clone(),
        ..Default::default()
    };
    let record = run_flight(&config, policy.as_mut())?;
    let metrics = analyzer::analyze(&record);
    Ok(FlightSummary {
        result: record.result,
        metrics,
    })
}

fn mean_of(values: impl Iterator<Item = f32>) -> Option<f32> {
    let (sum, n) = values.fold((0.0f32, 0u32), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f32)
}

fn summarize(name: &str, flights: &[FlightSummary]) -> PolicyReport {
    let count = |outcome: Outcome| flights.iter().filter(|f| f.result.outcome == outcome).count() as u32;

    PolicyReport {
        name: name.to_string(),
        flights: flights.len() as u32,
        survived: count(Outcome::Survived),
        crashed: count(Outcome::Crashed),
        unfinished: count(Outcome::Ongoing),
        mean_reward: mean_of(flights.iter().map(|f| f.result.total_reward)).unwrap_or(0.0),
        mean_ticks: mean_of(flights.iter().map(|f| f.result.final_tick as f32)).unwrap_or(0.0),
        mean_fallback: mean_of(flights.iter().map(|f| f.metrics.fallback_fraction)).unwrap_or(0.0),
        mean_closest_gap: mean_of(flights.iter().filter_map(|f| f.metrics.closest_obstacle_gap)),
        mean_touchdown_angle: mean_of(
            flights
                .iter()
                .filter_map(|f| f.metrics.touchdown.map(|t| t.angle.abs())),
        ),
    }
}

fn fmt_opt(value: Option<f32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

fn print_table(variant: Variant, reports: &[PolicyReport]) {
    println!("\n--- {} ---", variant);
    println!(
        "{:<12} {:>7} {:>7} {:>7} {:>9} {:>8} {:>9} {:>8} {:>9}",
        "policy", "surv%", "crash%", "open%", "reward", "ticks", "fallback", "gap", "td_angle"
    );
    println!("{:-<86}", "");

    for r in reports {
        let pct = |n: u32| 100.0 * n as f32 / r.flights.max(1) as f32;
        println!(
            "{:<12} {:>7.1} {:>7.1} {:>7.1} {:>9.2} {:>8.1} {:>9.3} {:>8} {:>9}",
            r.name,
            pct(r.survived),
            pct(r.crashed),
            pct(r.unfinished),
            r.mean_reward,
            r.mean_ticks,
            r.mean_fallback,
            fmt_opt(r.mean_closest_gap),
            fmt_opt(r.mean_touchdown_angle),
        );
    }
}

fn write_csv(path: &Path, variant: Variant, reports: &[PolicyReport]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    writeln!(
        file,
        "variant,policy,flights,survived,crashed,unfinished,mean_reward,mean_ticks,mean_fallback,mean_closest_gap,mean_touchdown_angle"
    )?;
    for r in reports {
        writeln!(
            file,
            "{},{},{},{},{},{},{:.4},{:.2},{:.4},{},{}",
            variant,
            r.name,
            r.flights,
            r.survived,
            r.crashed,
            r.unfinished,
            r.mean_reward,
            r.mean_ticks,
            r.mean_fallback,
            r.mean_closest_gap.map(|v| format!("{v:.3}")).unwrap_or_default(),
            r.mean_touchdown_angle.map(|v| format!("{v:.3}")).unwrap_or_default(),
        )?;
    }
    Ok(())
}

pub fn cmd_bench(sim: SimConfig, policies_str: &str, seeds: u32, output: Option<&Path>) -> Result<(), SimError> {
    sim.validate()?;
    let policies: Vec<&str> = policies_str
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    // Fail on a bad name before spending time on the others.
    for name in &policies {
        resolve_policy(name, &sim)?;
    }

    println!(
        "=== Bench ===\nVariant: {} | Policies: {} | Seeds: {} | Total flights: {}",
        sim.variant,
        policies.join(", "),
        seeds,
        policies.len() * seeds as usize,
    );

    let start = std::time::Instant::now();
    let mut reports = Vec::with_capacity(policies.len());

    for name in &policies {
        let jobs: Vec<FlightJob> = (0..seeds)
            .map(|s| FlightJob {
                policy_name: name.to_string(),
                seed: s as u64,
            })
            .collect();

        let flights: Vec<FlightSummary> = jobs
            .par_iter()
            .map(|job| run_job(&sim, job))
            .collect::<Result<_, _>>()?;

        let report = summarize(name, &flights);
        info!(
            policy = %report.name,
            survived = report.survived,
            crashed = report.crashed,
            "policy benchmarked"
        );
        reports.push(report);
    }

    print_table(sim.variant, &reports);
    println!("\n({:.1}s)", start.elapsed().as_secs_f32());

    if let Some(path) = output {
        match write_csv(path, sim.variant, &reports) {
            Ok(()) => println!("CSV written to {}", path.display()),
            Err(e) => eprintln!("Failed to write CSV: {}", e),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_counts_outcomes() {
        let sim = SimConfig::landing();
        let flights: Vec<FlightSummary> = (0..3)
            .map(|seed| {
                run_job(
                    &sim,
                    &FlightJob {
                        policy_name: "leveler".into(),
                        seed,
                    },
                )
                .expect("known policy")
            })
            .collect();

        let report = summarize("leveler", &flights);

        assert_eq!(report.flights, 3);
        assert_eq!(report.survived + report.crashed + report.unfinished, 3);
        assert_eq!(report.survived, 3, "leveler lands from the default spawn");
        assert!(report.mean_touchdown_angle.is_some());
        assert!(report.mean_closest_gap.is_none());
    }

    #[test]
    fn test_unknown_policy_fails_bench() {
        let err = cmd_bench(SimConfig::glide(), "neutral,ace", 2, None).unwrap_err();
        assert!(matches!(err, SimError::UnknownPolicy(name) if name == "ace"));
    }

    #[test]
    fn test_mean_of_empty_is_none() {
        assert_eq!(mean_of(std::iter::empty()), None);
        assert_eq!(mean_of([1.0, 3.0].into_iter()), Some(2.0));
    }
}
