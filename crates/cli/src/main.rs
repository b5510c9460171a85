mod bench;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glider_shared::*;
use glider_sim::analyzer;
use glider_sim::autopilots::{default_policy_name, resolve_policy, POLICY_NAMES};
use glider_sim::{run_flight, SimError};

#[derive(Parser)]
#[command(name = "glider", about = "Glide and landing simulator CLI")]
struct Cli {
    /// Log debug output from the simulator (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fly one episode with a policy
    Run {
        /// Variant preset: glide, momentum_glide or landing
        #[arg(long, default_value = "glide")]
        variant: Variant,

        /// Policy name (neutral, dodger, leveler). Defaults to the variant's autopilot
        #[arg(long)]
        policy: Option<String>,

        /// Random seed for the episode
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// JSON config file replacing the preset
        #[arg(long)]
        config: Option<PathBuf>,

        /// Stop after this many ticks if the episode has not ended
        #[arg(long, default_value_t = MAX_RUN_TICKS)]
        max_ticks: u32,

        /// Output path for the flight record JSON
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Fly many seeds per policy in parallel and compare outcomes
    Bench {
        #[arg(long, default_value = "glide")]
        variant: Variant,

        /// Comma-separated policy names
        #[arg(long, default_value = "neutral,dodger,leveler")]
        policies: String,

        /// Number of seeds per policy
        #[arg(long, default_value_t = 100)]
        seeds: u32,

        #[arg(long)]
        config: Option<PathBuf>,

        /// Output path for per-policy CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print a variant preset as JSON, or validate a config file
    Config {
        #[arg(long, default_value = "glide")]
        variant: Variant,

        /// Validate this file instead of printing a preset
        #[arg(long)]
        check: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_timer(fmt::time::uptime());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .init();
}

/// Preset for `variant`, or the file at `path` when given.
fn load_sim_config(variant: Variant, path: Option<&Path>) -> Result<SimConfig, SimError> {
    match path {
        Some(path) => {
            let config = SimConfig::load(path)?;
            if config.variant != variant {
                warn!(
                    requested = %variant,
                    loaded = %config.variant,
                    "config file overrides the requested variant"
                );
            }
            info!(path = %path.display(), variant = %config.variant, "loaded config");
            Ok(config)
        }
        None => Ok(SimConfig::preset(variant)),
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            variant,
            policy,
            seed,
            config,
            max_ticks,
            output,
        } => cmd_run(variant, policy.as_deref(), seed, config.as_deref(), max_ticks, output),

        Commands::Bench {
            variant,
            policies,
            seeds,
            config,
            output,
        } => load_sim_config(variant, config.as_deref())
            .and_then(|sim| bench::cmd_bench(sim, &policies, seeds, output.as_deref())),

        Commands::Config { variant, check } => cmd_config(variant, check.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn cmd_run(
    variant: Variant,
    policy_name: Option<&str>,
    seed: u64,
    config_path: Option<&Path>,
    max_ticks: u32,
    output: Option<PathBuf>,
) -> Result<(), SimError> {
    let sim = load_sim_config(variant, config_path)?;
    let policy_name = policy_name.unwrap_or_else(|| default_policy_name(sim.variant));
    let mut policy = resolve_policy(policy_name, &sim)?;

    let config = RunConfig {
        seed,
        policy_name: policy.name().to_string(),
        max_ticks,
        sim,
    };

    println!(
        "Flying {} with {} (seed={})",
        config.sim.variant,
        policy.name(),
        seed
    );

    let record = run_flight(&config, policy.as_mut())?;
    let result = &record.result;
    let metrics = analyzer::analyze(&record);
    let seconds = result.final_tick as f32 * config.sim.tick_ms as f32 / 1000.0;

    println!();
    println!("=== Flight Result ===");
    println!("Outcome:      {:?}", result.outcome);
    println!("Reason:       {:?}", result.reason);
    println!("Final tick:   {} ({:.1}s)", result.final_tick, seconds);
    println!("Total reward: {:.2}", result.total_reward);
    println!();
    println!("--- Stats ---");
    println!(
        "  impulses={} rate_limited={} gusts={} respawns={} fallback_ticks={}",
        result.stats.impulses,
        result.stats.rate_limited,
        result.stats.gusts,
        result.stats.respawns,
        result.fallback_ticks
    );
    println!(
        "  altitude range={:.1} max sink={:.2} max |vx|={:.2} max |angle|={:.1}",
        metrics.altitude_range, metrics.max_sink_rate, metrics.max_lateral_speed, metrics.max_abs_angle
    );
    if let Some(gap) = metrics.closest_obstacle_gap {
        println!("  closest obstacle gap={gap:.1}");
    }
    if let Some(td) = metrics.touchdown {
        println!(
            "  touchdown angle={:.2} vx={:.2} ({})",
            td.angle,
            td.speed_x,
            if td.soft { "soft" } else { "hard" }
        );
    }

    if let Some(path) = output {
        match serde_json::to_string_pretty(&record) {
            Ok(json) => match std::fs::write(&path, json) {
                Ok(()) => println!("\nFlight record written to {}", path.display()),
                Err(e) => eprintln!("\nFailed to write flight record: {}", e),
            },
            Err(e) => eprintln!("\nFailed to serialize flight record: {}", e),
        }
    }

    Ok(())
}

fn cmd_config(variant: Variant, check: Option<&Path>) -> Result<(), SimError> {
    match check {
        Some(path) => {
            let config = SimConfig::load(path)?;
            println!("{} is a valid {} config", path.display(), config.variant);
        }
        None => {
            let json = SimConfig::preset(variant).to_json_pretty()?;
            println!("{json}");
            eprintln!("Policies: {}", POLICY_NAMES.join(", "));
        }
    }
    Ok(())
}
