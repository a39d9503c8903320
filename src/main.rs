//! Santa Market - main binary.
//!
//! Runs one competition over a named scenario preset with built-in demo
//! policies, prints a leaderboard, and optionally dumps the full result as
//! JSON. Streaming mode prints per-tick progress as the run advances.
//!
//! Every run is reproducible: the scenario seed drives all randomness, and
//! the demo policies are deterministic functions of the turn state.

mod policies;

use std::sync::Arc;
use std::thread;

use clap::Parser;
use crossbeam_channel::unbounded;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use scenarios::{all_scenarios, get_scenario};
use simulation::{MetricsHook, RunConfig, SimulationProgress, SimulationRunner};
use types::{AgentConfig, SimulationResult, Ticker};

use policies::DemoPolicy;

/// Santa Market - deterministic multi-agent trading simulation
#[derive(Parser, Debug)]
#[command(name = "santa-market")]
#[command(about = "A deterministic holiday-market simulation for competing trading agents")]
#[command(version)]
struct Args {
    /// Scenario preset to run
    #[arg(long, default_value = "calm-q4", env = "SANTA_SCENARIO")]
    scenario: String,

    /// Total ticks in the run
    #[arg(long, default_value_t = 14, env = "SANTA_TICKS")]
    ticks: u64,

    /// Enable the aggregate trade-pressure price feedback
    #[arg(long, env = "SANTA_TRADE_PRESSURE")]
    trade_pressure: bool,

    /// Print per-tick progress while the run advances
    #[arg(long, env = "SANTA_STREAM")]
    stream: bool,

    /// Dump the full result as JSON to stdout
    #[arg(long)]
    json: bool,

    /// List the available scenario presets and exit
    #[arg(long)]
    list_scenarios: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if args.list_scenarios {
        for scenario in all_scenarios() {
            println!("{:20} {}", scenario.id, scenario.description);
        }
        return;
    }

    if let Err(e) = run(&args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = get_scenario(&args.scenario)
        .ok_or_else(|| format!("unknown scenario: {}", args.scenario))?;

    let agents = demo_agents();
    print_banner(&scenario.name, args.ticks, agents.len(), args.trade_pressure);

    let config = RunConfig::new(scenario, agents, args.ticks)
        .with_trade_pressure(args.trade_pressure);

    let metrics = Arc::new(MetricsHook::new());
    let mut runner = SimulationRunner::new(config)?;
    runner.add_hook(metrics.clone());

    let policy = DemoPolicy::default();
    let result = if args.stream {
        run_streaming(&runner, &policy)?
    } else {
        runner.run(&policy)?
    };

    print_leaderboard(&result);

    let snapshot = metrics.snapshot();
    debug!(
        ticks = snapshot.total_ticks,
        orders = snapshot.total_orders,
        events = snapshot.total_events,
        "run metrics"
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

/// Built-in roster: one agent per demo policy.
fn demo_agents() -> Vec<AgentConfig> {
    vec![
        AgentConfig::new("momentum-max", "Momentum Max", "momentum"),
        AgentConfig::new("value-vera", "Value Vera", "value"),
        AgentConfig::new("steady-stan", "Steady Stan", "steady"),
    ]
}

/// Drive a streaming run on a worker thread and narrate progress here.
fn run_streaming(
    runner: &SimulationRunner,
    policy: &DemoPolicy,
) -> Result<SimulationResult, Box<dyn std::error::Error>> {
    let (tx, rx) = unbounded();

    thread::scope(|scope| {
        let handle = scope.spawn({
            let tx = tx.clone();
            move || runner.run_streaming(policy, &tx)
        });
        // Receiving ends once the run thread drops its sender clone.
        drop(tx);

        for progress in rx {
            match progress {
                SimulationProgress::Tick {
                    tick,
                    total_ticks,
                    snapshot,
                } => {
                    eprintln!(
                        "  tick {tick:>3}/{total_ticks}  SANTA {:>7.2}  COAL {:>6.2}",
                        snapshot.prices[Ticker::Santa],
                        snapshot.prices[Ticker::Coal],
                    );
                    for event in &snapshot.events {
                        eprintln!("      news [{}] {}", event.target, event.message);
                    }
                }
                SimulationProgress::Complete { .. } => {}
                SimulationProgress::Failed { message } => {
                    eprintln!("  run failed: {message}");
                }
            }
        }

        handle
            .join()
            .unwrap_or_else(|e| std::panic::resume_unwind(e))
    })
    .map_err(Into::into)
}

fn print_banner(scenario: &str, ticks: u64, agents: usize, trade_pressure: bool) {
    eprintln!("╔══════════════════════════════════════════════════════════╗");
    eprintln!("║  Santa Market                                            ║");
    eprintln!("╠══════════════════════════════════════════════════════════╣");
    eprintln!("║  Scenario: {scenario:<28}                  ║");
    eprintln!(
        "║  Ticks: {ticks:>4}  │  Agents: {agents:>2}  │  Pressure: {:<5}      ║",
        if trade_pressure { "on" } else { "off" }
    );
    eprintln!("╚══════════════════════════════════════════════════════════╝");
}

fn print_leaderboard(result: &SimulationResult) {
    eprintln!();
    eprintln!("╔══════════════════════════════════════════════════════════════════════╗");
    eprintln!("║  Leaderboard                                                         ║");
    eprintln!("╠══════════════════════════════════════════════════════════════════════╣");
    for score in &result.scores {
        eprintln!(
            "║  #{:<2} {:<14} value ${:>10.2}  return {:>+7.2}%  score {:>10.2} ║",
            score.rank,
            score.name,
            score.final_value,
            score.total_return * 100.0,
            score.score,
        );
        eprintln!(
            "║       style: {:<12} trades: {:>3}  violations: {:>3}               ║",
            score.trading_style.to_string(),
            score.total_trades,
            score.violations.len(),
        );
    }
    eprintln!("╚══════════════════════════════════════════════════════════════════════╝");
}
