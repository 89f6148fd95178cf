//! Bobber Bar headless runner
//!
//! Plays fishing sessions with the autopilot and reports the outcome.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};

use bobber_bar::consts::DEFAULT_TICK_MS;
use bobber_bar::sim::autopilot::hold_button;
use bobber_bar::sim::InMemoryClaimRegistry;
use bobber_bar::{FishRegistry, FishingSession, Loadout, Outcome, SimulationConfig};

#[derive(Parser)]
#[command(name = "bobber-bar", about = "Headless fishing minigame runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play one session and print the outcome as JSON
    Run {
        #[command(flatten)]
        setup: Setup,

        /// Random seed for the session
        #[arg(long, default_value_t = 42)]
        seed: u64,
    },

    /// Play many seeds and print catch rates
    Sweep {
        #[command(flatten)]
        setup: Setup,

        /// Number of sessions
        #[arg(long, default_value_t = 100)]
        sessions: u64,
    },

    /// List the fish in the registry
    Fish {
        /// Registry JSON (id -> record); built-in sample if omitted
        #[arg(long)]
        registry: Option<PathBuf>,
    },
}

#[derive(Args)]
struct Setup {
    /// Fish id to hook
    #[arg(long, default_value = "136")]
    fish: String,

    /// Registry JSON (id -> record); built-in sample if omitted
    #[arg(long)]
    registry: Option<PathBuf>,

    /// Loadout JSON; bare bamboo rod if omitted
    #[arg(long)]
    loadout: Option<PathBuf>,

    /// Where in the size range the fish starts (0..1)
    #[arg(long, default_value_t = 0.5)]
    size: f32,

    /// Spawn a treasure chest
    #[arg(long)]
    treasure: bool,

    /// Make the treasure a unique reward with this id
    #[arg(long)]
    unique_treasure: Option<String>,

    /// Milliseconds per tick
    #[arg(long, default_value_t = DEFAULT_TICK_MS)]
    tick_ms: u32,

    /// Give up after this many ticks
    #[arg(long, default_value_t = 60_000)]
    max_ticks: u32,
}

impl Setup {
    fn config(&self) -> Result<SimulationConfig> {
        let registry = load_registry(self.registry.as_deref())?;
        let loadout = match &self.loadout {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading loadout {}", path.display()))?;
                serde_json::from_str::<Loadout>(&json)
                    .with_context(|| format!("parsing loadout {}", path.display()))?
            }
            None => Loadout::default(),
        };
        let fish = registry.get(&self.fish)?;
        let mut config = SimulationConfig::resolve(fish, &loadout, self.size, self.treasure)?;
        if let Some(reward_id) = &self.unique_treasure {
            config = config.with_unique_treasure(reward_id.clone());
        }
        Ok(config)
    }
}

fn load_registry(path: Option<&Path>) -> Result<FishRegistry> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading registry {}", path.display()))?;
            Ok(FishRegistry::from_json(&json)?)
        }
        None => Ok(FishRegistry::sample()),
    }
}

/// Play one session with the autopilot. `None` if it never finished.
fn play(
    config: SimulationConfig,
    seed: u64,
    claims: &InMemoryClaimRegistry,
    tick_ms: u32,
    max_ticks: u32,
) -> Result<Option<(Outcome, u64)>> {
    let mut session = FishingSession::with_seed(config, seed)?.with_claims(claims.clone());
    for _ in 0..max_ticks {
        let held = hold_button(&session.snapshot());
        if let Some(outcome) = session.update(tick_ms, held) {
            return Ok(Some((outcome, session.ticks())));
        }
    }
    log::warn!("Session {seed} still running after {max_ticks} ticks, aborting");
    session.abort()?;
    Ok(None)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let claims = InMemoryClaimRegistry::new();

    match cli.command {
        Commands::Run { setup, seed } => {
            let config = setup.config()?;
            match play(config, seed, &claims, setup.tick_ms, setup.max_ticks)? {
                Some((outcome, ticks)) => {
                    log::info!("Finished in {ticks} ticks");
                    println!("{}", serde_json::to_string_pretty(&outcome)?);
                }
                None => println!("Session did not finish within {} ticks", setup.max_ticks),
            }
        }
        Commands::Sweep { setup, sessions } => {
            let config = setup.config()?;
            let mut caught = 0u64;
            let mut perfect = 0u64;
            let mut unfinished = 0u64;
            let mut total_ticks = 0u64;
            for seed in 0..sessions {
                match play(config.clone(), seed, &claims, setup.tick_ms, setup.max_ticks)? {
                    Some((outcome, ticks)) => {
                        total_ticks += ticks;
                        if outcome.success {
                            caught += 1;
                        }
                        if outcome.perfect {
                            perfect += 1;
                        }
                    }
                    None => unfinished += 1,
                }
            }
            let finished = sessions - unfinished;
            let rate = |n: u64| 100.0 * n as f64 / sessions.max(1) as f64;
            println!("Fish {} over {} sessions", setup.fish, sessions);
            println!("  caught:     {:5.1}%", rate(caught));
            println!("  perfect:    {:5.1}%", rate(perfect));
            println!("  unfinished: {unfinished}");
            if finished > 0 {
                println!("  avg ticks:  {:.0}", total_ticks as f64 / finished as f64);
            }
        }
        Commands::Fish { registry } => {
            let registry = load_registry(registry.as_deref())?;
            for id in registry.ids() {
                let fish = registry.get(id)?;
                println!(
                    "{:>5}  {:<18} difficulty {:>3}  {:<8} size {}-{}",
                    fish.id,
                    fish.name,
                    fish.difficulty,
                    fish.motion.as_str(),
                    fish.min_size,
                    fish.max_size
                );
            }
        }
    }

    Ok(())
}
