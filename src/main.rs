//! Fruit Tap headless driver
//!
//! Runs one match at the fixed tick rate with a scripted tapper standing in
//! for the player. Useful for tuning configs and checking seeds.

use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use fruit_tap::Variant;
use fruit_tap::audio::{AudioCues, AudioSink, LogSink};
use fruit_tap::config::MatchConfig;
use fruit_tap::sim::{EndReason, Entity, MatchObserver, Simulation, Snapshot};

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a headless Fruit Tap match", long_about = None)]
struct Args {
    /// JSON match config; defaults are used when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 12345)]
    seed: u64,
    #[arg(long, default_value_t = 1080.0)]
    width: f32,
    #[arg(long, default_value_t = 1920.0)]
    height: f32,
    /// Rule preset (orchard, blossom); ignored when --config is given
    #[arg(long)]
    variant: Option<String>,
    /// Stop after this many ticks even if the match is still running
    #[arg(long, default_value_t = 2400)]
    ticks: u64,
    /// Ticks between scripted taps
    #[arg(long, default_value_t = 6)]
    tap_every: u64,
    /// Write the effective config as JSON and exit
    #[arg(long)]
    dump_config: Option<PathBuf>,
    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,
}

struct ResultLogger;

impl MatchObserver for ResultLogger {
    fn on_match_end(&mut self, final_score: u64, reason: EndReason) {
        let why = match reason {
            EndReason::OutOfLives => "out of lives",
            EndReason::TimeUp => "time up",
        };
        log::info!("Game over ({why}), final score {final_score}");
    }
}

/// Tap the lowest fruit or flower, the one closest to falling out
fn pick_target(snapshot: &Snapshot) -> Option<Vec2> {
    snapshot
        .entities
        .iter()
        .filter(|e| e.is_reward())
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(Entity::center)
}

/// Tick up to `ticks` times with the scripted tapper, returning the last snapshot
fn run_match<S: AudioSink>(
    sim: &mut Simulation,
    audio: &mut AudioCues<S>,
    ticks: u64,
    tap_every: u64,
) -> Option<Snapshot> {
    let taps = sim.tap_sender();
    let tap_every = tap_every.max(1);
    let mut last: Option<Snapshot> = None;

    for tick in 0..ticks {
        if !sim.state().is_active() {
            break;
        }
        if tick > 0 && tick % tap_every == 0 {
            if let Some(target) = last.as_ref().and_then(pick_target) {
                taps.tap(target);
            }
        }
        let snapshot = sim.on_tick();
        audio.handle_events(&snapshot.events);
        last = Some(snapshot);
    }
    last
}

fn load_config(args: &Args) -> fruit_tap::Result<MatchConfig> {
    if let Some(path) = &args.config {
        return MatchConfig::load(path);
    }
    let variant = match args.variant.as_deref() {
        Some(name) => Variant::from_str(name).unwrap_or_else(|| {
            log::warn!("Unknown variant {name:?}, using {}", Variant::default().as_str());
            Variant::default()
        }),
        None => Variant::default(),
    };
    log::info!("Using {} rules", variant.as_str());
    Ok(MatchConfig::from_variant(variant))
}

fn main() -> fruit_tap::Result<()> {
    env_logger::init();
    let args = Args::parse();
    log::info!("Fruit Tap (headless) starting...");

    let config = load_config(&args)?;
    if let Some(path) = &args.dump_config {
        config.validate()?;
        return config.save(path);
    }

    let mut sim = Simulation::new(args.seed);
    sim.add_observer(Box::new(ResultLogger));
    sim.start_match(args.width, args.height, config)?;

    let mut audio = AudioCues::new(LogSink);
    audio.start_music();

    let Some(last) = run_match(&mut sim, &mut audio, args.ticks, args.tap_every) else {
        log::info!("No ticks requested, match not run");
        return Ok(());
    };
    log::info!(
        "Stopped at {} remaining: score {}, lives {}, wave {}",
        last.clock_text(),
        last.score,
        last.lives,
        last.wave
    );
    if args.json {
        println!("{}", serde_json::to_string_pretty(&last)?);
    }
    Ok(())
}
