//! Headless fight in the courtyard
//!
//! Run with: cargo run -p rising_sim --bin rising_harness -- [--frames N] [--level FILE] [--json]
//!
//! A scripted player walks to the nearest enemy and swings at it, dodging
//! now and then. Every event is logged, or printed as JSON lines with
//! `--json`.

use std::process::ExitCode;

use rising_core::AgentKind;
use rising_level::DEFAULT_CELL_SIZE;
use rising_math::{horizontal_distance, Vec3};
use rising_sim::prelude::*;

const DELTA: f32 = 1.0 / 60.0;

struct Options {
    frames: u64,
    level: Option<String>,
    json: bool,
}

fn parse_args() -> Result<Options, String> {
    let mut options = Options {
        frames: 60 * 60,
        level: None,
        json: false,
    };
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--json" => options.json = true,
            "--frames" => {
                let value = args.next().ok_or("--frames needs a value")?;
                options.frames = value
                    .parse()
                    .map_err(|_| format!("invalid frame count: {}", value))?;
            }
            "--level" => {
                options.level = Some(args.next().ok_or("--level needs a path")?);
            }
            other => return Err(format!("unknown argument: {}", other)),
        }
    }
    Ok(options)
}

fn load_level(path: Option<&str>) -> Result<GridLevel, ConfigError> {
    match path {
        Some(path) => {
            let layout = std::fs::read_to_string(path)?;
            Ok(GridLevel::from_ascii(&layout, DEFAULT_CELL_SIZE)?)
        }
        None => Ok(GridLevel::default_courtyard()),
    }
}

/// Walk to the nearest enemy, swing when in reach, dodge every few seconds
fn scripted_input(sim: &Simulation) -> InputSnapshot {
    let player = sim.player().agent();
    let nearest = sim
        .snapshot()
        .into_iter()
        .filter(|agent| agent.kind == AgentKind::Enemy && agent.alive)
        .min_by(|a, b| {
            horizontal_distance(player.position, a.position)
                .total_cmp(&horizontal_distance(player.position, b.position))
        });

    let Some(target) = nearest else {
        return InputSnapshot::idle();
    };

    if sim.frame() % 180 == 179 {
        let away = (player.position - target.position).flat().normalize_or_zero();
        return InputSnapshot::moving(away.x, away.z).with_dodge();
    }

    let distance = horizontal_distance(player.position, target.position);
    if distance <= player.attack_range {
        return InputSnapshot::idle()
            .with_attack()
            .with_cursor(target.position);
    }
    let toward: Vec3 = (target.position - player.position).flat().normalize_or_zero();
    InputSnapshot::moving(toward.x, toward.z)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match parse_args() {
        Ok(options) => options,
        Err(err) => {
            log::error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let level = match load_level(options.level.as_deref()) {
        Ok(level) => level,
        Err(err) => {
            log::error!("Failed to load level: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let config = SimConfig::load_or_default();
    let health = HealthRecorder::new();
    let mut sim = match Simulation::new(config, &level) {
        Ok(sim) => sim.with_health_observer(health.clone()),
        Err(err) => {
            log::error!("Failed to start simulation: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let mut kills = 0;
    for _ in 0..options.frames {
        let input = scripted_input(&sim);
        let report = sim.tick(DELTA, &input);

        for event in &report.events {
            if matches!(event, SimEvent::Died { kind: AgentKind::Enemy, .. }) {
                kills += 1;
            }
            if options.json {
                match serde_json::to_string(event) {
                    Ok(line) => println!("{}", line),
                    Err(err) => log::warn!("Could not encode event: {}", err),
                }
            } else {
                log::info!("[{:>5}] {:?}", report.frame, event);
            }
        }

        if !sim.player().agent().is_alive() {
            log::info!("Player fell on frame {}", sim.frame());
            break;
        }
        if sim.enemy_count() == 0 {
            log::info!("Arena cleared on frame {}", sim.frame());
            break;
        }
    }

    log::info!(
        "Finished after {:.1}s: {} kills, player at {}/{} health, {} health updates, {} distinct warnings",
        sim.elapsed(),
        kills,
        sim.player().agent().health.current(),
        sim.player().agent().health.max(),
        health.changes().len(),
        sim.diagnostics().distinct()
    );
    ExitCode::SUCCESS
}
