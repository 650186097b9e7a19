//! Headless runner for pointswarm simulations

mod cli;
mod signal;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pointswarm::{PointInstance, Renderer, SwarmConfig, Vec2, Vec3, Vector};
use std::fs;
use std::path::Path;

use crate::cli::Cli;
use crate::signal::Signal;

/// Keeps the most recent frame instead of drawing it.
#[derive(Default)]
struct FrameCapture {
    frame: Vec<PointInstance>,
    size: (f32, f32, f32),
    frames: u64,
}

impl Renderer for FrameCapture {
    fn resize(&mut self, width: f32, height: f32, depth: f32) {
        self.size = (width, height, depth);
    }

    fn render(&mut self, frame: &[PointInstance]) {
        self.frame.clear();
        self.frame.extend_from_slice(frame);
        self.frames += 1;
    }
}

struct Summary {
    live: usize,
    spawned: u64,
    retired: u64,
    contacts: u64,
    skipped: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_level()))
        .init();

    let mut config = match &cli.config {
        Some(path) => SwarmConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            info!("no config given, using the built-in twin emitter setup");
            SwarmConfig::default()
        }
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    if let Some(path) = &cli.write_config {
        config
            .save(path)
            .with_context(|| format!("failed to write config {}", path.display()))?;
        println!("wrote {}", path.display());
        return Ok(());
    }

    let signal = match (&cli.signal, cli.pulse) {
        (Some(path), _) => Signal::load(path)?,
        (None, Some(period)) => Signal::Pulse { period },
        (None, None) => Signal::Silent,
    };
    if signal != Signal::Silent && config.envelope.is_none() {
        info!("intensity signal given without an envelope, using the default one");
        config.envelope = Some(Default::default());
    }

    let mut capture = FrameCapture::default();
    let summary = match cli.dims {
        3 => run::<Vec3>(&config, &signal, cli.ticks, &mut capture)?,
        _ => run::<Vec2>(&config, &signal, cli.ticks, &mut capture)?,
    };

    println!(
        "{}: {} ticks, {} live, {} spawned, {} retired, {} contacts, {} emissions skipped",
        config.name,
        cli.ticks,
        summary.live,
        summary.spawned,
        summary.retired,
        summary.contacts,
        summary.skipped
    );

    info!(
        "rendered {} frames into a {:?} world",
        capture.frames, capture.size
    );

    if let Some(path) = &cli.dump {
        dump(path, &capture.frame)?;
        info!("final frame ({} points) written to {}", capture.frame.len(), path.display());
    }
    Ok(())
}

fn run<V: Vector>(
    config: &SwarmConfig,
    signal: &Signal,
    ticks: u64,
    renderer: &mut FrameCapture,
) -> Result<Summary> {
    let mut driver = config.build::<V>().context("invalid config")?;
    renderer.resize(
        driver.world().width(),
        driver.world().height(),
        driver.world().depth(),
    );

    let mut contacts = 0;
    let mut skipped: u64 = 0;
    for tick in 0..ticks {
        let report = driver.frame(signal.at(tick));
        contacts += report.step.contacts as u64;
        skipped = skipped.saturating_add(report.skipped as u64);
        driver.render_to(renderer);

        if (tick + 1) % 100 == 0 {
            info!(
                "tick {}: {} live, {} contacts this tick",
                tick + 1,
                driver.swarm().len(),
                report.step.contacts
            );
        }
    }

    let swarm = driver.swarm();
    Ok(Summary {
        live: swarm.len(),
        spawned: swarm.total_spawned(),
        retired: swarm.total_retired(),
        contacts,
        skipped,
    })
}

fn dump(path: &Path, frame: &[PointInstance]) -> Result<()> {
    let json = serde_json::to_string_pretty(frame).context("failed to serialize frame")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}
