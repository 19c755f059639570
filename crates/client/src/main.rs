//! Headless horde simulation.
//!
//! Loads a scenario, runs it against a straight-line kinematic world and
//! logs every coordination event. Settings come from the environment (see
//! [`config::SimConfig::from_env`]); a `.env` file is honoured.
//!
//! ```bash
//! HORDE_FRAMES=600 RUST_LOG=runtime=debug cargo run -p horde-sim
//! ```

mod config;
mod world;

use anyhow::{Context, Result};
use behavior_tree::Status;
use config::SimConfig;
use runtime::{Event, HordeEvent, PerceptionEvent, Scenario, Topic};
use tokio::sync::broadcast::{Receiver, error::TryRecvError};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use world::Simulation;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = SimConfig::from_env();
    let _guard = setup_logging(&config)?;

    let mut scenario = Scenario::load_from_file(&config.scenario)
        .with_context(|| format!("loading scenario {}", config.scenario.display()))?;
    if let Some(seed) = config.seed {
        scenario.coordinator.rng_seed = seed;
    }

    let mut sim = Simulation::new(&scenario, config.agent_speed, config.frame_dt)
        .context("building simulation")?;
    let mut receivers = sim.coordinator().events().subscribe_all();

    tracing::info!(
        frames = config.frames,
        frame_dt = config.frame_dt,
        agents = scenario.agents.len(),
        "simulation started"
    );

    for _ in 0..config.frames {
        let report = sim.step()?;
        for (topic, rx) in &mut receivers {
            drain_events(*topic, rx);
        }
        if report.frame % 50 == 0 {
            tracing::info!(
                frame = report.frame,
                now = report.now,
                hordes = sim.coordinator().manager().hordes().len(),
                moving = report.count(Status::InProgress),
                "progress"
            );
        }
    }

    print_summary(&sim);
    Ok(())
}

/// Setup logging to stderr and, when configured, to a log file.
///
/// The returned guard flushes the file writer on drop.
fn setup_logging(config: &SimConfig) -> Result<Option<WorkerGuard>> {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::never(dir, "horde-sim.log");
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .init();

    if let Some(dir) = &config.log_dir {
        tracing::info!("Log file: {}/horde-sim.log", dir.display());
    }
    Ok(guard)
}

fn drain_events(topic: Topic, rx: &mut Receiver<Event>) {
    loop {
        match rx.try_recv() {
            Ok(event) => log_event(&event),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!(?topic, skipped, "event subscriber lagged");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
}

fn log_event(event: &Event) {
    match event {
        Event::Horde(HordeEvent::Created {
            horde,
            founder,
            rally_point,
            at,
        }) => tracing::info!(%horde, %founder, ?rally_point, at, "horde created"),
        Event::Horde(HordeEvent::Joined { agent, horde, at }) => {
            tracing::info!(%agent, %horde, at, "agent joined")
        }
        Event::Horde(HordeEvent::Left { agent, horde, at }) => {
            tracing::info!(%agent, %horde, at, "agent left")
        }
        Event::Horde(HordeEvent::Disbanded { horde, at }) => {
            tracing::info!(%horde, at, "horde disbanded")
        }
        Event::Horde(HordeEvent::RallyPointMoved {
            horde,
            rally_point,
            at,
        }) => tracing::debug!(%horde, ?rally_point, at, "rally point moved"),
        Event::Horde(HordeEvent::Alone { agent, at }) => {
            tracing::info!(%agent, at, "agent going alone")
        }
        Event::Perception(PerceptionEvent::PlayerSpotted {
            agent,
            player_position,
            at,
        }) => tracing::info!(%agent, ?player_position, at, "player spotted"),
        Event::Perception(PerceptionEvent::PlayerLost { agent, at }) => {
            tracing::info!(%agent, at, "player lost")
        }
    }
}

fn print_summary(sim: &Simulation) {
    let coordinator = sim.coordinator();
    let manager = coordinator.manager();

    println!("after {} frames ({:.1}s):", coordinator.frame(), coordinator.now());
    for horde in manager.hordes().iter() {
        let members: Vec<String> = horde.members().map(|id| id.to_string()).collect();
        println!(
            "  {} [{}/{}] rally {:?}: {}",
            horde.id,
            horde.len(),
            horde.capacity(),
            horde.rally_point,
            members.join(", ")
        );
    }
    for agent in manager.agents().iter().filter(|agent| agent.is_unassigned()) {
        let archetype = coordinator
            .archetype(agent.id)
            .map(|archetype| archetype.to_string())
            .unwrap_or_default();
        println!(
            "  {} ({archetype}) unassigned at {:?}{}",
            agent.id,
            agent.position,
            if agent.alone { ", alone" } else { "" }
        );
    }
}
