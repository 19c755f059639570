//! Simulation settings loaded from the environment.
use std::env;
use std::path::PathBuf;

/// Settings for one headless run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    pub scenario: PathBuf,
    pub frames: u64,
    /// Seconds advanced per frame.
    pub frame_dt: f64,
    /// Overrides the scenario's roaming seed.
    pub seed: Option<u64>,
    /// Agent walking speed, units per second.
    pub agent_speed: f32,
    /// Enables a log file in this directory next to stderr output.
    pub log_dir: Option<PathBuf>,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            scenario: PathBuf::from("crates/client/scenarios/ambush.ron"),
            frames: 300,
            frame_dt: 0.1,
            seed: None,
            agent_speed: 3.5,
            log_dir: None,
        }
    }
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `HORDE_SCENARIO` - Scenario RON file (default: bundled ambush scenario)
    /// - `HORDE_FRAMES` - Frames to simulate (default: 300)
    /// - `HORDE_FRAME_DT` - Seconds per frame (default: 0.1)
    /// - `HORDE_SEED` - Roaming seed override (default: scenario value)
    /// - `HORDE_AGENT_SPEED` - Agent walking speed (default: 3.5)
    /// - `HORDE_LOG_DIR` - Also write logs to `horde-sim.log` in this directory
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`SimConfig::from_env`] with variables read through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup("HORDE_SCENARIO") {
            config.scenario = PathBuf::from(path);
        }

        if let Some(frames) = read_var::<u64>(&lookup, "HORDE_FRAMES") {
            config.frames = frames;
        }

        if let Some(dt) =
            read_var::<f64>(&lookup, "HORDE_FRAME_DT").filter(|dt| dt.is_finite() && *dt > 0.0)
        {
            config.frame_dt = dt;
        }

        config.seed = read_var::<u64>(&lookup, "HORDE_SEED");

        if let Some(speed) = read_var::<f32>(&lookup, "HORDE_AGENT_SPEED") {
            config.agent_speed = speed.max(0.0);
        }

        config.log_dir = lookup("HORDE_LOG_DIR").map(PathBuf::from);

        config
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}
