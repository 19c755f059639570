/// Per-agent horde coordination tuning.
///
/// Every agent carries its own copy so that different archetypes can form
/// hordes of different sizes in the same world.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HordeConfig {
    /// Capacity of a horde founded by this agent.
    pub horde_max: usize,
    /// Unassigned agents (the founder included) that must be within
    /// `join_radius` before a new horde is founded.
    pub horde_min_size: usize,
    /// Radius used both to look for joinable hordes and to count unassigned
    /// neighbours.
    pub join_radius: f32,
    /// Seconds between two coordination attempts. Clamped to
    /// [`HordeConfig::MIN_CHECK_INTERVAL`].
    pub check_interval: f64,
}

impl HordeConfig {
    /// Lower bound applied to `check_interval`.
    pub const MIN_CHECK_INTERVAL: f64 = 0.1;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_HORDE_MAX: usize = 6;
    pub const DEFAULT_HORDE_MIN_SIZE: usize = 3;
    pub const DEFAULT_JOIN_RADIUS: f32 = 15.0;
    pub const DEFAULT_CHECK_INTERVAL: f64 = 1.0;

    pub const fn new() -> Self {
        Self {
            horde_max: Self::DEFAULT_HORDE_MAX,
            horde_min_size: Self::DEFAULT_HORDE_MIN_SIZE,
            join_radius: Self::DEFAULT_JOIN_RADIUS,
            check_interval: Self::DEFAULT_CHECK_INTERVAL,
        }
    }

    #[must_use]
    pub const fn with_horde_max(mut self, horde_max: usize) -> Self {
        self.horde_max = horde_max;
        self
    }

    #[must_use]
    pub const fn with_horde_min_size(mut self, horde_min_size: usize) -> Self {
        self.horde_min_size = horde_min_size;
        self
    }

    #[must_use]
    pub const fn with_join_radius(mut self, join_radius: f32) -> Self {
        self.join_radius = join_radius;
        self
    }

    #[must_use]
    pub const fn with_check_interval(mut self, check_interval: f64) -> Self {
        self.check_interval = check_interval;
        self
    }

    /// The interval actually used by the check gate.
    #[inline]
    pub fn effective_check_interval(&self) -> f64 {
        self.check_interval.max(Self::MIN_CHECK_INTERVAL)
    }

    /// Rejects settings that would make horde formation impossible or
    /// ill-defined.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.horde_max == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.horde_min_size == 0 {
            return Err(ConfigError::ZeroMinimumSize);
        }
        if !self.join_radius.is_finite() || self.join_radius < 0.0 {
            return Err(ConfigError::InvalidJoinRadius(self.join_radius));
        }
        if self.check_interval.is_nan() {
            return Err(ConfigError::InvalidCheckInterval);
        }
        Ok(())
    }
}

impl Default for HordeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("horde_max must be at least 1")]
    ZeroCapacity,

    #[error("horde_min_size must be at least 1")]
    ZeroMinimumSize,

    #[error("join_radius must be finite and non-negative, got {0}")]
    InvalidJoinRadius(f32),

    #[error("check_interval must be a number")]
    InvalidCheckInterval,
}
