use crate::error::{SimError, SimResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Decision-policy thresholds used by the engine every tick.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PolicyConfig {
    /// Fraction of `total_work` at which an abandoned task qualifies for rescue.
    pub rescue_ratio: f64,
    /// Pending tasks strictly above this size are front-loaded.
    pub large_task_threshold: u32,
    /// Consecutive completions that force a rest.
    pub fatigue_threshold: u32,
    /// Ticks spent resting once fatigued.
    pub rest_cycles: u32,
    /// Skill tag that unlocks pickup of any pending task.
    pub generalist_skill: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            rescue_ratio:         0.75,
            large_task_threshold: 150,
            fatigue_threshold:    3,
            rest_cycles:          5,
            generalist_skill:     "Fullstack".into(),
        }
    }
}

/// Ranges used by the random population factory. Bounds are inclusive.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FactoryConfig {
    pub min_speed:       u32,
    pub max_speed:       u32,
    pub max_skill_draws: u32,
    pub min_total_work:  u32,
    pub max_total_work:  u32,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            min_speed:       5,
            max_speed:       15,
            max_skill_draws: 3,
            min_total_work:  50,
            max_total_work:  200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub default_interval_ms: u64,
    pub event_log_capacity:  usize,
    pub policy:              PolicyConfig,
    pub factory:             FactoryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 1000,
            event_log_capacity:  50,
            policy:              PolicyConfig::default(),
            factory:             FactoryConfig::default(),
        }
    }
}

impl SimConfig {
    /// Load `<data_dir>/sim_config.json`. A missing file means defaults;
    /// a present but malformed one is an error.
    pub fn load(data_dir: impl AsRef<Path>) -> SimResult<Self> {
        let path = data_dir.as_ref().join("sim_config.json");
        if !path.exists() {
            log::debug!("no {} found, using default config", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: SimConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Config with hardcoded defaults for use in unit tests.
    pub fn default_test() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.default_interval_ms == 0 {
            return Err(SimError::InvalidInterval { interval_ms: 0 });
        }
        if self.event_log_capacity == 0 {
            return Err(anyhow::anyhow!("event_log_capacity must be at least 1").into());
        }
        let p = &self.policy;
        if !(0.0..=1.0).contains(&p.rescue_ratio) {
            return Err(anyhow::anyhow!(
                "policy rescue_ratio {} must be within 0.0..=1.0", p.rescue_ratio
            ).into());
        }
        if p.fatigue_threshold == 0 {
            return Err(anyhow::anyhow!("policy fatigue_threshold must be at least 1").into());
        }
        // A rest of zero cycles would leave a Resting agent with nothing to count down.
        if p.rest_cycles == 0 {
            return Err(anyhow::anyhow!("policy rest_cycles must be at least 1").into());
        }

        let f = &self.factory;
        if f.min_speed == 0 || f.min_speed > f.max_speed {
            return Err(anyhow::anyhow!(
                "factory speed range {}..={} is invalid", f.min_speed, f.max_speed
            ).into());
        }
        if f.min_total_work == 0 || f.min_total_work > f.max_total_work {
            return Err(anyhow::anyhow!(
                "factory work range {}..={} is invalid", f.min_total_work, f.max_total_work
            ).into());
        }
        if f.max_skill_draws == 0 {
            return Err(anyhow::anyhow!("factory max_skill_draws must be at least 1").into());
        }
        Ok(())
    }
}
