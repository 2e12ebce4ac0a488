//! Session and rules configuration.
//!
//! Every field carries a serde default so partial JSON documents load cleanly;
//! `validate` rejects values that would break clamping invariants.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CPU_RUN_CHANCE, DEFENSIVE_PENALTY_PASS_CHANCE, DEFENSIVE_PENALTY_RUN_CHANCE,
    MAX_CLOCK_SECONDS, OFFENSIVE_PENALTY_SHORT_CHANCE, PUNT_NET_MAX, PUNT_NET_MIN,
    QUARTER_SECONDS,
};
use crate::state::Side;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be between {min} and {max} (got {value})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("punt range invalid (min {min} > max {max})")]
    PuntBounds { min: i32, max: i32 },
}

/// Weights for the chaos penalty sub-event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PenaltyWeights {
    #[serde(default = "PenaltyWeights::default_defensive_pass_chance")]
    pub defensive_pass_chance: f64,
    #[serde(default = "PenaltyWeights::default_defensive_run_chance")]
    pub defensive_run_chance: f64,
    #[serde(default = "PenaltyWeights::default_offensive_short_chance")]
    pub offensive_short_chance: f64,
}

impl PenaltyWeights {
    const fn default_defensive_pass_chance() -> f64 {
        DEFENSIVE_PENALTY_PASS_CHANCE
    }

    const fn default_defensive_run_chance() -> f64 {
        DEFENSIVE_PENALTY_RUN_CHANCE
    }

    const fn default_offensive_short_chance() -> f64 {
        OFFENSIVE_PENALTY_SHORT_CHANCE
    }
}

impl Default for PenaltyWeights {
    fn default() -> Self {
        Self {
            defensive_pass_chance: Self::default_defensive_pass_chance(),
            defensive_run_chance: Self::default_defensive_run_chance(),
            offensive_short_chance: Self::default_offensive_short_chance(),
        }
    }
}

/// Inclusive net distance range for punts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuntRange {
    pub min: i32,
    pub max: i32,
}

impl Default for PuntRange {
    fn default() -> Self {
        Self {
            min: PUNT_NET_MIN,
            max: PUNT_NET_MAX,
        }
    }
}

/// Tunable knobs of the ruleset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_quarter_seconds")]
    pub quarter_seconds: u32,
    #[serde(default = "RulesConfig::default_chaos_enabled")]
    pub chaos_enabled: bool,
    #[serde(default)]
    pub penalty: PenaltyWeights,
    #[serde(default)]
    pub punt: PuntRange,
    #[serde(default = "RulesConfig::default_cpu_run_chance")]
    pub cpu_run_chance: f64,
}

impl RulesConfig {
    const fn default_quarter_seconds() -> u32 {
        QUARTER_SECONDS
    }

    const fn default_chaos_enabled() -> bool {
        true
    }

    const fn default_cpu_run_chance() -> f64 {
        CPU_RUN_CHANCE
    }

    /// Validate the rules against clamping and probability invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quarter_seconds == 0 || self.quarter_seconds > MAX_CLOCK_SECONDS {
            return Err(ConfigError::RangeViolation {
                field: "quarter_seconds",
                min: 1.0,
                max: f64::from(MAX_CLOCK_SECONDS),
                value: f64::from(self.quarter_seconds),
            });
        }
        let probabilities = [
            ("penalty.defensive_pass_chance", self.penalty.defensive_pass_chance),
            ("penalty.defensive_run_chance", self.penalty.defensive_run_chance),
            ("penalty.offensive_short_chance", self.penalty.offensive_short_chance),
            ("cpu_run_chance", self.cpu_run_chance),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        if self.punt.min > self.punt.max {
            return Err(ConfigError::PuntBounds {
                min: self.punt.min,
                max: self.punt.max,
            });
        }
        if self.punt.min < 0 {
            return Err(ConfigError::RangeViolation {
                field: "punt.min",
                min: 0.0,
                max: f64::from(self.punt.max),
                value: f64::from(self.punt.min),
            });
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            quarter_seconds: Self::default_quarter_seconds(),
            chaos_enabled: Self::default_chaos_enabled(),
            penalty: PenaltyWeights::default(),
            punt: PuntRange::default(),
            cpu_run_chance: Self::default_cpu_run_chance(),
        }
    }
}

/// Display names for both sides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamNames {
    #[serde(default = "TeamNames::default_home_name")]
    pub home_name: String,
    #[serde(default = "TeamNames::default_away_name")]
    pub away_name: String,
    #[serde(default = "TeamNames::default_home_abbr")]
    pub home_abbr: String,
    #[serde(default = "TeamNames::default_away_abbr")]
    pub away_abbr: String,
}

impl TeamNames {
    fn default_home_name() -> String {
        String::from("Chiefs")
    }

    fn default_away_name() -> String {
        String::from("Broncos")
    }

    fn default_home_abbr() -> String {
        String::from("CHI")
    }

    fn default_away_abbr() -> String {
        String::from("DEN")
    }

    #[must_use]
    pub fn name(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_name,
            Side::Away => &self.away_name,
        }
    }

    #[must_use]
    pub fn abbr(&self, side: Side) -> &str {
        match side {
            Side::Home => &self.home_abbr,
            Side::Away => &self.away_abbr,
        }
    }
}

impl Default for TeamNames {
    fn default() -> Self {
        Self {
            home_name: Self::default_home_name(),
            away_name: Self::default_away_name(),
            home_abbr: Self::default_home_abbr(),
            away_abbr: Self::default_away_abbr(),
        }
    }
}

/// Top-level configuration for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub human_side: Side,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub teams: TeamNames,
    #[serde(default)]
    pub rules: RulesConfig,
}

impl SessionConfig {
    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or violates invariants.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// # Errors
    ///
    /// Returns the first violated rules invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rules.validate()
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn cpu_side(&self) -> Side {
        self.human_side.opponent()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            human_side: Side::Home,
            seed: 0,
            teams: TeamNames::default(),
            rules: RulesConfig::default(),
        }
    }
}
