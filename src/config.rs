//! Simulation configuration.
//!
//! Every option has a default, so a JSON file only needs the keys it changes.
//! Unknown keys are rejected.
//!
//! ```
//! use chem_lab_sim::config::SimConfig;
//!
//! let config = SimConfig::from_json_str(r#"{ "gravity": [0.0, 50.0], "seed": 7 }"#).unwrap();
//! assert_eq!(config.gravity.y, 50.0);
//! assert_eq!(config.ambient_temperature, 25.0);
//! ```

use crate::constants::*;
use crate::error::{Result, SimError};
use crate::phase_transition::ThermalBands;
use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimConfig {
    pub width: f64,
    pub height: f64,
    /// Keep particles inside the `width` x `height` world rectangle
    pub world_walls: bool,
    /// Velocity units per second squared
    pub gravity: DVec2,
    /// Fraction of velocity removed per second
    pub damping: f64,
    pub default_restitution: f64,

    pub ambient_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,

    pub max_dt: f64,
    /// World units travelled per second at unit velocity
    pub motion_scale: f64,

    pub bond_stiffness: f64,
    pub bond_damping: f64,
    pub bond_iterations: u32,

    pub jitter_strength: f64,
    pub thermal_relaxation_rate: f64,
    pub default_conductivity: f64,

    pub particle_collisions: bool,
    pub particle_restitution: f64,

    pub seed: u64,
    pub bands: ThermalBands,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WORLD_WIDTH,
            height: DEFAULT_WORLD_HEIGHT,
            world_walls: true,
            gravity: DVec2::ZERO,
            damping: DEFAULT_DAMPING_PER_SECOND,
            default_restitution: DEFAULT_RESTITUTION,
            ambient_temperature: AMBIENT_TEMPERATURE_C,
            min_temperature: ABSOLUTE_ZERO_C,
            max_temperature: MAX_FIELD_TEMPERATURE_C,
            max_dt: MAX_TICK_SECONDS,
            motion_scale: MOTION_SCALE,
            bond_stiffness: DEFAULT_BOND_STIFFNESS,
            bond_damping: DEFAULT_BOND_DAMPING,
            bond_iterations: 1,
            jitter_strength: DEFAULT_JITTER_STRENGTH,
            thermal_relaxation_rate: DEFAULT_THERMAL_RELAXATION_RATE,
            default_conductivity: DEFAULT_CONDUCTIVITY,
            particle_collisions: false,
            particle_restitution: DEFAULT_RESTITUTION,
            seed: DEFAULT_SEED,
            bands: ThermalBands::default(),
        }
    }
}

fn invalid(message: impl Into<String>) -> SimError {
    SimError::InvalidConfig(message.into())
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .map_err(|e| SimError::ConfigParse(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("max_dt", self.max_dt),
            ("motion_scale", self.motion_scale),
        ];
        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(invalid(format!("{name} must be a finite value > 0, got {value}")));
            }
        }

        let non_negative = [
            ("damping", self.damping),
            ("bond_stiffness", self.bond_stiffness),
            ("bond_damping", self.bond_damping),
            ("jitter_strength", self.jitter_strength),
            ("thermal_relaxation_rate", self.thermal_relaxation_rate),
            ("default_conductivity", self.default_conductivity),
        ];
        for (name, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(invalid(format!("{name} must be a finite value >= 0, got {value}")));
            }
        }

        let unit = [
            ("default_restitution", self.default_restitution),
            ("particle_restitution", self.particle_restitution),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(invalid(format!("{name} must be within [0, 1], got {value}")));
            }
        }

        if !(self.gravity.x.is_finite() && self.gravity.y.is_finite()) {
            return Err(invalid("gravity must be finite"));
        }
        let temperatures = [self.ambient_temperature, self.min_temperature, self.max_temperature];
        if temperatures.iter().any(|t| !t.is_finite()) {
            return Err(invalid("temperatures must be finite"));
        }
        if self.min_temperature > self.max_temperature {
            return Err(invalid("min_temperature must not exceed max_temperature"));
        }
        if !(self.min_temperature..=self.max_temperature).contains(&self.ambient_temperature) {
            return Err(invalid(format!(
                "ambient_temperature {} must lie within [{}, {}]",
                self.ambient_temperature, self.min_temperature, self.max_temperature
            )));
        }
        if self.bond_iterations == 0 {
            return Err(invalid("bond_iterations must be at least 1"));
        }
        self.bands.validate()
    }

    pub fn world_size(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }
}
