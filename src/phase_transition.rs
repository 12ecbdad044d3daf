//! Temperature-driven particle behaviour.
//!
//! Maps a particle temperature to a vibration intensity and a speed-cap factor
//! by interpolating over a band table, and derives the phase, bubbling flag and
//! heat tint the renderer shows. The thresholds live here as configuration so
//! nothing else in the crate hard-codes them.

use crate::constants::{
    BOND_WEAKENING_PER_100C, BUBBLING_TEMPERATURE_C, DEFAULT_THERMAL_BANDS, MIN_BOND_STABILITY,
    TINT_HOT_C, TINT_MEDIUM_C, TINT_WARM_C,
};
use crate::entities::{HeatTint, Particle};
use crate::error::{Result, SimError};
use crate::material::MaterialPhase;
use crate::math_utils::{clamp01, interpolate_by};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandPoint {
    pub temperature: f64,
    pub vibration: f64,
    pub speed_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalBands {
    /// Control points sorted by temperature
    pub points: Vec<BandPoint>,
    /// Liquids at or above this temperature bubble
    pub bubbling_temperature: f64,
    pub tint_medium: f64,
    pub tint_warm: f64,
    pub tint_hot: f64,
    /// Bond stability lost per 100 °C of mean endpoint temperature
    pub bond_weakening: f64,
}

impl Default for ThermalBands {
    fn default() -> Self {
        Self {
            points: DEFAULT_THERMAL_BANDS
                .iter()
                .map(|&(temperature, vibration, speed_factor)| BandPoint {
                    temperature,
                    vibration,
                    speed_factor,
                })
                .collect(),
            bubbling_temperature: BUBBLING_TEMPERATURE_C,
            tint_medium: TINT_MEDIUM_C,
            tint_warm: TINT_WARM_C,
            tint_hot: TINT_HOT_C,
            bond_weakening: BOND_WEAKENING_PER_100C,
        }
    }
}

impl ThermalBands {
    pub fn validate(&self) -> Result<()> {
        if self.points.is_empty() {
            return Err(SimError::InvalidConfig("thermal bands need at least one point".into()));
        }
        for point in &self.points {
            let values = [point.temperature, point.vibration, point.speed_factor];
            if values.iter().any(|v| !v.is_finite()) {
                return Err(SimError::InvalidConfig("thermal band values must be finite".into()));
            }
            if point.speed_factor < 0.0 {
                return Err(SimError::InvalidConfig("speed factors must be >= 0".into()));
            }
        }
        if self.points.windows(2).any(|w| w[0].temperature >= w[1].temperature) {
            return Err(SimError::InvalidConfig(
                "thermal bands must be sorted by strictly increasing temperature".into(),
            ));
        }
        if !(self.tint_medium <= self.tint_warm && self.tint_warm <= self.tint_hot) {
            return Err(SimError::InvalidConfig("tint thresholds must be ascending".into()));
        }
        Ok(())
    }

    pub fn vibration_at(&self, temperature: f64) -> f64 {
        clamp01(interpolate_by(&self.points, temperature, |p| p.temperature, |p| p.vibration, 0.0))
    }

    pub fn speed_factor_at(&self, temperature: f64) -> f64 {
        interpolate_by(&self.points, temperature, |p| p.temperature, |p| p.speed_factor, 1.0).max(0.0)
    }

    pub fn tint_at(&self, temperature: f64) -> HeatTint {
        if temperature >= self.tint_hot {
            HeatTint::Hot
        } else if temperature >= self.tint_warm {
            HeatTint::Warm
        } else if temperature >= self.tint_medium {
            HeatTint::Medium
        } else {
            HeatTint::Cool
        }
    }

    /// Refresh every temperature-derived field of `particle`.
    pub fn apply(&self, particle: &mut Particle) {
        let temperature = particle.temperature;
        particle.vibration_intensity = self.vibration_at(temperature);
        particle.max_speed = particle.base_max_speed * self.speed_factor_at(temperature);
        particle.phase = particle.phase_at(temperature);
        particle.bubbling =
            particle.phase == MaterialPhase::Liquid && temperature >= self.bubbling_temperature;
        particle.heat_tint = self.tint_at(temperature);
    }

    /// Stability of a bond whose endpoints average `mean_temperature`.
    ///
    /// Full strength at or below 0 °C, down to `MIN_BOND_STABILITY`.
    pub fn bond_stability(&self, mean_temperature: f64) -> f64 {
        let heat = (mean_temperature / 100.0).max(0.0);
        (1.0 - heat * self.bond_weakening).clamp(MIN_BOND_STABILITY, 1.0)
    }
}
