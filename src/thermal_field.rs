/// Scalar temperature field produced by heat sources over the ambient baseline
///
/// Each active source adds `(T_source - ambient) * intensity` at its centre,
/// falling off linearly to nothing at its radius. Overlapping sources add up
/// and the total is clamped to the configured range.

use crate::entities::HeatSource;
use glam::DVec2;

#[derive(Debug, Clone, Copy)]
pub struct ThermalField<'a> {
    pub ambient: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub sources: &'a [HeatSource],
}

impl<'a> ThermalField<'a> {
    pub fn new(ambient: f64, min_temperature: f64, max_temperature: f64, sources: &'a [HeatSource]) -> Self {
        Self {
            ambient,
            min_temperature,
            max_temperature,
            sources,
        }
    }

    /// Field temperature at `point`; ambient for non-finite queries.
    pub fn temperature_at(&self, point: DVec2) -> f64 {
        if !(point.x.is_finite() && point.y.is_finite()) {
            return self.ambient;
        }
        let offset: f64 = self
            .sources
            .iter()
            .map(|source| source.contribution_at(point, self.ambient))
            .sum();
        let temperature = self.ambient + offset;
        if temperature.is_finite() {
            temperature.clamp(self.min_temperature, self.max_temperature)
        } else {
            self.ambient
        }
    }
}
