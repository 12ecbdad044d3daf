/// Thermal relaxation operation
/// Moves each particle's temperature toward the field temperature at its position.
/// Conductive, low-heat-capacity materials follow the field faster.

use crate::sim::world::World;
use crate::sim_op::SimOp;
use crate::thermal_field::ThermalField;

pub struct ThermalRelaxationOp;

impl ThermalRelaxationOp {
    pub fn new() -> Self {
        Self
    }

    /// Fraction of the gap to the field temperature closed this tick, in [0, 1].
    pub fn blend_factor(conductivity: f64, rate: f64, dt: f64, relative_specific_heat: f64) -> f64 {
        if relative_specific_heat <= 0.0 {
            return 1.0;
        }
        let alpha = conductivity * rate * dt / relative_specific_heat;
        if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) }
    }
}

impl Default for ThermalRelaxationOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for ThermalRelaxationOp {
    fn name(&self) -> &str {
        "ThermalRelaxation"
    }

    fn update_sim(&mut self, world: &mut World, dt: f64) {
        let config = &world.config;
        let field = ThermalField::new(
            config.ambient_temperature,
            config.min_temperature,
            config.max_temperature,
            world.heat_sources.as_slice(),
        );

        for particle in world.particles.iter_mut() {
            let target = field.temperature_at(particle.position);
            let (conductivity, heat_capacity) = match particle.material {
                Some(material) => (material.thermal_conductivity, material.relative_specific_heat()),
                None => (config.default_conductivity, 1.0),
            };
            let alpha = Self::blend_factor(conductivity, config.thermal_relaxation_rate, dt, heat_capacity);
            particle.temperature += (target - particle.temperature) * alpha;
        }
    }
}
