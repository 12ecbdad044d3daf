/// Sanity operation
/// Last in the pipeline. A particle left with a non-finite position, velocity or
/// temperature is put back where it started the tick and stopped; the event is
/// counted and logged rather than surfaced to the caller.

use crate::math_utils::is_finite_vec;
use crate::sim::world::World;
use crate::sim_op::SimOp;
use glam::DVec2;
use tracing::warn;

pub struct SanityOp;

impl SanityOp {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SanityOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for SanityOp {
    fn name(&self) -> &str {
        "Sanity"
    }

    fn update_sim(&mut self, world: &mut World, _dt: f64) {
        let ambient = world.config.ambient_temperature;
        let centre = world.config.world_size() * 0.5;
        let mut recoveries = Vec::new();

        for (slot, particle) in world.particles.iter().enumerate() {
            if is_finite_vec(particle.position) && is_finite_vec(particle.velocity) && particle.temperature.is_finite() {
                continue;
            }
            let start = world.tick_start(particle.id);
            let position = if is_finite_vec(particle.position) {
                particle.position
            } else {
                start.map(|s| s.position).filter(|p| is_finite_vec(*p)).unwrap_or(centre)
            };
            let temperature = start
                .map(|s| s.temperature)
                .filter(|t| t.is_finite())
                .unwrap_or(ambient);
            recoveries.push((slot, position, temperature));
        }

        if recoveries.is_empty() {
            return;
        }
        let particles = world.particles.as_mut_slice();
        for (slot, position, temperature) in recoveries {
            let particle = &mut particles[slot];
            warn!(
                particle = %particle.id,
                tick = world.tick,
                x = particle.position.x,
                y = particle.position.y,
                temperature = particle.temperature,
                "non-finite particle state, restoring start of tick"
            );
            particle.position = position;
            particle.velocity = DVec2::ZERO;
            if !particle.temperature.is_finite() {
                particle.temperature = temperature;
            }
            world.diagnostics.nan_recoveries += 1;
        }
    }
}
