use crate::entities::{Bond, Boundary, HeatSource, Particle, ParticleId};
use crate::sim::world::{Diagnostics, World};
use serde::Serialize;

/// Owned copy of the world after a tick, for rendering and inspection.
///
/// Collections keep insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationState {
    pub tick: u64,
    pub elapsed: f64,
    pub particles: Vec<Particle>,
    pub bonds: Vec<Bond>,
    pub boundaries: Vec<Boundary>,
    pub heat_sources: Vec<HeatSource>,
    pub diagnostics: Diagnostics,
}

impl SimulationState {
    pub fn capture(world: &World) -> Self {
        Self {
            tick: world.tick,
            elapsed: world.elapsed,
            particles: world.particles.to_vec(),
            bonds: world.bonds.to_vec(),
            boundaries: world.boundaries.to_vec(),
            heat_sources: world.heat_sources.to_vec(),
            diagnostics: world.diagnostics,
        }
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.particles.iter().find(|p| p.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
            && self.bonds.is_empty()
            && self.boundaries.is_empty()
            && self.heat_sources.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::entities::ParticleSpec;

    #[test]
    fn test_snapshot_is_a_copy() {
        let mut world = World::new(SimConfig::default());
        let id = world.insert_particle(ParticleSpec::new(10.0, 20.0, 2.0)).expect("particle");
        let snapshot = SimulationState::capture(&world);

        if let Some(p) = world.particles.get_mut(id) {
            p.position.x = 99.0;
        }
        assert_eq!(snapshot.particle(id).map(|p| p.position.x), Some(10.0));
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_to_json_lists_particles() {
        let mut world = World::new(SimConfig::default());
        world
            .insert_particle(ParticleSpec::new(1.0, 2.0, 3.0).with_element("H").with_color("#ff0000"))
            .expect("particle");
        let json = SimulationState::capture(&world).to_json().expect("serializable");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");
        assert_eq!(value["particles"][0]["element_type"], "H");
        assert_eq!(value["particles"][0]["color"], "#ff0000");
        assert_eq!(value["tick"], 0);
    }
}
