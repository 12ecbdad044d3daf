/// Phase derivation operation
/// Refreshes vibration, speed cap, phase, bubbling and tint from each particle's
/// temperature, then weakens bonds whose endpoints are hot.

use crate::sim::world::World;
use crate::sim_op::SimOp;

pub struct PhaseDerivationOp;

impl PhaseDerivationOp {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PhaseDerivationOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for PhaseDerivationOp {
    fn name(&self) -> &str {
        "PhaseDerivation"
    }

    fn update_sim(&mut self, world: &mut World, _dt: f64) {
        let bands = &world.config.bands;
        for particle in world.particles.iter_mut() {
            bands.apply(particle);
        }

        let particles = &world.particles;
        for bond in world.bonds.iter_mut() {
            if let (Some(a), Some(b)) = (particles.get(bond.p1), particles.get(bond.p2)) {
                bond.stability = bands.bond_stability((a.temperature + b.temperature) * 0.5);
            }
        }
    }
}
