/// Bond pruning operation
/// Drops bonds whose endpoints no longer exist.

use crate::sim::world::World;
use crate::sim_op::SimOp;
use tracing::debug;

pub struct BondPruneOp;

impl BondPruneOp {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BondPruneOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for BondPruneOp {
    fn name(&self) -> &str {
        "BondPrune"
    }

    fn update_sim(&mut self, world: &mut World, _dt: f64) {
        let particles = &world.particles;
        let dropped = world
            .bonds
            .retain(|bond| particles.contains(bond.p1) && particles.contains(bond.p2));
        if dropped > 0 {
            debug!(dropped, tick = world.tick, "pruned orphaned bonds");
            world.diagnostics.pruned_bonds += dropped as u64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::entities::{BondSpec, ParticleSpec};

    #[test]
    fn test_orphaned_bond_removed() {
        let mut world = World::new(SimConfig::default());
        let a = world.insert_particle(ParticleSpec::new(0.0, 0.0, 1.0)).expect("a");
        let b = world.insert_particle(ParticleSpec::new(5.0, 0.0, 1.0)).expect("b");
        let c = world.insert_particle(ParticleSpec::new(10.0, 0.0, 1.0)).expect("c");
        let ab = world.insert_bond(BondSpec::new(a, b)).expect("ab");
        let bc = world.insert_bond(BondSpec::new(b, c)).expect("bc");
        world.remove_particle(c);

        BondPruneOp::new().update_sim(&mut world, 1.0 / 60.0);
        assert!(world.bonds.contains(ab));
        assert!(!world.bonds.contains(bc));
        assert_eq!(world.diagnostics.pruned_bonds, 1);
    }
}
