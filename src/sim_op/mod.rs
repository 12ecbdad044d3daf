// Per-tick operators, run in pipeline order by the Simulation
pub mod bond_prune_op;
pub mod boundary_collision_op;
pub mod integration_op;
pub mod particle_collision_op;
pub mod phase_op;
pub mod sanity_op;
pub mod thermal_relaxation_op;

pub use bond_prune_op::BondPruneOp;
pub use boundary_collision_op::BoundaryCollisionOp;
pub use integration_op::ForceIntegrationOp;
pub use particle_collision_op::ParticleCollisionOp;
pub use phase_op::PhaseDerivationOp;
pub use sanity_op::SanityOp;
pub use thermal_relaxation_op::ThermalRelaxationOp;

use crate::sim::world::World;

pub trait SimOp {
    /// The name of this operator (for identification and timing)
    fn name(&self) -> &str;

    /// Called before the first tick, and again after a reset
    fn init_sim(&mut self, _world: &mut World) {}

    /// Called every integrated tick with the clamped `dt` in seconds
    fn update_sim(&mut self, world: &mut World, dt: f64);
}

pub struct SimOpHandle {
    pub op: Box<dyn SimOp>,
}

impl SimOpHandle {
    pub fn new(op: Box<dyn SimOp>) -> Self {
        SimOpHandle { op }
    }
}

/// The built-in pipeline in execution order.
pub fn default_ops() -> Vec<Box<dyn SimOp>> {
    vec![
        Box::new(ThermalRelaxationOp::new()),
        Box::new(PhaseDerivationOp::new()),
        Box::new(ForceIntegrationOp::new()),
        Box::new(ParticleCollisionOp::new()),
        Box::new(BoundaryCollisionOp::new()),
        Box::new(BondPruneOp::new()),
        Box::new(SanityOp::new()),
    ]
}
