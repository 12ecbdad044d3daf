pub mod mutation;
pub mod simulation;
pub mod snapshot;
pub mod world;

pub use mutation::Mutation;
pub use simulation::{OpTiming, SimProps, Simulation};
pub use snapshot::SimulationState;
pub use world::{Diagnostics, TickStart, World};
