pub mod collision;
pub mod config;
pub mod constants;
pub mod entities;
pub mod error;
pub mod material;
pub mod math_utils;
pub mod phase_transition;
pub mod sim;
pub mod sim_op;
pub mod thermal_field;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use sim::{Simulation, SimulationState};
