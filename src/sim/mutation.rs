use crate::entities::{
    BondId, BondSpec, BoundaryId, BoundarySpec, HeatSourceId, HeatSourceSpec, HeatSourceUpdate,
    ParticleId, ParticleSpec,
};

/// A change requested while a tick was running.
///
/// Specs are validated and ids reserved when the mutation is queued; the
/// change itself lands at the start of the next tick.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    AddParticle(ParticleId, ParticleSpec),
    RemoveParticle(ParticleId),
    AddBond(BondId, BondSpec),
    RemoveBond(BondId),
    AddBoundary(BoundaryId, BoundarySpec),
    RemoveBoundary(BoundaryId),
    AddHeatSource(HeatSourceId, HeatSourceSpec),
    UpdateHeatSource(HeatSourceId, HeatSourceUpdate),
    RemoveHeatSource(HeatSourceId),
}

impl Mutation {
    pub fn label(&self) -> &'static str {
        match self {
            Mutation::AddParticle(..) => "add_particle",
            Mutation::RemoveParticle(_) => "remove_particle",
            Mutation::AddBond(..) => "add_bond",
            Mutation::RemoveBond(_) => "remove_bond",
            Mutation::AddBoundary(..) => "add_boundary",
            Mutation::RemoveBoundary(_) => "remove_boundary",
            Mutation::AddHeatSource(..) => "add_heat_source",
            Mutation::UpdateHeatSource(..) => "update_heat_source",
            Mutation::RemoveHeatSource(_) => "remove_heat_source",
        }
    }
}
