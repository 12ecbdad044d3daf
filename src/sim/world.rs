//! Mutable simulation state shared by the tick operators.
//!
//! `World` owns the four entity collections, the jitter RNG, drag state and
//! diagnostics. Operators receive `&mut World`; anything they want to add or
//! remove during a tick goes through the `defer_*` methods so collections do
//! not change shape under an in-flight pass.

use crate::config::SimConfig;
use crate::entities::{
    Bond, BondId, BondSpec, Boundary, BoundaryId, BoundarySpec, EntityStore, HeatSource,
    HeatSourceId, HeatSourceSpec, HeatSourceUpdate, IdAllocator, Particle, ParticleId,
    ParticleSpec,
};
use crate::error::{Result, SimError};
use crate::math_utils::clamp_speed;
use crate::sim::mutation::Mutation;
use crate::thermal_field::ThermalField;
use glam::DVec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Counters for problems the integrator corrected instead of failing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Diagnostics {
    /// Ticks whose `dt` exceeded `max_dt`
    pub clamped_frames: u64,
    pub nan_recoveries: u64,
    /// Container or world-wall clamps
    pub containment_corrections: u64,
    pub pruned_bonds: u64,
    pub deferred_applied: u64,
    /// Deferred mutations that no longer applied (e.g. a bond to a removed particle)
    pub deferred_dropped: u64,
}

/// Particle state captured before the operators run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickStart {
    pub position: DVec2,
    pub temperature: f64,
}

pub struct World {
    pub config: SimConfig,
    pub particles: EntityStore<Particle>,
    pub bonds: EntityStore<Bond>,
    pub boundaries: EntityStore<Boundary>,
    pub heat_sources: EntityStore<HeatSource>,
    pub rng: StdRng,
    pub dragged: HashSet<ParticleId>,
    pub diagnostics: Diagnostics,
    pub tick: u64,
    pub elapsed: f64,
    ids: IdAllocator,
    pending: Vec<Mutation>,
    tick_start: HashMap<ParticleId, TickStart>,
}

impl World {
    pub fn new(config: SimConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            config,
            particles: EntityStore::new(),
            bonds: EntityStore::new(),
            boundaries: EntityStore::new(),
            heat_sources: EntityStore::new(),
            rng,
            dragged: HashSet::new(),
            diagnostics: Diagnostics::default(),
            tick: 0,
            elapsed: 0.0,
            ids: IdAllocator::new(),
            pending: Vec::new(),
            tick_start: HashMap::new(),
        }
    }

    pub fn thermal_field(&self) -> ThermalField<'_> {
        ThermalField::new(
            self.config.ambient_temperature,
            self.config.min_temperature,
            self.config.max_temperature,
            self.heat_sources.as_slice(),
        )
    }

    pub fn temperature_at(&self, point: DVec2) -> f64 {
        self.thermal_field().temperature_at(point)
    }

    pub fn is_dragged(&self, id: ParticleId) -> bool {
        self.dragged.contains(&id)
    }

    pub fn tick_start(&self, id: ParticleId) -> Option<&TickStart> {
        self.tick_start.get(&id)
    }

    pub(crate) fn capture_tick_start(&mut self) {
        self.tick_start.clear();
        for p in self.particles.iter() {
            self.tick_start.insert(
                p.id,
                TickStart {
                    position: p.position,
                    temperature: p.temperature,
                },
            );
        }
    }

    // ---- immediate insertion, used between ticks ----

    pub fn insert_particle(&mut self, spec: ParticleSpec) -> Result<ParticleId> {
        spec.validate()?;
        let id = self.ids.particle();
        self.place_particle(id, spec);
        Ok(id)
    }

    pub fn insert_bond(&mut self, spec: BondSpec) -> Result<BondId> {
        spec.validate()?;
        self.check_endpoints(&spec)?;
        let id = self.ids.bond();
        self.place_bond(id, spec)?;
        Ok(id)
    }

    pub fn insert_boundary(&mut self, spec: BoundarySpec) -> Result<BoundaryId> {
        spec.validate()?;
        let id = self.ids.boundary();
        self.place_boundary(id, spec);
        Ok(id)
    }

    pub fn insert_heat_source(&mut self, spec: HeatSourceSpec) -> Result<HeatSourceId> {
        spec.validate()?;
        let id = self.ids.heat_source();
        self.place_heat_source(id, spec);
        Ok(id)
    }

    pub fn remove_particle(&mut self, id: ParticleId) -> bool {
        self.dragged.remove(&id);
        self.particles.remove(id).is_some()
    }

    /// `Ok(false)` for an unknown id; an invalid update changes nothing.
    pub fn update_heat_source(&mut self, id: HeatSourceId, update: &HeatSourceUpdate) -> Result<bool> {
        update.validate()?;
        match self.heat_sources.get_mut(id) {
            Some(source) => {
                source.apply(update)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ---- deferred mutation, used from inside a tick ----

    pub fn defer_add_particle(&mut self, spec: ParticleSpec) -> Result<ParticleId> {
        spec.validate()?;
        let id = self.ids.particle();
        self.pending.push(Mutation::AddParticle(id, spec));
        Ok(id)
    }

    pub fn defer_remove_particle(&mut self, id: ParticleId) {
        self.pending.push(Mutation::RemoveParticle(id));
    }

    /// Endpoints are checked when the bond is applied, since either may be
    /// queued in the same batch.
    pub fn defer_add_bond(&mut self, spec: BondSpec) -> Result<BondId> {
        spec.validate()?;
        let id = self.ids.bond();
        self.pending.push(Mutation::AddBond(id, spec));
        Ok(id)
    }

    pub fn defer_remove_bond(&mut self, id: BondId) {
        self.pending.push(Mutation::RemoveBond(id));
    }

    pub fn defer_add_boundary(&mut self, spec: BoundarySpec) -> Result<BoundaryId> {
        spec.validate()?;
        let id = self.ids.boundary();
        self.pending.push(Mutation::AddBoundary(id, spec));
        Ok(id)
    }

    pub fn defer_remove_boundary(&mut self, id: BoundaryId) {
        self.pending.push(Mutation::RemoveBoundary(id));
    }

    pub fn defer_add_heat_source(&mut self, spec: HeatSourceSpec) -> Result<HeatSourceId> {
        spec.validate()?;
        let id = self.ids.heat_source();
        self.pending.push(Mutation::AddHeatSource(id, spec));
        Ok(id)
    }

    pub fn defer_update_heat_source(&mut self, id: HeatSourceId, update: HeatSourceUpdate) -> Result<()> {
        update.validate()?;
        self.pending.push(Mutation::UpdateHeatSource(id, update));
        Ok(())
    }

    pub fn defer_remove_heat_source(&mut self, id: HeatSourceId) {
        self.pending.push(Mutation::RemoveHeatSource(id));
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Apply queued mutations in the order they were requested.
    ///
    /// Returns how many took effect.
    pub fn apply_pending(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let queued = std::mem::take(&mut self.pending);
        let mut applied = 0;
        for mutation in queued {
            let label = mutation.label();
            if self.apply_mutation(mutation) {
                applied += 1;
            } else {
                self.diagnostics.deferred_dropped += 1;
                debug!(mutation = label, "deferred mutation had no effect");
            }
        }
        self.diagnostics.deferred_applied += applied as u64;
        applied
    }

    fn apply_mutation(&mut self, mutation: Mutation) -> bool {
        match mutation {
            Mutation::AddParticle(id, spec) => {
                self.place_particle(id, spec);
                true
            }
            Mutation::RemoveParticle(id) => self.remove_particle(id),
            Mutation::AddBond(id, spec) => match self.place_bond(id, spec) {
                Ok(()) => true,
                Err(e) => {
                    warn!(bond = %id, error = %e, "dropping deferred bond");
                    false
                }
            },
            Mutation::RemoveBond(id) => self.bonds.remove(id).is_some(),
            Mutation::AddBoundary(id, spec) => {
                self.place_boundary(id, spec);
                true
            }
            Mutation::RemoveBoundary(id) => self.boundaries.remove(id).is_some(),
            Mutation::AddHeatSource(id, spec) => {
                self.place_heat_source(id, spec);
                true
            }
            Mutation::UpdateHeatSource(id, update) => {
                matches!(self.update_heat_source(id, &update), Ok(true))
            }
            Mutation::RemoveHeatSource(id) => self.heat_sources.remove(id).is_some(),
        }
    }

    fn check_endpoints(&self, spec: &BondSpec) -> Result<()> {
        for endpoint in [spec.p1, spec.p2] {
            if !self.particles.contains(endpoint) {
                return Err(SimError::UnknownParticle(endpoint));
            }
        }
        Ok(())
    }

    fn place_particle(&mut self, id: ParticleId, spec: ParticleSpec) {
        let mut particle = Particle::from_spec(id, spec, self.config.ambient_temperature);
        self.config.bands.apply(&mut particle);
        // a fresh particle starts within its thermal speed cap
        let (velocity, _) = clamp_speed(particle.velocity, particle.max_speed);
        particle.velocity = velocity;
        self.particles.insert(particle);
    }

    fn place_bond(&mut self, id: BondId, spec: BondSpec) -> Result<()> {
        self.check_endpoints(&spec)?;
        let rest_length = match spec.rest_length {
            Some(length) => length,
            None => match (self.particles.get(spec.p1), self.particles.get(spec.p2)) {
                (Some(a), Some(b)) => a.position.distance(b.position),
                _ => return Err(SimError::UnknownParticle(spec.p1)),
            },
        };
        self.bonds.insert(Bond::new(id, spec.p1, spec.p2, rest_length, spec.kind));
        Ok(())
    }

    fn place_boundary(&mut self, id: BoundaryId, spec: BoundarySpec) {
        let boundary = Boundary::from_spec(id, spec, self.config.default_restitution);
        self.boundaries.insert(boundary);
    }

    fn place_heat_source(&mut self, id: HeatSourceId, spec: HeatSourceSpec) {
        self.heat_sources.insert(HeatSource::from_spec(id, spec));
    }

    /// Empty the world. Configuration and the id counter survive.
    pub fn reset(&mut self) {
        self.particles.clear();
        self.bonds.clear();
        self.boundaries.clear();
        self.heat_sources.clear();
        self.dragged.clear();
        self.pending.clear();
        self.tick_start.clear();
        self.diagnostics = Diagnostics::default();
        self.tick = 0;
        self.elapsed = 0.0;
        self.rng = StdRng::seed_from_u64(self.config.seed);
    }
}
