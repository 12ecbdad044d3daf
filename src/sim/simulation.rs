use crate::config::SimConfig;
use crate::entities::{
    BondId, BondSpec, BoundaryId, BoundarySpec, HeatSourceId, HeatSourceSpec, HeatSourceUpdate,
    Particle, ParticleId, ParticleSpec,
};
use crate::error::{ensure_finite, Result, SimError};
use crate::math_utils::{clamp_speed, is_finite_vec};
use crate::sim::snapshot::SimulationState;
use crate::sim::world::{Diagnostics, World};
use crate::sim_op::{default_ops, SimOp, SimOpHandle};
use glam::DVec2;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct OpTiming {
    pub op_name: String,
    pub init_time: Duration,
    pub total_update_time: Duration,
    pub update_call_count: u32,
}

impl OpTiming {
    pub fn new(op_name: String) -> Self {
        Self {
            op_name,
            init_time: Duration::ZERO,
            total_update_time: Duration::ZERO,
            update_call_count: 0,
        }
    }

    pub fn avg_update_time(&self) -> Duration {
        if self.update_call_count > 0 {
            self.total_update_time / self.update_call_count
        } else {
            Duration::ZERO
        }
    }

    pub fn total_time(&self) -> Duration {
        self.init_time + self.total_update_time
    }
}

/// Construction parameters. `ops` run after the built-in pipeline and before
/// the final sanity pass.
pub struct SimProps {
    pub config: SimConfig,
    pub ops: Vec<SimOpHandle>,
}

impl SimProps {
    pub fn new(config: SimConfig) -> Self {
        Self { config, ops: Vec::new() }
    }

    pub fn with_op(mut self, op: Box<dyn SimOp>) -> Self {
        self.ops.push(SimOpHandle::new(op));
        self
    }
}

/// The simulation controller.
///
/// Owns the [`World`] and the ordered operator pipeline. Mutation methods
/// called between ticks take effect immediately; operators that need to
/// mutate during a tick use the `World::defer_*` queue, which is drained at
/// the start of the next tick.
pub struct Simulation {
    world: World,
    ops: Vec<Box<dyn SimOp>>,
    op_timings: Vec<OpTiming>,
    running: bool,
    initialized: bool,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Simulation> {
        Self::with_props(SimProps::new(config))
    }

    pub fn with_props(props: SimProps) -> Result<Simulation> {
        props.config.validate()?;
        let mut sim = Self::build(props.config);
        for handle in props.ops {
            sim.add_op(handle.op);
        }
        Ok(sim)
    }

    fn build(config: SimConfig) -> Simulation {
        let ops = default_ops();
        let op_timings = ops.iter().map(|op| OpTiming::new(op.name().to_string())).collect();
        Simulation {
            world: World::new(config),
            ops,
            op_timings,
            running: true,
            initialized: false,
        }
    }

    /// Insert a custom operator just ahead of the final sanity pass.
    pub fn add_op(&mut self, op: Box<dyn SimOp>) {
        let slot = self.ops.len().saturating_sub(1);
        self.op_timings.insert(slot, OpTiming::new(op.name().to_string()));
        self.ops.insert(slot, op);
        self.initialized = false;
    }

    pub fn op_names(&self) -> Vec<&str> {
        self.ops.iter().map(|op| op.name()).collect()
    }

    pub fn config(&self) -> &SimConfig {
        &self.world.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    // ---- particles ----

    pub fn add_particle(&mut self, spec: ParticleSpec) -> Result<ParticleId> {
        let id = self.world.insert_particle(spec)?;
        debug!(particle = %id, "added particle");
        Ok(id)
    }

    /// `false` when the id is unknown. Bonds to the particle go inert and are
    /// pruned on the next tick.
    pub fn remove_particle(&mut self, id: ParticleId) -> bool {
        self.world.remove_particle(id)
    }

    pub fn particle(&self, id: ParticleId) -> Option<&Particle> {
        self.world.particles.get(id)
    }

    /// Topmost (most recently added) particle covering the point.
    pub fn particle_at(&self, x: f64, y: f64) -> Option<ParticleId> {
        let point = DVec2::new(x, y);
        if !is_finite_vec(point) {
            return None;
        }
        self.world
            .particles
            .iter()
            .rev()
            .find(|p| p.contains_point(point))
            .map(|p| p.id)
    }

    pub fn particle_count(&self) -> usize {
        self.world.particles.len()
    }

    // ---- bonds ----

    pub fn add_bond(&mut self, spec: BondSpec) -> Result<BondId> {
        let id = self.world.insert_bond(spec)?;
        debug!(bond = %id, p1 = %spec.p1, p2 = %spec.p2, "added bond");
        Ok(id)
    }

    pub fn remove_bond(&mut self, id: BondId) -> bool {
        self.world.bonds.remove(id).is_some()
    }

    pub fn bond_count(&self) -> usize {
        self.world.bonds.len()
    }

    // ---- boundaries ----

    pub fn add_boundary(&mut self, spec: BoundarySpec) -> Result<BoundaryId> {
        let id = self.world.insert_boundary(spec)?;
        debug!(boundary = %id, kind = ?spec.kind, "added boundary");
        Ok(id)
    }

    pub fn remove_boundary(&mut self, id: BoundaryId) -> bool {
        self.world.boundaries.remove(id).is_some()
    }

    pub fn boundary_count(&self) -> usize {
        self.world.boundaries.len()
    }

    // ---- heat sources ----

    pub fn add_heat_source(&mut self, spec: HeatSourceSpec) -> Result<HeatSourceId> {
        let id = self.world.insert_heat_source(spec)?;
        debug!(heat_source = %id, temperature = spec.temperature, "added heat source");
        Ok(id)
    }

    /// `Err` for an invalid update, `Ok(false)` for an unknown id.
    pub fn update_heat_source(&mut self, id: HeatSourceId, update: HeatSourceUpdate) -> Result<bool> {
        self.world.update_heat_source(id, &update)
    }

    pub fn remove_heat_source(&mut self, id: HeatSourceId) -> bool {
        self.world.heat_sources.remove(id).is_some()
    }

    pub fn heat_source_count(&self) -> usize {
        self.world.heat_sources.len()
    }

    // ---- environment ----

    pub fn temperature_at(&self, x: f64, y: f64) -> f64 {
        self.world.temperature_at(DVec2::new(x, y))
    }

    pub fn set_ambient_temperature(&mut self, temperature: f64) -> Result<()> {
        ensure_finite("ambient_temperature", temperature)?;
        let config = &self.world.config;
        if temperature < config.min_temperature || temperature > config.max_temperature {
            return Err(SimError::OutOfRange {
                field: "ambient_temperature",
                value: temperature,
                expected: "within [min_temperature, max_temperature]",
            });
        }
        self.world.config.ambient_temperature = temperature;
        Ok(())
    }

    pub fn set_gravity(&mut self, x: f64, y: f64) -> Result<()> {
        ensure_finite("gravity.x", x)?;
        ensure_finite("gravity.y", y)?;
        self.world.config.gravity = DVec2::new(x, y);
        Ok(())
    }

    /// Switch particle-particle contacts on or off between ticks.
    pub fn set_particle_collisions(&mut self, enabled: bool) {
        self.world.config.particle_collisions = enabled;
    }

    pub fn set_bond_iterations(&mut self, iterations: u32) -> Result<()> {
        if iterations == 0 {
            return Err(SimError::OutOfRange {
                field: "bond_iterations",
                value: 0.0,
                expected: ">= 1",
            });
        }
        self.world.config.bond_iterations = iterations;
        Ok(())
    }

    // ---- running ----

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn resume(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tick_count(&self) -> u64 {
        self.world.tick
    }

    pub fn elapsed(&self) -> f64 {
        self.world.elapsed
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.world.diagnostics
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// A non-finite or non-positive `dt` does nothing. Queued mutations are
    /// applied first, even while paused; `dt` is clamped to `max_dt`.
    pub fn tick(&mut self, dt: f64) {
        if !dt.is_finite() || dt <= 0.0 {
            debug!(dt, "ignoring tick");
            return;
        }
        self.world.apply_pending();
        if !self.running {
            return;
        }

        let max_dt = self.world.config.max_dt;
        let dt = if dt > max_dt {
            self.world.diagnostics.clamped_frames += 1;
            max_dt
        } else {
            dt
        };

        if !self.initialized {
            self.simulate_init();
        }
        self.world.capture_tick_start();
        self.simulate_step(dt);

        self.world.tick += 1;
        self.world.elapsed += dt;
    }

    fn simulate_init(&mut self) {
        for (i, op) in self.ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.init_sim(&mut self.world);
            self.op_timings[i].init_time += start.elapsed();
        }
        self.initialized = true;
    }

    fn simulate_step(&mut self, dt: f64) {
        for (i, op) in self.ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.update_sim(&mut self.world, dt);
            self.op_timings[i].total_update_time += start.elapsed();
            self.op_timings[i].update_call_count += 1;
        }
    }

    /// Clear every collection, drag state and queued mutation. Configuration,
    /// the operator pipeline and the id counter survive; the RNG is reseeded.
    pub fn reset(&mut self) {
        self.world.reset();
        for timing in &mut self.op_timings {
            *timing = OpTiming::new(std::mem::take(&mut timing.op_name));
        }
        self.initialized = false;
        debug!("simulation reset");
    }

    pub fn snapshot(&self) -> SimulationState {
        SimulationState::capture(&self.world)
    }

    // ---- drag ----

    /// Take a particle out of integration. Its velocity is zeroed.
    pub fn begin_drag(&mut self, id: ParticleId) -> bool {
        match self.world.particles.get_mut(id) {
            Some(particle) => {
                particle.velocity = DVec2::ZERO;
                self.world.dragged.insert(id);
                true
            }
            None => false,
        }
    }

    pub fn update_drag(&mut self, id: ParticleId, x: f64, y: f64) -> bool {
        let position = DVec2::new(x, y);
        if !self.world.is_dragged(id) || !is_finite_vec(position) {
            return false;
        }
        match self.world.particles.get_mut(id) {
            Some(particle) => {
                particle.position = position;
                particle.velocity = DVec2::ZERO;
                true
            }
            None => false,
        }
    }

    /// Release a dragged particle with a throw velocity in world units per
    /// second. The velocity is clamped to the particle's speed cap and a
    /// non-finite velocity releases it at rest.
    pub fn end_drag(&mut self, id: ParticleId, vx: f64, vy: f64) -> bool {
        if !self.world.dragged.remove(&id) {
            return false;
        }
        let scale = self.world.config.motion_scale;
        match self.world.particles.get_mut(id) {
            Some(particle) => {
                let throw = DVec2::new(vx, vy);
                let velocity = if is_finite_vec(throw) { throw / scale } else { DVec2::ZERO };
                particle.velocity = clamp_speed(velocity, particle.max_speed).0;
                true
            }
            None => false,
        }
    }

    pub fn op_timings(&self) -> &[OpTiming] {
        &self.op_timings
    }

    /// Log the per-operator timing table through `tracing`.
    pub fn timing_report(&self) {
        let total_time: Duration = self.op_timings.iter().map(OpTiming::total_time).sum();
        info!(
            ticks = self.world.tick,
            elapsed_s = self.world.elapsed,
            total_ms = total_time.as_secs_f64() * 1000.0,
            "simulation timing report"
        );
        for timing in &self.op_timings {
            let share = if total_time > Duration::ZERO {
                timing.total_time().as_secs_f64() / total_time.as_secs_f64() * 100.0
            } else {
                0.0
            };
            info!(
                op = %timing.op_name,
                total_ms = timing.total_time().as_secs_f64() * 1000.0,
                avg_update_us = timing.avg_update_time().as_secs_f64() * 1e6,
                init_us = timing.init_time.as_secs_f64() * 1e6,
                calls = timing.update_call_count,
                share_pct = share,
                "op timing"
            );
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::build(SimConfig::default())
    }
}
