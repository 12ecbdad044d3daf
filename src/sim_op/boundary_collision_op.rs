/// Boundary collision operation
/// Resolves particle contacts with lab equipment and the world rectangle.
///
/// A container holds the particles that began the tick inside it and is a
/// plain obstacle for everything else. Each pass handles obstacles first, then
/// containers, then the world walls, so the last correction applied is the one
/// that keeps a particle in its vessel.

use crate::collision::{self, Surface};
use crate::entities::{Boundary, BoundaryKind, Particle};
use crate::sim::world::World;
use crate::sim_op::SimOp;
use glam::DVec2;

const DEFAULT_PASSES: usize = 2;

pub struct BoundaryCollisionOp {
    pub passes: usize,
}

impl BoundaryCollisionOp {
    pub fn new() -> Self {
        Self { passes: DEFAULT_PASSES }
    }

    pub fn with_passes(passes: usize) -> Self {
        Self { passes: passes.max(1) }
    }

    fn holds(boundary: &Boundary, start: DVec2) -> bool {
        boundary.kind == BoundaryKind::Container && boundary.shape.contains_point(start)
    }

    /// Returns how many container or wall clamps were applied.
    fn resolve(particle: &mut Particle, start: DVec2, boundaries: &[Boundary], walls: Option<(DVec2, Surface)>) -> u64 {
        let mut corrections = 0;

        for boundary in boundaries.iter().filter(|b| !Self::holds(b, start)) {
            let surface = Surface::new(boundary.restitution, boundary.friction);
            if let Some(contact) =
                collision::push_out(&boundary.shape, particle.position, particle.velocity, particle.radius, surface)
            {
                particle.position = contact.position;
                particle.velocity = contact.velocity;
            }
        }

        for boundary in boundaries.iter().filter(|b| Self::holds(b, start)) {
            let surface = Surface::new(boundary.restitution, boundary.friction);
            if let Some(contact) =
                collision::contain(&boundary.shape, particle.position, particle.velocity, particle.radius, surface)
            {
                particle.position = contact.position;
                particle.velocity = contact.velocity;
                corrections += 1;
            }
        }

        if let Some((size, surface)) = walls {
            if let Some(contact) =
                collision::contain_in_rect(DVec2::ZERO, size, particle.position, particle.velocity, particle.radius, surface)
            {
                particle.position = contact.position;
                particle.velocity = contact.velocity;
                corrections += 1;
            }
        }

        corrections
    }
}

impl Default for BoundaryCollisionOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for BoundaryCollisionOp {
    fn name(&self) -> &str {
        "BoundaryCollision"
    }

    fn update_sim(&mut self, world: &mut World, _dt: f64) {
        let walls = world
            .config
            .world_walls
            .then(|| (world.config.world_size(), Surface::new(world.config.default_restitution, 0.0)));
        if world.boundaries.is_empty() && walls.is_none() {
            return;
        }

        let starts: Vec<DVec2> = world
            .particles
            .iter()
            .map(|p| world.tick_start(p.id).map_or(p.position, |s| s.position))
            .collect();
        let boundaries = world.boundaries.as_slice();
        let mut corrections = 0;

        for (particle, &start) in world.particles.iter_mut().zip(&starts) {
            if particle.fixed || world.dragged.contains(&particle.id) {
                continue;
            }
            for _ in 0..self.passes {
                corrections += Self::resolve(particle, start, boundaries, walls);
            }
        }

        world.diagnostics.containment_corrections += corrections;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::constants::CONTAINMENT_TOLERANCE_RATIO;
    use crate::entities::{BoundaryShape, BoundarySpec, ParticleSpec};
    use more_asserts::{assert_ge, assert_le, assert_lt};

    fn world_with(boundary: BoundarySpec) -> World {
        let mut world = World::new(SimConfig::default());
        world.insert_boundary(boundary).expect("boundary");
        world
    }

    #[test]
    fn test_container_keeps_particle_inside() {
        let mut world = world_with(BoundarySpec::container(BoundaryShape::rectangle(0.0, 0.0, 100.0, 100.0)));
        let id = world.insert_particle(ParticleSpec::new(50.0, 90.0, 5.0)).expect("particle");
        world.capture_tick_start();

        if let Some(p) = world.particles.get_mut(id) {
            p.position.y = 104.0;
            p.velocity.y = 1.0;
        }
        BoundaryCollisionOp::new().update_sim(&mut world, 1.0 / 60.0);

        let p = world.particles.get(id).expect("particle");
        assert_le!(p.position.y, 95.0 + CONTAINMENT_TOLERANCE_RATIO * p.radius);
        assert_lt!(p.velocity.y, 0.0);
        assert_eq!(world.diagnostics.containment_corrections, 1);
    }

    #[test]
    fn test_container_is_obstacle_from_outside() {
        let mut world = world_with(BoundarySpec::container(BoundaryShape::rectangle(100.0, 100.0, 50.0, 50.0)));
        let id = world.insert_particle(ParticleSpec::new(90.0, 120.0, 5.0)).expect("particle");
        world.capture_tick_start();

        if let Some(p) = world.particles.get_mut(id) {
            p.position.x = 97.0;
            p.velocity.x = 1.0;
        }
        BoundaryCollisionOp::new().update_sim(&mut world, 1.0 / 60.0);

        let p = world.particles.get(id).expect("particle");
        assert_le!(p.position.x, 95.0 + 1e-9);
        assert_lt!(p.velocity.x, 0.0);
    }

    #[test]
    fn test_solid_circle_pushes_out() {
        let mut world = world_with(BoundarySpec::solid(BoundaryShape::circle(150.0, 150.0, 20.0)));
        let id = world.insert_particle(ParticleSpec::new(150.0, 120.0, 5.0)).expect("particle");
        world.capture_tick_start();

        if let Some(p) = world.particles.get_mut(id) {
            p.position.y = 130.0;
        }
        BoundaryCollisionOp::new().update_sim(&mut world, 1.0 / 60.0);

        let p = world.particles.get(id).expect("particle");
        assert_ge!(p.position.distance(DVec2::new(150.0, 150.0)), 25.0 - 1e-9);
    }

    #[test]
    fn test_world_walls() {
        let mut world = World::new(SimConfig::default());
        let id = world
            .insert_particle(ParticleSpec::new(10.0, 10.0, 4.0).with_velocity(-1.0, 0.0))
            .expect("particle");
        if let Some(p) = world.particles.get_mut(id) {
            p.position.x = -3.0;
        }
        BoundaryCollisionOp::new().update_sim(&mut world, 1.0 / 60.0);
        let p = world.particles.get(id).expect("particle");
        assert_eq!(p.position.x, 4.0);
        assert_ge!(p.velocity.x, 0.0);
    }

    #[test]
    fn test_without_walls_particles_may_leave() {
        let mut world = World::new(SimConfig {
            world_walls: false,
            ..SimConfig::default()
        });
        let id = world.insert_particle(ParticleSpec::new(-50.0, 10.0, 4.0)).expect("particle");
        BoundaryCollisionOp::new().update_sim(&mut world, 1.0 / 60.0);
        assert_eq!(world.particles.get(id).map(|p| p.position.x), Some(-50.0));
    }

    #[test]
    fn test_dragged_particle_ignores_boundaries() {
        let mut world = world_with(BoundarySpec::solid(BoundaryShape::rectangle(0.0, 0.0, 50.0, 50.0)));
        let id = world.insert_particle(ParticleSpec::new(25.0, 25.0, 2.0)).expect("particle");
        world.dragged.insert(id);
        BoundaryCollisionOp::new().update_sim(&mut world, 1.0 / 60.0);
        assert_eq!(world.particles.get(id).map(|p| p.position), Some(DVec2::new(25.0, 25.0)));
    }
}
