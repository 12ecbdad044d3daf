/// Force integration operation
/// Semi-implicit Euler step: gravity, bond springs, thermal jitter and damping
/// update velocity, the speed cap is enforced, then positions advance.
/// Fixed and dragged particles are left where they are.

use crate::math_utils::clamp_speed;
use crate::sim::world::World;
use crate::sim_op::SimOp;
use glam::DVec2;
use rand::Rng;

/// Slot indices and coefficients of a bond resolved for one tick
#[derive(Debug, Clone, Copy)]
struct Link {
    a: usize,
    b: usize,
    rest_length: f64,
    stiffness: f64,
}

pub struct ForceIntegrationOp;

impl ForceIntegrationOp {
    pub fn new() -> Self {
        Self
    }

    fn resolve_links(world: &World) -> Vec<Link> {
        let base = world.config.bond_stiffness;
        world
            .bonds
            .iter()
            .filter_map(|bond| {
                let a = world.particles.position_of(bond.p1)?;
                let b = world.particles.position_of(bond.p2)?;
                Some(Link {
                    a,
                    b,
                    rest_length: bond.rest_length,
                    stiffness: base * bond.kind.stiffness_multiplier() * bond.stability,
                })
            })
            .collect()
    }

    /// One spring pass. Each endpoint takes the share of the impulse the other
    /// endpoint's mass implies; a pinned endpoint passes its share to the other.
    fn apply_springs(world: &mut World, links: &[Link], pinned: &[bool], dt: f64) {
        let damping = world.config.bond_damping;
        let particles = world.particles.as_mut_slice();

        for link in links {
            let (a, b) = (link.a, link.b);
            if a == b || (pinned[a] && pinned[b]) {
                continue;
            }
            let delta = particles[b].position - particles[a].position;
            let distance = delta.length();
            if distance < f64::EPSILON {
                continue;
            }
            let axis = delta / distance;
            let separating = (particles[b].velocity - particles[a].velocity).dot(axis);
            let pull = (link.stiffness * (distance - link.rest_length) + damping * separating) * dt;

            let (share_a, share_b) = if pinned[a] {
                (0.0, 1.0)
            } else if pinned[b] {
                (1.0, 0.0)
            } else {
                let total = particles[a].mass + particles[b].mass;
                (particles[b].mass / total, particles[a].mass / total)
            };
            particles[a].velocity += axis * (pull * share_a);
            particles[b].velocity -= axis * (pull * share_b);
        }
    }
}

impl Default for ForceIntegrationOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for ForceIntegrationOp {
    fn name(&self) -> &str {
        "ForceIntegration"
    }

    fn update_sim(&mut self, world: &mut World, dt: f64) {
        let pinned: Vec<bool> = world
            .particles
            .iter()
            .map(|p| p.fixed || world.dragged.contains(&p.id))
            .collect();

        let gravity = world.config.gravity;
        for (particle, &is_pinned) in world.particles.iter_mut().zip(&pinned) {
            if !is_pinned {
                particle.velocity += gravity * dt;
            }
        }

        let links = Self::resolve_links(world);
        if !links.is_empty() {
            let iterations = world.config.bond_iterations.max(1);
            let pass_dt = dt / f64::from(iterations);
            for _ in 0..iterations {
                Self::apply_springs(world, &links, &pinned, pass_dt);
            }
        }

        let jitter_strength = world.config.jitter_strength;
        let keep = (1.0 - world.config.damping * dt).max(0.0);
        let step = dt * world.config.motion_scale;

        for (particle, &is_pinned) in world.particles.iter_mut().zip(&pinned) {
            if is_pinned {
                if particle.fixed {
                    particle.velocity = DVec2::ZERO;
                }
                continue;
            }
            let amplitude = particle.vibration_intensity * jitter_strength * dt;
            if amplitude > 0.0 {
                let kick = DVec2::new(world.rng.random_range(-1.0..1.0), world.rng.random_range(-1.0..1.0));
                particle.velocity += kick * amplitude;
            }
            particle.velocity *= keep;
            particle.velocity = clamp_speed(particle.velocity, particle.max_speed).0;
            particle.position += particle.velocity * step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::entities::{BondSpec, ParticleSpec};
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_gt, assert_le, assert_lt};

    fn quiet_config() -> SimConfig {
        SimConfig {
            jitter_strength: 0.0,
            damping: 0.0,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_gravity_accelerates_and_moves() {
        let mut world = World::new(SimConfig {
            gravity: DVec2::new(0.0, 6.0),
            ..quiet_config()
        });
        let id = world.insert_particle(ParticleSpec::new(50.0, 50.0, 2.0)).expect("particle");
        ForceIntegrationOp::new().update_sim(&mut world, 0.1);

        let p = world.particles.get(id).expect("particle");
        assert_abs_diff_eq!(p.velocity.y, 0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(p.position.y, 56.0, epsilon = 1e-9);
    }

    #[test]
    fn test_speed_is_capped() {
        let mut world = World::new(SimConfig {
            gravity: DVec2::new(0.0, 1000.0),
            ..SimConfig::default()
        });
        let id = world
            .insert_particle(ParticleSpec::new(50.0, 50.0, 2.0).with_max_speed(1.5))
            .expect("particle");
        let mut op = ForceIntegrationOp::new();
        for _ in 0..20 {
            op.update_sim(&mut world, 1.0 / 60.0);
            let p = world.particles.get(id).expect("particle");
            assert_le!(p.speed(), p.max_speed + 1e-12);
        }
    }

    #[test]
    fn test_fixed_and_dragged_particles_do_not_move() {
        let mut world = World::new(SimConfig {
            gravity: DVec2::new(0.0, 50.0),
            ..SimConfig::default()
        });
        let fixed = world.insert_particle(ParticleSpec::new(10.0, 10.0, 2.0).fixed()).expect("fixed");
        let held = world.insert_particle(ParticleSpec::new(20.0, 10.0, 2.0)).expect("held");
        world.dragged.insert(held);

        let mut op = ForceIntegrationOp::new();
        for _ in 0..10 {
            op.update_sim(&mut world, 1.0 / 60.0);
        }
        assert_eq!(world.particles.get(fixed).map(|p| p.position), Some(DVec2::new(10.0, 10.0)));
        assert_eq!(world.particles.get(held).map(|p| p.position), Some(DVec2::new(20.0, 10.0)));
    }

    #[test]
    fn test_stretched_bond_pulls_together() {
        let mut world = World::new(quiet_config());
        let a = world.insert_particle(ParticleSpec::new(100.0, 100.0, 2.0)).expect("a");
        let b = world.insert_particle(ParticleSpec::new(140.0, 100.0, 2.0)).expect("b");
        world.insert_bond(BondSpec::new(a, b).with_rest_length(20.0)).expect("bond");

        ForceIntegrationOp::new().update_sim(&mut world, 1.0 / 60.0);
        let va = world.particles.get(a).map(|p| p.velocity.x).unwrap_or_default();
        let vb = world.particles.get(b).map(|p| p.velocity.x).unwrap_or_default();
        assert_gt!(va, 0.0);
        assert_lt!(vb, 0.0);
        assert_abs_diff_eq!(va, -vb, epsilon = 1e-12);
    }

    #[test]
    fn test_heavier_endpoint_moves_less() {
        let mut world = World::new(quiet_config());
        let light = world.insert_particle(ParticleSpec::new(100.0, 100.0, 2.0).with_mass(1.0)).expect("light");
        let heavy = world.insert_particle(ParticleSpec::new(140.0, 100.0, 2.0).with_mass(9.0)).expect("heavy");
        world.insert_bond(BondSpec::new(light, heavy).with_rest_length(20.0)).expect("bond");

        ForceIntegrationOp::new().update_sim(&mut world, 1.0 / 60.0);
        let v_light = world.particles.get(light).map(|p| p.velocity.x).unwrap_or_default();
        let v_heavy = world.particles.get(heavy).map(|p| p.velocity.x).unwrap_or_default();
        assert_abs_diff_eq!(v_light, -9.0 * v_heavy, epsilon = 1e-12);
    }

    #[test]
    fn test_bond_to_fixed_anchor() {
        let mut world = World::new(quiet_config());
        let anchor = world.insert_particle(ParticleSpec::new(100.0, 100.0, 2.0).fixed()).expect("anchor");
        let bob = world.insert_particle(ParticleSpec::new(100.0, 140.0, 2.0)).expect("bob");
        world.insert_bond(BondSpec::new(anchor, bob).with_rest_length(20.0)).expect("bond");

        ForceIntegrationOp::new().update_sim(&mut world, 1.0 / 60.0);
        assert_eq!(world.particles.get(anchor).map(|p| p.position), Some(DVec2::new(100.0, 100.0)));
        assert_lt!(world.particles.get(bob).map(|p| p.velocity.y).unwrap_or_default(), 0.0);
    }

    #[test]
    fn test_jitter_is_reproducible_for_a_seed() {
        let run = || {
            let mut world = World::new(SimConfig::default());
            let id = world
                .insert_particle(ParticleSpec::new(50.0, 50.0, 2.0).with_temperature(90.0))
                .expect("particle");
            let mut op = ForceIntegrationOp::new();
            for _ in 0..30 {
                op.update_sim(&mut world, 1.0 / 60.0);
            }
            world.particles.get(id).map(|p| p.position).unwrap_or_default()
        };
        let first = run();
        assert_eq!(first, run());
        assert_ne!(first, DVec2::new(50.0, 50.0));
    }
}
