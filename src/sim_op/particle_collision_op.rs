/// Particle-particle collision operation
/// Separates overlapping particles along the contact normal and exchanges
/// momentum with `particle_restitution`. Disabled unless `particle_collisions`
/// is set; pairs are checked brute force in insertion order.

use crate::math_utils::clamp_speed;
use crate::sim::world::World;
use crate::sim_op::SimOp;
use glam::DVec2;

pub struct ParticleCollisionOp;

impl ParticleCollisionOp {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ParticleCollisionOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for ParticleCollisionOp {
    fn name(&self) -> &str {
        "ParticleCollision"
    }

    fn update_sim(&mut self, world: &mut World, _dt: f64) {
        if !world.config.particle_collisions {
            return;
        }
        let restitution = world.config.particle_restitution;
        let inverse_mass: Vec<f64> = world
            .particles
            .iter()
            .map(|p| {
                if p.fixed || world.dragged.contains(&p.id) {
                    0.0
                } else {
                    1.0 / p.mass
                }
            })
            .collect();

        let particles = world.particles.as_mut_slice();
        let count = particles.len();
        for i in 0..count {
            for j in (i + 1)..count {
                let (inv_i, inv_j) = (inverse_mass[i], inverse_mass[j]);
                let inv_total = inv_i + inv_j;
                if inv_total == 0.0 {
                    continue;
                }
                let (head, tail) = particles.split_at_mut(j);
                let (pi, pj) = (&mut head[i], &mut tail[0]);

                let delta = pj.position - pi.position;
                let distance = delta.length();
                let overlap = pi.radius + pj.radius - distance;
                if overlap <= 0.0 {
                    continue;
                }
                let normal = if distance > f64::EPSILON { delta / distance } else { DVec2::X };

                pi.position -= normal * (overlap * inv_i / inv_total);
                pj.position += normal * (overlap * inv_j / inv_total);

                let approaching = (pj.velocity - pi.velocity).dot(normal);
                if approaching < 0.0 {
                    let impulse = -(1.0 + restitution) * approaching / inv_total;
                    pi.velocity -= normal * (impulse * inv_i);
                    pj.velocity += normal * (impulse * inv_j);
                }
            }
        }

        for particle in particles.iter_mut() {
            particle.velocity = clamp_speed(particle.velocity, particle.max_speed).0;
        }
    }
}
