//! Circle-versus-shape collision response.
//!
//! Particles are circles. A shape either *contains* a particle (the particle
//! must stay within the shape inset by its radius) or is an *obstacle* (the
//! particle must stay outside the shape grown by its radius). Each function
//! returns the corrected position and velocity when the particle was touching
//! or penetrating, and `None` otherwise.

use crate::entities::BoundaryShape;
use crate::math_utils::reflect_velocity;
use glam::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub position: DVec2,
    pub velocity: DVec2,
}

/// Surface response coefficients, both in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub restitution: f64,
    pub friction: f64,
}

impl Surface {
    pub fn new(restitution: f64, friction: f64) -> Self {
        Self { restitution, friction }
    }

    fn respond(&self, position: DVec2, velocity: DVec2, normal: DVec2) -> Contact {
        Contact {
            position,
            velocity: reflect_velocity(velocity, normal, self.restitution, self.friction),
        }
    }
}

/// Keep a circle of `radius` inside `shape`.
pub fn contain(shape: &BoundaryShape, position: DVec2, velocity: DVec2, radius: f64, surface: Surface) -> Option<Contact> {
    match *shape {
        BoundaryShape::Rectangle { x, y, width, height } => {
            contain_in_rect(DVec2::new(x, y), DVec2::new(x + width, y + height), position, velocity, radius, surface)
        }
        BoundaryShape::Circle { x, y, radius: outer } => {
            contain_in_circle(DVec2::new(x, y), outer, position, velocity, radius, surface)
        }
    }
}

/// Keep a circle of `radius` outside `shape`.
pub fn push_out(shape: &BoundaryShape, position: DVec2, velocity: DVec2, radius: f64, surface: Surface) -> Option<Contact> {
    match *shape {
        BoundaryShape::Rectangle { x, y, width, height } => {
            push_out_of_rect(DVec2::new(x, y), DVec2::new(x + width, y + height), position, velocity, radius, surface)
        }
        BoundaryShape::Circle { x, y, radius: outer } => {
            push_out_of_circle(DVec2::new(x, y), outer, position, velocity, radius, surface)
        }
    }
}

pub fn contain_in_rect(
    min: DVec2,
    max: DVec2,
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    surface: Surface,
) -> Option<Contact> {
    let mut lo = min + DVec2::splat(radius);
    let mut hi = max - DVec2::splat(radius);
    // a box narrower than the particle pins it to the centre line
    if lo.x > hi.x {
        let mid = (min.x + max.x) * 0.5;
        lo.x = mid;
        hi.x = mid;
    }
    if lo.y > hi.y {
        let mid = (min.y + max.y) * 0.5;
        lo.y = mid;
        hi.y = mid;
    }

    let mut pos = position;
    let mut vel = velocity;
    let mut touched = false;

    if pos.x < lo.x {
        pos.x = lo.x;
        vel = surface.respond(pos, vel, DVec2::X).velocity;
        touched = true;
    } else if pos.x > hi.x {
        pos.x = hi.x;
        vel = surface.respond(pos, vel, DVec2::NEG_X).velocity;
        touched = true;
    }
    if pos.y < lo.y {
        pos.y = lo.y;
        vel = surface.respond(pos, vel, DVec2::Y).velocity;
        touched = true;
    } else if pos.y > hi.y {
        pos.y = hi.y;
        vel = surface.respond(pos, vel, DVec2::NEG_Y).velocity;
        touched = true;
    }

    touched.then_some(Contact { position: pos, velocity: vel })
}

pub fn contain_in_circle(
    center: DVec2,
    outer_radius: f64,
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    surface: Surface,
) -> Option<Contact> {
    let allowed = outer_radius - radius;
    let offset = position - center;
    let distance = offset.length();
    if allowed <= 0.0 {
        if distance == 0.0 && velocity == DVec2::ZERO {
            return None;
        }
        return Some(Contact { position: center, velocity: DVec2::ZERO });
    }
    if distance <= allowed {
        return None;
    }
    let outward = offset / distance;
    Some(surface.respond(center + outward * allowed, velocity, -outward))
}

pub fn push_out_of_rect(
    min: DVec2,
    max: DVec2,
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    surface: Surface,
) -> Option<Contact> {
    let closest = position.clamp(min, max);
    let offset = position - closest;
    let distance = offset.length();

    if distance > 0.0 {
        if distance >= radius {
            return None;
        }
        let normal = offset / distance;
        return Some(surface.respond(closest + normal * radius, velocity, normal));
    }

    // centre is inside the rectangle: leave through the nearest side
    let exits = [
        (position.x - min.x, DVec2::NEG_X),
        (max.x - position.x, DVec2::X),
        (position.y - min.y, DVec2::NEG_Y),
        (max.y - position.y, DVec2::Y),
    ];
    let (depth, normal) = exits
        .iter()
        .copied()
        .fold((f64::INFINITY, DVec2::NEG_Y), |best, candidate| {
            if candidate.0 < best.0 { candidate } else { best }
        });
    Some(surface.respond(position + normal * (depth + radius), velocity, normal))
}

pub fn push_out_of_circle(
    center: DVec2,
    outer_radius: f64,
    position: DVec2,
    velocity: DVec2,
    radius: f64,
    surface: Surface,
) -> Option<Contact> {
    let reach = outer_radius + radius;
    let offset = position - center;
    let distance = offset.length();
    if distance >= reach {
        return None;
    }
    // dead centre: push straight up
    let normal = if distance > 0.0 { offset / distance } else { DVec2::NEG_Y };
    Some(surface.respond(center + normal * reach, velocity, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_ge, assert_le, assert_lt};

    const BOUNCY: Surface = Surface { restitution: 0.8, friction: 0.0 };

    #[test]
    fn test_rect_floor_bounce() {
        let shape = BoundaryShape::rectangle(0.0, 0.0, 100.0, 100.0);
        let hit = contain(&shape, DVec2::new(50.0, 99.0), DVec2::new(0.0, 2.0), 5.0, BOUNCY).expect("floor contact");
        assert_abs_diff_eq!(hit.position.y, 95.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.velocity.y, -1.6, epsilon = 1e-12);
        assert_eq!(hit.position.x, 50.0);
    }

    #[test]
    fn test_rect_inside_untouched() {
        let shape = BoundaryShape::rectangle(0.0, 0.0, 100.0, 100.0);
        assert!(contain(&shape, DVec2::new(50.0, 50.0), DVec2::new(1.0, 1.0), 5.0, BOUNCY).is_none());
    }

    #[test]
    fn test_rect_corner_clamps_both_axes() {
        let hit = contain_in_rect(DVec2::ZERO, DVec2::splat(10.0), DVec2::new(-3.0, 12.0), DVec2::new(-1.0, 1.0), 1.0, BOUNCY)
            .expect("corner contact");
        assert_eq!(hit.position, DVec2::new(1.0, 9.0));
        assert_ge!(hit.velocity.x, 0.0);
        assert_le!(hit.velocity.y, 0.0);
    }

    #[test]
    fn test_narrow_rect_pins_to_centre() {
        let hit = contain_in_rect(DVec2::ZERO, DVec2::new(4.0, 100.0), DVec2::new(3.0, 50.0), DVec2::ZERO, 5.0, BOUNCY)
            .expect("narrow contact");
        assert_eq!(hit.position.x, 2.0);
    }

    #[test]
    fn test_circle_containment() {
        let shape = BoundaryShape::circle(0.0, 0.0, 20.0);
        let hit = contain(&shape, DVec2::new(30.0, 0.0), DVec2::new(3.0, 1.0), 2.0, BOUNCY).expect("wall contact");
        assert_abs_diff_eq!(hit.position.length(), 18.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.velocity.x, -2.4, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.velocity.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_push_out_of_rect_from_side() {
        let hit = push_out_of_rect(DVec2::ZERO, DVec2::splat(10.0), DVec2::new(12.0, 5.0), DVec2::new(-2.0, 0.0), 3.0, BOUNCY)
            .expect("side contact");
        assert_abs_diff_eq!(hit.position.x, 13.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.velocity.x, 1.6, epsilon = 1e-12);
    }

    #[test]
    fn test_push_out_of_rect_from_inside() {
        let hit = push_out_of_rect(DVec2::ZERO, DVec2::new(100.0, 10.0), DVec2::new(50.0, 2.0), DVec2::new(0.0, 1.0), 1.0, BOUNCY)
            .expect("embedded");
        assert_abs_diff_eq!(hit.position.y, -1.0, epsilon = 1e-12);
        assert_lt!(hit.velocity.y, 0.0);
    }

    #[test]
    fn test_push_out_of_circle() {
        let shape = BoundaryShape::circle(0.0, 0.0, 10.0);
        let hit = push_out(&shape, DVec2::new(0.0, 11.0), DVec2::new(0.0, -1.0), 2.0, BOUNCY).expect("contact");
        assert_abs_diff_eq!(hit.position.y, 12.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.velocity.y, 0.8, epsilon = 1e-12);
        assert!(push_out(&shape, DVec2::new(0.0, 13.0), DVec2::ZERO, 2.0, BOUNCY).is_none());
    }

    #[test]
    fn test_friction_slows_tangent() {
        let rough = Surface::new(1.0, 0.5);
        let hit = contain_in_rect(DVec2::ZERO, DVec2::splat(10.0), DVec2::new(5.0, 10.0), DVec2::new(2.0, 1.0), 1.0, rough)
            .expect("floor");
        assert_abs_diff_eq!(hit.velocity.x, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hit.velocity.y, -1.0, epsilon = 1e-12);
    }
}
