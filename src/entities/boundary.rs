use crate::entities::{BoundaryId, Entity};
use crate::error::{ensure_finite, ensure_positive, Result};
use crate::math_utils::clamp01;
use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Collision geometry of a piece of lab equipment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoundaryShape {
    /// Axis-aligned, `(x, y)` is the top-left corner
    Rectangle { x: f64, y: f64, width: f64, height: f64 },
    Circle { x: f64, y: f64, radius: f64 },
}

impl BoundaryShape {
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64) -> Self {
        BoundaryShape::Rectangle { x, y, width, height }
    }

    pub fn circle(x: f64, y: f64, radius: f64) -> Self {
        BoundaryShape::Circle { x, y, radius }
    }

    /// Whether `point` lies in the interior (edges included)
    pub fn contains_point(&self, point: DVec2) -> bool {
        match *self {
            BoundaryShape::Rectangle { x, y, width, height } => {
                point.x >= x && point.x <= x + width && point.y >= y && point.y <= y + height
            }
            BoundaryShape::Circle { x, y, radius } => {
                point.distance_squared(DVec2::new(x, y)) <= radius * radius
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        match *self {
            BoundaryShape::Rectangle { x, y, width, height } => {
                ensure_finite("boundary.x", x)?;
                ensure_finite("boundary.y", y)?;
                ensure_positive("boundary.width", width)?;
                ensure_positive("boundary.height", height)?;
            }
            BoundaryShape::Circle { x, y, radius } => {
                ensure_finite("boundary.x", x)?;
                ensure_finite("boundary.y", y)?;
                ensure_positive("boundary.radius", radius)?;
            }
        }
        Ok(())
    }
}

/// What the equipment does with particles that touch it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BoundaryKind {
    /// A vessel: particles inside stay inside, particles outside bounce off its walls
    #[default]
    Container,
    /// A hot plate or burner surface; collides like a solid
    Heater,
    Solid,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundarySpec {
    pub shape: BoundaryShape,
    pub kind: BoundaryKind,
    /// Falls back to the configured default restitution when `None`
    pub restitution: Option<f64>,
    pub friction: f64,
}

impl BoundarySpec {
    pub fn new(shape: BoundaryShape, kind: BoundaryKind) -> Self {
        Self {
            shape,
            kind,
            restitution: None,
            friction: 0.0,
        }
    }

    pub fn container(shape: BoundaryShape) -> Self {
        Self::new(shape, BoundaryKind::Container)
    }

    pub fn solid(shape: BoundaryShape) -> Self {
        Self::new(shape, BoundaryKind::Solid)
    }

    pub fn with_restitution(mut self, restitution: f64) -> Self {
        self.restitution = Some(restitution);
        self
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.shape.validate()?;
        if let Some(restitution) = self.restitution {
            ensure_finite("restitution", restitution)?;
        }
        ensure_finite("friction", self.friction)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Boundary {
    pub id: BoundaryId,
    pub shape: BoundaryShape,
    pub kind: BoundaryKind,
    pub restitution: f64,
    pub friction: f64,
}

impl Boundary {
    /// Build from a validated spec; restitution and friction are clamped to [0, 1].
    pub fn from_spec(id: BoundaryId, spec: BoundarySpec, default_restitution: f64) -> Self {
        Self {
            id,
            shape: spec.shape,
            kind: spec.kind,
            restitution: clamp01(spec.restitution.unwrap_or(default_restitution)),
            friction: clamp01(spec.friction),
        }
    }
}

impl Entity for Boundary {
    type Id = BoundaryId;

    fn id(&self) -> BoundaryId {
        self.id
    }
}
