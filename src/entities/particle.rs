use crate::constants::{DEFAULT_BOILING_POINT_C, DEFAULT_MELTING_POINT_C};
use crate::entities::{Entity, ParticleId};
use crate::error::{ensure_finite, ensure_non_negative, ensure_positive, Result};
use crate::material::{Material, MaterialPhase};
use glam::DVec2;
use serde::Serialize;

pub const DEFAULT_PARTICLE_COLOR: &str = "#94a3b8";

/// Coarse temperature band for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum HeatTint {
    #[default]
    Cool,
    Medium,
    Warm,
    Hot,
}

/// Caller-supplied fields for a new particle (everything but the id).
#[derive(Debug, Clone, PartialEq)]
pub struct ParticleSpec {
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub mass: f64,
    pub color: String,
    pub max_speed: f64,
    /// Starting temperature; ambient when `None`
    pub temperature: Option<f64>,
    pub element_type: Option<String>,
    pub material: Option<Material>,
    pub fixed: bool,
}

impl ParticleSpec {
    /// A resting particle; mass defaults to the radius.
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            velocity: DVec2::ZERO,
            radius,
            mass: radius,
            color: DEFAULT_PARTICLE_COLOR.to_string(),
            max_speed: 1.0,
            temperature: None,
            element_type: None,
            material: None,
            fixed: false,
        }
    }

    pub fn with_velocity(mut self, vx: f64, vy: f64) -> Self {
        self.velocity = DVec2::new(vx, vy);
        self
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_max_speed(mut self, max_speed: f64) -> Self {
        self.max_speed = max_speed;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_element(mut self, element_type: impl Into<String>) -> Self {
        self.element_type = Some(element_type.into());
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("position.x", self.position.x)?;
        ensure_finite("position.y", self.position.y)?;
        ensure_finite("velocity.x", self.velocity.x)?;
        ensure_finite("velocity.y", self.velocity.y)?;
        ensure_positive("radius", self.radius)?;
        ensure_positive("mass", self.mass)?;
        ensure_non_negative("max_speed", self.max_speed)?;
        if let Some(temperature) = self.temperature {
            ensure_finite("temperature", temperature)?;
        }
        if let Some(material) = &self.material {
            ensure_positive("material.thermal_conductivity", material.thermal_conductivity)?;
            ensure_positive("material.specific_heat", material.specific_heat_j_per_kg_k)?;
            ensure_positive("material.density", material.density_kg_m3)?;
            ensure_finite("material.melting_point", material.melting_point_c)?;
            ensure_finite("material.boiling_point", material.boiling_point_c)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Particle {
    pub id: ParticleId,
    pub position: DVec2,
    pub velocity: DVec2,
    pub radius: f64,
    pub mass: f64,
    /// Display token handed through to the renderer untouched
    pub color: String,
    /// Speed cap supplied at creation
    pub base_max_speed: f64,
    /// Effective cap after thermal scaling; `|velocity| <= max_speed` after a tick
    pub max_speed: f64,
    pub vibration_intensity: f64,
    pub temperature: f64,
    pub element_type: Option<String>,
    pub material: Option<Material>,
    pub fixed: bool,
    pub phase: MaterialPhase,
    pub bubbling: bool,
    pub heat_tint: HeatTint,
}

impl Particle {
    /// Build from a validated spec.
    pub fn from_spec(id: ParticleId, spec: ParticleSpec, ambient_temperature: f64) -> Self {
        let temperature = spec.temperature.unwrap_or(ambient_temperature);
        let mut particle = Self {
            id,
            position: spec.position,
            velocity: spec.velocity,
            radius: spec.radius,
            mass: spec.mass,
            color: spec.color,
            base_max_speed: spec.max_speed,
            max_speed: spec.max_speed,
            vibration_intensity: 0.0,
            temperature,
            element_type: spec.element_type,
            material: spec.material,
            fixed: spec.fixed,
            phase: MaterialPhase::Solid,
            bubbling: false,
            heat_tint: HeatTint::Cool,
        };
        particle.phase = particle.phase_at(temperature);
        particle
    }

    pub fn speed(&self) -> f64 {
        self.velocity.length()
    }

    pub fn contains_point(&self, point: DVec2) -> bool {
        self.position.distance_squared(point) <= self.radius * self.radius
    }

    pub fn melting_point(&self) -> f64 {
        self.material.map_or(DEFAULT_MELTING_POINT_C, |m| m.melting_point_c)
    }

    pub fn boiling_point(&self) -> f64 {
        self.material.map_or(DEFAULT_BOILING_POINT_C, |m| m.boiling_point_c)
    }

    pub fn phase_at(&self, temperature: f64) -> MaterialPhase {
        MaterialPhase::at_temperature(temperature, self.melting_point(), self.boiling_point())
    }
}

impl Entity for Particle {
    type Id = ParticleId;

    fn id(&self) -> ParticleId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::IdAllocator;
    use crate::error::SimError;
    use crate::material::MaterialKind;

    #[test]
    fn test_spec_defaults() {
        let spec = ParticleSpec::new(10.0, 20.0, 4.0);
        assert_eq!(spec.mass, 4.0);
        assert_eq!(spec.velocity, DVec2::ZERO);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_fields() {
        let nan = ParticleSpec::new(f64::NAN, 0.0, 4.0);
        assert!(matches!(nan.validate(), Err(SimError::NonFinite { field: "position.x", .. })));

        let negative_radius = ParticleSpec::new(0.0, 0.0, -1.0);
        assert!(matches!(negative_radius.validate(), Err(SimError::OutOfRange { field: "radius", .. })));

        let zero_mass = ParticleSpec::new(0.0, 0.0, 1.0).with_mass(0.0);
        assert!(zero_mass.validate().is_err());

        let infinite_velocity = ParticleSpec::new(0.0, 0.0, 1.0).with_velocity(f64::INFINITY, 0.0);
        assert!(infinite_velocity.validate().is_err());
    }

    #[test]
    fn test_from_spec_uses_ambient_and_material_phase() {
        let mut ids = IdAllocator::new();
        let water = Particle::from_spec(ids.particle(), ParticleSpec::new(0.0, 0.0, 1.0), 25.0);
        assert_eq!(water.temperature, 25.0);
        assert_eq!(water.phase, MaterialPhase::Liquid);

        let iron = Particle::from_spec(
            ids.particle(),
            ParticleSpec::new(0.0, 0.0, 1.0)
                .with_material(Material::from_kind(MaterialKind::Iron)),
            25.0,
        );
        assert_eq!(iron.phase, MaterialPhase::Solid);
    }

    #[test]
    fn test_contains_point() {
        let mut ids = IdAllocator::new();
        let p = Particle::from_spec(ids.particle(), ParticleSpec::new(5.0, 5.0, 2.0), 25.0);
        assert!(p.contains_point(DVec2::new(6.0, 6.0)));
        assert!(!p.contains_point(DVec2::new(8.0, 5.0)));
    }
}
