use crate::entities::{Entity, HeatSourceId};
use crate::error::{ensure_finite, ensure_positive, Result};
use crate::math_utils::clamp01;
use glam::DVec2;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatSourceSpec {
    pub position: DVec2,
    /// Influence radius
    pub radius: f64,
    /// 0..=1 multiplier, clamped
    pub intensity: f64,
    pub temperature: f64,
    pub is_active: bool,
}

impl HeatSourceSpec {
    /// An active, full-intensity source
    pub fn new(x: f64, y: f64, radius: f64, temperature: f64) -> Self {
        Self {
            position: DVec2::new(x, y),
            radius,
            intensity: 1.0,
            temperature,
            is_active: true,
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure_finite("heat_source.x", self.position.x)?;
        ensure_finite("heat_source.y", self.position.y)?;
        ensure_positive("heat_source.radius", self.radius)?;
        ensure_finite("heat_source.intensity", self.intensity)?;
        ensure_finite("heat_source.temperature", self.temperature)?;
        Ok(())
    }
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeatSourceUpdate {
    pub position: Option<DVec2>,
    pub radius: Option<f64>,
    pub intensity: Option<f64>,
    pub temperature: Option<f64>,
    pub is_active: Option<bool>,
}

impl HeatSourceUpdate {
    pub fn active(is_active: bool) -> Self {
        Self {
            is_active: Some(is_active),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(position) = self.position {
            ensure_finite("heat_source.x", position.x)?;
            ensure_finite("heat_source.y", position.y)?;
        }
        if let Some(radius) = self.radius {
            ensure_positive("heat_source.radius", radius)?;
        }
        if let Some(intensity) = self.intensity {
            ensure_finite("heat_source.intensity", intensity)?;
        }
        if let Some(temperature) = self.temperature {
            ensure_finite("heat_source.temperature", temperature)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeatSource {
    pub id: HeatSourceId,
    pub position: DVec2,
    pub radius: f64,
    pub intensity: f64,
    pub temperature: f64,
    pub is_active: bool,
}

impl HeatSource {
    pub fn from_spec(id: HeatSourceId, spec: HeatSourceSpec) -> Self {
        Self {
            id,
            position: spec.position,
            radius: spec.radius,
            intensity: clamp01(spec.intensity),
            temperature: spec.temperature,
            is_active: spec.is_active,
        }
    }

    /// Validate the whole update first so a bad field leaves the source untouched.
    pub fn apply(&mut self, update: &HeatSourceUpdate) -> Result<()> {
        update.validate()?;
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(radius) = update.radius {
            self.radius = radius;
        }
        if let Some(intensity) = update.intensity {
            self.intensity = clamp01(intensity);
        }
        if let Some(temperature) = update.temperature {
            self.temperature = temperature;
        }
        if let Some(is_active) = update.is_active {
            self.is_active = is_active;
        }
        Ok(())
    }

    /// Temperature offset this source adds over `ambient` at `point`.
    ///
    /// Falls off linearly from `(temperature - ambient) * intensity` at the
    /// source to zero at `radius`; zero when inactive or out of range.
    pub fn contribution_at(&self, point: DVec2, ambient: f64) -> f64 {
        if !self.is_active {
            return 0.0;
        }
        let distance = self.position.distance(point);
        if distance >= self.radius {
            return 0.0;
        }
        let falloff = 1.0 - distance / self.radius;
        (self.temperature - ambient) * self.intensity * falloff
    }
}

impl Entity for HeatSource {
    type Id = HeatSourceId;

    fn id(&self) -> HeatSourceId {
        self.id
    }
}
