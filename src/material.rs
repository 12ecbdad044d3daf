// src/material.rs - Material presets with thermal properties and phase thresholds

use crate::constants::{
    DEFAULT_BOILING_POINT_C, DEFAULT_MELTING_POINT_C, REFERENCE_SPECIFIC_HEAT_J_PER_KG_K,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Material phase state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum MaterialPhase {
    #[default]
    Solid = 0,
    Liquid = 1,
    Gas = 2,
}

impl MaterialPhase {
    /// Phase for a temperature given melting and boiling points
    pub fn at_temperature(temperature_c: f64, melting_point_c: f64, boiling_point_c: f64) -> Self {
        if temperature_c < melting_point_c {
            MaterialPhase::Solid
        } else if temperature_c < boiling_point_c {
            MaterialPhase::Liquid
        } else {
            MaterialPhase::Gas
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialKind {
    Water,
    Ethanol,
    Iron,
    Salt,
    Glass,
    Air,
}

impl MaterialKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaterialKind::Water => "water",
            MaterialKind::Ethanol => "ethanol",
            MaterialKind::Iron => "iron",
            MaterialKind::Salt => "salt",
            MaterialKind::Glass => "glass",
            MaterialKind::Air => "air",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "water" => Some(MaterialKind::Water),
            "ethanol" => Some(MaterialKind::Ethanol),
            "iron" => Some(MaterialKind::Iron),
            "salt" => Some(MaterialKind::Salt),
            "glass" => Some(MaterialKind::Glass),
            "air" => Some(MaterialKind::Air),
            _ => None,
        }
    }
}

/// Thermal description of what a particle is made of.
///
/// `thermal_conductivity` is a relative coefficient (water = 1.0) used as the
/// relaxation weight, not a W/(m·K) value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub thermal_conductivity: f64,
    pub specific_heat_j_per_kg_k: f64,
    pub density_kg_m3: f64,
    pub phase: MaterialPhase,
    pub melting_point_c: f64,
    pub boiling_point_c: f64,
}

impl Material {
    pub fn from_kind(kind: MaterialKind) -> Material {
        get_profile(kind).copied().unwrap_or_default()
    }

    /// Specific heat relative to water; heavier heat sinks relax slower.
    pub fn relative_specific_heat(&self) -> f64 {
        self.specific_heat_j_per_kg_k / REFERENCE_SPECIFIC_HEAT_J_PER_KG_K
    }

    pub fn phase_at(&self, temperature_c: f64) -> MaterialPhase {
        MaterialPhase::at_temperature(temperature_c, self.melting_point_c, self.boiling_point_c)
    }
}

impl Default for Material {
    fn default() -> Self {
        Material {
            thermal_conductivity: 1.0,
            specific_heat_j_per_kg_k: REFERENCE_SPECIFIC_HEAT_J_PER_KG_K,
            density_kg_m3: 1000.0,
            phase: MaterialPhase::Liquid,
            melting_point_c: DEFAULT_MELTING_POINT_C,
            boiling_point_c: DEFAULT_BOILING_POINT_C,
        }
    }
}

pub static MATERIAL_PROFILES: Lazy<HashMap<MaterialKind, Material>> = Lazy::new(|| {
    use MaterialKind::*;
    let mut m = HashMap::new();

    m.insert(Water, Material::default());

    m.insert(Ethanol, Material {
        thermal_conductivity: 0.3,
        specific_heat_j_per_kg_k: 2440.0,
        density_kg_m3: 789.0,
        phase: MaterialPhase::Liquid,
        melting_point_c: -114.1,
        boiling_point_c: 78.4,
    });

    m.insert(Iron, Material {
        thermal_conductivity: 4.0,
        specific_heat_j_per_kg_k: 450.0,
        density_kg_m3: 7870.0,
        phase: MaterialPhase::Solid,
        melting_point_c: 1538.0,
        boiling_point_c: 2862.0,
    });

    m.insert(Salt, Material {
        thermal_conductivity: 1.5,
        specific_heat_j_per_kg_k: 880.0,
        density_kg_m3: 2160.0,
        phase: MaterialPhase::Solid,
        melting_point_c: 801.0,
        boiling_point_c: 1465.0,
    });

    m.insert(Glass, Material {
        thermal_conductivity: 0.5,
        specific_heat_j_per_kg_k: 840.0,
        density_kg_m3: 2500.0,
        phase: MaterialPhase::Solid,
        melting_point_c: 1400.0,
        boiling_point_c: 2230.0,
    });

    m.insert(Air, Material {
        thermal_conductivity: 0.2,
        specific_heat_j_per_kg_k: 1005.0,
        density_kg_m3: 1.2,
        phase: MaterialPhase::Gas,
        melting_point_c: -216.0,
        boiling_point_c: -194.0,
    });

    m
});

pub fn get_profile(kind: MaterialKind) -> Option<&'static Material> {
    MATERIAL_PROFILES.get(&kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_every_kind_has_a_profile() {
        for kind in [
            MaterialKind::Water,
            MaterialKind::Ethanol,
            MaterialKind::Iron,
            MaterialKind::Salt,
            MaterialKind::Glass,
            MaterialKind::Air,
        ] {
            let profile = get_profile(kind).expect("profile");
            assert!(profile.melting_point_c < profile.boiling_point_c, "{}", kind.as_str());
            assert_eq!(MaterialKind::from_str(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn test_water_phases() {
        let water = Material::from_kind(MaterialKind::Water);
        assert_eq!(water.phase_at(-5.0), MaterialPhase::Solid);
        assert_eq!(water.phase_at(25.0), MaterialPhase::Liquid);
        assert_eq!(water.phase_at(100.0), MaterialPhase::Gas);
        assert_abs_diff_eq!(water.relative_specific_heat(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_iron_heats_faster_than_water() {
        let iron = Material::from_kind(MaterialKind::Iron);
        let water = Material::from_kind(MaterialKind::Water);
        let iron_rate = iron.thermal_conductivity / iron.relative_specific_heat();
        let water_rate = water.thermal_conductivity / water.relative_specific_heat();
        assert!(iron_rate > water_rate);
    }
}
