pub const AMBIENT_TEMPERATURE_C: f64 = 25.0;
pub const ABSOLUTE_ZERO_C: f64 = -273.15;
pub const MAX_FIELD_TEMPERATURE_C: f64 = 5000.0;

// one 60fps frame
pub const MAX_TICK_SECONDS: f64 = 1.0 / 60.0;

pub const DEFAULT_WORLD_WIDTH: f64 = 300.0;
pub const DEFAULT_WORLD_HEIGHT: f64 = 300.0;

// Positions advance by velocity * dt * MOTION_SCALE, so a speed cap of 1.0
// moves a particle 100 world units per second.
pub const MOTION_SCALE: f64 = 100.0;

pub const DEFAULT_RESTITUTION: f64 = 0.8;
pub const DEFAULT_DAMPING_PER_SECOND: f64 = 0.1;
pub const DEFAULT_BOND_STIFFNESS: f64 = 0.5;
pub const DEFAULT_BOND_DAMPING: f64 = 4.0;
pub const DEFAULT_JITTER_STRENGTH: f64 = 3.0;
pub const DEFAULT_THERMAL_RELAXATION_RATE: f64 = 1.2; // per second
pub const DEFAULT_CONDUCTIVITY: f64 = 1.0;
pub const DEFAULT_SEED: u64 = 0x5EED;

pub const MIN_BOND_STABILITY: f64 = 0.1;
pub const BOND_WEAKENING_PER_100C: f64 = 0.9;

// Phase thresholds for particles without a material (water-like)
pub const DEFAULT_MELTING_POINT_C: f64 = 0.0;
pub const DEFAULT_BOILING_POINT_C: f64 = 100.0;
pub const BUBBLING_TEMPERATURE_C: f64 = 80.0;

// Heat tint cutoffs
pub const TINT_MEDIUM_C: f64 = 40.0;
pub const TINT_WARM_C: f64 = 70.0;
pub const TINT_HOT_C: f64 = 90.0;

/// Water's specific heat; material specific heats are expressed relative to it
/// when scaling thermal relaxation.
pub const REFERENCE_SPECIFIC_HEAT_J_PER_KG_K: f64 = 4184.0;

/// `(temperature_c, vibration_intensity, speed_factor)` control points,
/// interpolated linearly and clamped at the ends.
pub const DEFAULT_THERMAL_BANDS: &[(f64, f64, f64)] = &[
    (-50.0, 0.02, 0.2),  // deep frozen
    (0.0, 0.05, 0.4),    // freezing
    (25.0, 0.1, 1.0),    // room temperature
    (80.0, 0.5, 1.8),    // near boiling, bubbling starts
    (100.0, 0.8, 2.5),   // boiling
    (200.0, 1.0, 3.0),   // superheated
];

/// Tolerance used when checking that a particle sits inside its container.
pub const CONTAINMENT_TOLERANCE_RATIO: f64 = 0.01;
