use crate::entities::{BondId, Entity, ParticleId};
use crate::error::{ensure_non_negative, Result, SimError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BondKind {
    #[default]
    Single,
    Double,
    Triple,
    Ionic,
    Hydrogen,
}

impl BondKind {
    /// Multiplier applied to the base spring coefficient
    pub fn stiffness_multiplier(&self) -> f64 {
        match self {
            BondKind::Single => 1.0,
            BondKind::Double => 1.5,
            BondKind::Triple => 2.0,
            BondKind::Ionic => 0.7,
            BondKind::Hydrogen => 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondSpec {
    pub p1: ParticleId,
    pub p2: ParticleId,
    /// Current separation of the endpoints when `None`
    pub rest_length: Option<f64>,
    pub kind: BondKind,
}

impl BondSpec {
    pub fn new(p1: ParticleId, p2: ParticleId) -> Self {
        Self {
            p1,
            p2,
            rest_length: None,
            kind: BondKind::Single,
        }
    }

    pub fn with_rest_length(mut self, rest_length: f64) -> Self {
        self.rest_length = Some(rest_length);
        self
    }

    pub fn with_kind(mut self, kind: BondKind) -> Self {
        self.kind = kind;
        self
    }

    /// Checks that do not need the particle collection; endpoint existence
    /// is checked by the controller.
    pub fn validate(&self) -> Result<()> {
        if self.p1 == self.p2 {
            return Err(SimError::SelfBond(self.p1));
        }
        if let Some(rest_length) = self.rest_length {
            ensure_non_negative("rest_length", rest_length)?;
        }
        Ok(())
    }
}

/// Spring constraint between two particles, referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bond {
    pub id: BondId,
    pub p1: ParticleId,
    pub p2: ParticleId,
    pub rest_length: f64,
    pub kind: BondKind,
    /// 0.1..=1.0, drops as the bonded particles heat up
    pub stability: f64,
}

impl Bond {
    pub fn new(id: BondId, p1: ParticleId, p2: ParticleId, rest_length: f64, kind: BondKind) -> Self {
        Self {
            id,
            p1,
            p2,
            rest_length,
            kind,
            stability: 1.0,
        }
    }
}

impl Entity for Bond {
    type Id = BondId;

    fn id(&self) -> BondId {
        self.id
    }
}
