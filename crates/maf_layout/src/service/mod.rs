//! Contracts of the external generation and calculation services.
//!
//! The services themselves (procedural generation, budget-constrained placement) live outside
//! this crate. Implement [`GenerationService`] / [`CalculationService`] for a client, or pass a
//! closure: both traits are implemented for `Fn(&Request) -> Result<Response>`.
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod calculation;
pub mod generation;

pub use calculation::{CalculationRequest, CalculationResponse, EquipmentItem, Slot};
pub use generation::{GenerationRequest, GenerationResponse, ZonePreferences};

/// Which external service an operation targets.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ServiceKind {
    Generation,
    Calculation,
}

impl ServiceKind {
    pub const fn name(self) -> &'static str {
        match self {
            ServiceKind::Generation => "generation",
            ServiceKind::Calculation => "calculation",
        }
    }
}

impl fmt::Display for ServiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Produces an initial zone assignment for a site boundary.
pub trait GenerationService: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse>;
}

/// Places equipment slots onto a painted zone matrix.
pub trait CalculationService: Send + Sync {
    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse>;
}

impl<F> GenerationService for F
where
    F: Fn(&GenerationRequest) -> Result<GenerationResponse> + Send + Sync,
{
    #[inline]
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse> {
        self(request)
    }
}

impl<F> CalculationService for F
where
    F: Fn(&CalculationRequest) -> Result<CalculationResponse> + Send + Sync,
{
    #[inline]
    fn calculate(&self, request: &CalculationRequest) -> Result<CalculationResponse> {
        self(request)
    }
}
