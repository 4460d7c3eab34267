//! Infrastructure layer - Balancer encoding, quote models and paper execution

pub mod balancer;
pub mod curve;
pub mod simulation;

pub use balancer::{BoostedExitEncoder, BoostedPoolContracts};
pub use curve::{LinearExitCurve, SlippageGuardedCurve};
pub use simulation::PaperAvatar;
