//! Exit quote implementations

mod guarded;
mod linear;

pub use guarded::SlippageGuardedCurve;
pub use linear::LinearExitCurve;
