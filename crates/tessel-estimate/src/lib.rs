//! Analytical estimators for synthesized tessel designs.
//!
//! Every estimator is a pure function over an immutable
//! [`SynthesizedDesign`](tessel_core::SynthesizedDesign) and is recomputed on
//! each call. The figures are coarse closed-form approximations.

pub mod area;
pub mod error;
pub mod format;
pub mod power;
pub mod report;
pub mod timing;

pub use area::{estimate_area, AreaEstimate};
pub use error::EstimateError;
pub use power::{estimate_power, PowerEstimate, DEFAULT_ACTIVITY};
pub use report::EstimateReport;
pub use timing::{check_setup_hold, estimate_timing, SetupHoldCheck, TimingEstimate};
