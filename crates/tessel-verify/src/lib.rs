//! Advisory validation of synthesized tessel designs.
//!
//! Findings carry a [`Severity`]; only errors make a design invalid, and no
//! finding ever blocks emission.

pub mod report;
pub mod validator;

pub use report::{Severity, ValidationResult};
pub use validator::validate;
