//! Structural Verilog emission for synthesized tessel designs.
//!
//! [`emit`] renders the top-level module; [`library::support_library`]
//! supplies the modules it instantiates.

pub mod emit;
pub mod library;
pub mod widths;

pub use emit::{emit, instance_operator, module_name, EmitOptions};
pub use library::support_library;
pub use widths::BusWidths;
