//! Dynamic and leakage power model, in mW.

use std::fmt;

use log::debug;
use serde::Serialize;

use tessel_core::{OperatorCatalog, OperatorKind, SynthesizedDesign};

use crate::error::{EstimateError, Result};

/// Switching activity used when none is given.
pub const DEFAULT_ACTIVITY: f64 = 0.5;
/// Interconnect power per unit at full activity.
pub const INTERCONNECT_POWER_PER_UNIT: f64 = 10.0;
/// Clock-tree power per unit, independent of activity.
pub const CLOCK_POWER_PER_UNIT: f64 = 15.0;
pub const MEMORY_POWER: f64 = 100.0;
/// Leakage as a fraction of dynamic power.
pub const LEAKAGE_RATIO: f64 = 0.1;

/// Power estimate by component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerEstimate {
    pub activity: f64,
    pub execution_units_mw: f64,
    pub interconnect_mw: f64,
    pub clock_mw: f64,
    pub memory_mw: f64,
    pub dynamic_mw: f64,
    pub leakage_mw: f64,
    pub total_mw: f64,
}

impl PowerEstimate {
    /// Dynamic components followed by leakage.
    pub fn breakdown(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("execution_units", self.execution_units_mw),
            ("interconnect", self.interconnect_mw),
            ("clock", self.clock_mw),
            ("memory", self.memory_mw),
            ("leakage", self.leakage_mw),
        ]
    }
}

impl fmt::Display for PowerEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Power (activity {}):", self.activity)?;
        for (name, mw) in self.breakdown() {
            writeln!(f, "  {name:<16} {mw:>10.2} mW")?;
        }
        writeln!(f, "  {:<16} {:>10.2} mW", "dynamic", self.dynamic_mw)?;
        write!(f, "  {:<16} {:>10.2} mW", "total", self.total_mw)
    }
}

/// Σ catalog power over an operator sequence.
pub fn sequence_power(catalog: &OperatorCatalog, operators: &[OperatorKind]) -> Result<f64> {
    operators.iter().try_fold(0.0, |acc, &op| {
        catalog
            .get(op)
            .map(|spec| acc + spec.power_mw)
            .ok_or(EstimateError::UnknownOperator { operator: op })
    })
}

/// Estimate power at switching activity `activity` ∈ [0, 1].
pub fn estimate_power(
    design: &SynthesizedDesign,
    catalog: &OperatorCatalog,
    activity: f64,
) -> Result<PowerEstimate> {
    if !(0.0..=1.0).contains(&activity) {
        return Err(EstimateError::ActivityOutOfRange { activity });
    }

    let p = f64::from(design.parallelism);
    let execution_units_mw = activity * p * sequence_power(catalog, &design.operators)?;
    let interconnect_mw = activity * INTERCONNECT_POWER_PER_UNIT * p;
    let clock_mw = CLOCK_POWER_PER_UNIT * p;
    let memory_mw = MEMORY_POWER;

    let dynamic_mw = execution_units_mw + interconnect_mw + clock_mw + memory_mw;
    let leakage_mw = LEAKAGE_RATIO * dynamic_mw;
    let total_mw = dynamic_mw + leakage_mw;

    debug!("power: {total_mw:.2} mW at activity {activity}");

    Ok(PowerEstimate {
        activity,
        execution_units_mw,
        interconnect_mw,
        clock_mw,
        memory_mw,
        dynamic_mw,
        leakage_mw,
        total_mw,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::design_with;
    use tessel_core::TargetKind;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn cpu_four_way_default_activity() {
        let design = design_with(TargetKind::Cpu, 4, None);
        let power = estimate_power(&design, &OperatorCatalog::standard(), DEFAULT_ACTIVITY).unwrap();
        // 0.5 * 4 * (12.5 + 35.8 + 85.2 + 22.5)
        assert!(close(power.execution_units_mw, 312.0));
        assert!(close(power.interconnect_mw, 20.0));
        assert!(close(power.clock_mw, 60.0));
        assert!(close(power.dynamic_mw, 492.0));
        assert!(close(power.leakage_mw, 49.2));
        assert!(close(power.total_mw, 541.2));
    }

    #[test]
    fn zero_activity_leaves_clock_and_memory() {
        let design = design_with(TargetKind::Npu, 10, None);
        let power = estimate_power(&design, &OperatorCatalog::standard(), 0.0).unwrap();
        assert!(close(power.execution_units_mw, 0.0));
        assert!(close(power.interconnect_mw, 0.0));
        assert!(close(power.dynamic_mw, 250.0));
        assert!(close(power.total_mw, 275.0));
    }

    #[test]
    fn activity_bounds() {
        let design = design_with(TargetKind::Npu, 2, None);
        let catalog = OperatorCatalog::standard();
        assert!(estimate_power(&design, &catalog, 1.0).is_ok());
        assert_eq!(
            estimate_power(&design, &catalog, 1.5).unwrap_err(),
            EstimateError::ActivityOutOfRange { activity: 1.5 }
        );
        assert!(estimate_power(&design, &catalog, -0.1).is_err());
        assert!(estimate_power(&design, &catalog, f64::NAN).is_err());
    }

    #[test]
    fn recomputed_fresh_each_call() {
        let design = design_with(TargetKind::Cpu, 4, None);
        let catalog = OperatorCatalog::standard();
        let low = estimate_power(&design, &catalog, 0.25).unwrap();
        let high = estimate_power(&design, &catalog, 0.75).unwrap();
        assert!(high.total_mw > low.total_mw);
        assert_eq!(estimate_power(&design, &catalog, 0.25).unwrap(), low);
    }
}
