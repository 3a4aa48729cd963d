//! Silicon area model, in µm².

use std::fmt;

use log::debug;
use serde::Serialize;

use tessel_core::{OperatorCatalog, OperatorKind, SynthesizedDesign, TargetKind, Topology};

use crate::error::{EstimateError, Result};

/// Register-file area per execution unit.
pub const REGISTER_FILE_AREA_PER_UNIT: f64 = 100.0;
/// Crossbar area coefficient, multiplied by p².
pub const CROSSBAR_AREA_COEFF: f64 = 5.0;
/// Mesh area per unit.
pub const MESH_AREA_PER_UNIT: f64 = 20.0;
/// NoC area per unit.
pub const NOC_AREA_PER_UNIT: f64 = 30.0;
pub const CPU_CONTROL_AREA: f64 = 500.0;
pub const NPU_CONTROL_AREA: f64 = 300.0;
pub const MEMORY_AREA: f64 = 1000.0;

/// Area estimate by component.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaEstimate {
    pub execution_units_um2: f64,
    pub register_file_um2: f64,
    pub interconnect_um2: f64,
    pub control_um2: f64,
    pub memory_um2: f64,
    pub total_um2: f64,
}

impl AreaEstimate {
    pub fn breakdown(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("execution_units", self.execution_units_um2),
            ("register_file", self.register_file_um2),
            ("interconnect", self.interconnect_um2),
            ("control", self.control_um2),
            ("memory", self.memory_um2),
        ]
    }

    pub fn total_mm2(&self) -> f64 {
        self.total_um2 / 1e6
    }
}

impl fmt::Display for AreaEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Area:")?;
        for (name, um2) in self.breakdown() {
            writeln!(f, "  {name:<16} {um2:>12.1} um2")?;
        }
        write!(
            f,
            "  {:<16} {:>12.1} um2 ({:.6} mm2)",
            "total",
            self.total_um2,
            self.total_mm2()
        )
    }
}

/// Σ catalog area over an operator sequence.
pub fn sequence_area(catalog: &OperatorCatalog, operators: &[OperatorKind]) -> Result<f64> {
    operators.iter().try_fold(0.0, |acc, &op| {
        catalog
            .get(op)
            .map(|spec| acc + spec.area_um2)
            .ok_or(EstimateError::UnknownOperator { operator: op })
    })
}

pub fn interconnect_area(topology: Topology, parallelism: u32) -> f64 {
    let p = f64::from(parallelism);
    match topology {
        Topology::Crossbar => CROSSBAR_AREA_COEFF * p * p,
        Topology::Mesh => MESH_AREA_PER_UNIT * p,
        Topology::Noc => NOC_AREA_PER_UNIT * p,
    }
}

pub fn control_area(target: TargetKind) -> f64 {
    match target {
        TargetKind::Cpu => CPU_CONTROL_AREA,
        TargetKind::Npu => NPU_CONTROL_AREA,
    }
}

/// Estimate the design's area from the catalog figures of its operator sequence.
pub fn estimate_area(design: &SynthesizedDesign, catalog: &OperatorCatalog) -> Result<AreaEstimate> {
    let p = f64::from(design.parallelism);

    let execution_units_um2 = p * sequence_area(catalog, &design.operators)?;
    let register_file_um2 = REGISTER_FILE_AREA_PER_UNIT * p;
    let interconnect_um2 = interconnect_area(design.topology(), design.parallelism);
    let control_um2 = control_area(design.target);
    let memory_um2 = MEMORY_AREA;
    let total_um2 =
        execution_units_um2 + register_file_um2 + interconnect_um2 + control_um2 + memory_um2;

    debug!("area: {total_um2:.1} um2");

    Ok(AreaEstimate {
        execution_units_um2,
        register_file_um2,
        interconnect_um2,
        control_um2,
        memory_um2,
        total_um2,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::design_with;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn cpu_four_way_crossbar() {
        let design = design_with(TargetKind::Cpu, 4, Some(Topology::Crossbar));
        let area = estimate_area(&design, &OperatorCatalog::standard()).unwrap();
        // 4 * (45.2 + 120.5 + 210.5 + 65.0)
        assert!(close(area.execution_units_um2, 1764.8));
        assert!(close(area.register_file_um2, 400.0));
        assert!(close(area.interconnect_um2, 80.0));
        assert!(close(area.control_um2, 500.0));
        assert!(close(area.memory_um2, 1000.0));
        assert!(close(area.total_um2, 3744.8));
        assert!(close(area.total_mm2(), 0.0037448));
    }

    #[test]
    fn interconnect_scaling() {
        assert!(close(interconnect_area(Topology::Crossbar, 16), 1280.0));
        assert!(close(interconnect_area(Topology::Mesh, 16), 320.0));
        assert!(close(interconnect_area(Topology::Noc, 16), 480.0));
    }

    #[test]
    fn npu_uses_smaller_control() {
        let design = design_with(TargetKind::Npu, 8, None);
        let area = estimate_area(&design, &OperatorCatalog::standard()).unwrap();
        assert!(close(area.control_um2, 300.0));
        // 8 * (185 + 50 + 50)
        assert!(close(area.execution_units_um2, 2280.0));
    }

    #[test]
    fn breakdown_sums_to_total() {
        let design = design_with(TargetKind::Npu, 40, None);
        let area = estimate_area(&design, &OperatorCatalog::standard()).unwrap();
        let sum: f64 = area.breakdown().iter().map(|(_, v)| v).sum();
        assert!(close(sum, area.total_um2));
    }

    #[test]
    fn missing_operator_is_reported() {
        let design = design_with(TargetKind::Cpu, 2, None);
        let err = estimate_area(&design, &OperatorCatalog::empty()).unwrap_err();
        assert_eq!(
            err,
            EstimateError::UnknownOperator {
                operator: OperatorKind::Alu
            }
        );
    }
}
