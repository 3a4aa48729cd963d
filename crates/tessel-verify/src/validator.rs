//! Design checks: structure, timing, area, power, connectivity.
//!
//! Every check runs on every call, in that fixed order, so a single pass
//! reports all findings. The area and power checks use their own coarse
//! per-unit heuristics, separate from `tessel-estimate`'s models.

use log::info;

use tessel_core::{Configuration, DesignParts, Topology};

use crate::report::ValidationResult;

/// Frequencies above this (GHz) are flagged as hard for standard cells.
pub const MAX_COMFORTABLE_FREQUENCY_GHZ: f64 = 4.0;
/// Setup times below this (ns) are flagged as aggressive.
pub const MIN_SETUP_TIME_NS: f64 = 0.02;
/// Heuristic area per execution unit, µm².
pub const AREA_PER_UNIT_UM2: u64 = 200;
/// Heuristic crossbar area coefficient, multiplied by p².
pub const CROSSBAR_AREA_COEFF: u64 = 2;
/// Heuristic power per execution unit, mW.
pub const POWER_PER_UNIT_MW: u64 = 50;
/// Power budget above which a warning is raised, mW.
pub const POWER_BUDGET_MW: u64 = 5000;

/// Run every check over `parts` and return the findings.
pub fn validate<'a>(parts: impl Into<DesignParts<'a>>, config: &Configuration) -> ValidationResult {
    let parts = parts.into();
    let mut result = ValidationResult::new();
    let topology = effective_topology(&parts, config);

    check_structure(&parts, config, &mut result);
    check_timing(config, &mut result);
    check_area(config, topology, &mut result);
    check_power(config, &mut result);
    check_connectivity(topology, &mut result);

    result
}

/// The built interconnect's topology, or the configured one when absent.
fn effective_topology(parts: &DesignParts<'_>, config: &Configuration) -> Option<Topology> {
    parts
        .interconnect
        .map(|ic| ic.topology())
        .or(config.interconnect().topology)
}

pub fn check_structure(parts: &DesignParts<'_>, config: &Configuration, result: &mut ValidationResult) {
    let expected = config.parallelism() as usize;
    if parts.units.is_empty() {
        result.add_error("No execution units found in design");
    } else if parts.units.len() != expected {
        result.add_warning(format!(
            "EU count mismatch: expected {expected}, found {}",
            parts.units.len()
        ));
    }

    if parts.register_file.is_none() {
        result.add_error("Register file not generated");
    }
    if parts.interconnect.is_none() {
        result.add_error("Interconnect not generated");
    }
    if parts.controller.is_none() {
        result.add_error("Controller not generated");
    }
    if parts.memory.is_none() {
        result.add_error("Memory subsystem not generated");
    }

    info!("structure validation completed");
}

pub fn check_timing(config: &Configuration, result: &mut ValidationResult) {
    let timing = config.timing();
    if timing.target_frequency_ghz > MAX_COMFORTABLE_FREQUENCY_GHZ {
        result.add_warning(format!(
            "Target frequency {} GHz may be challenging for standard cells",
            timing.target_frequency_ghz
        ));
    }
    if timing.setup_time_ns < MIN_SETUP_TIME_NS {
        result.add_warning("Setup time may be too aggressive");
    }

    info!("timing validation completed");
}

pub fn check_area(config: &Configuration, topology: Option<Topology>, result: &mut ValidationResult) {
    let p = u64::from(config.parallelism());
    let mut estimated = p * AREA_PER_UNIT_UM2;

    if topology == Some(Topology::Crossbar) {
        let crossbar = p * p * CROSSBAR_AREA_COEFF;
        estimated += crossbar;
        // crossbar > estimated / 2, kept in integers
        if crossbar * 2 > estimated {
            result.add_warning(format!(
                "Crossbar area ({crossbar} um2) dominates design. \
                 Consider Mesh or NoC topology for better scalability"
            ));
        }
    }

    info!("estimated area: {estimated} um2");
}

pub fn check_power(config: &Configuration, result: &mut ValidationResult) {
    let estimated = u64::from(config.parallelism()) * POWER_PER_UNIT_MW;
    if estimated > POWER_BUDGET_MW {
        result.add_warning(format!(
            "Estimated power ({estimated} mW) is high. Consider clock gating or power domains"
        ));
    }

    info!("estimated power: {estimated} mW");
}

/// Deadlock freedom is not analyzed; NoC designs get a reminder.
pub fn check_connectivity(topology: Option<Topology>, result: &mut ValidationResult) {
    if topology == Some(Topology::Noc) {
        result.add_info("NoC topology selected. Ensure deadlock-free routing algorithm");
    }

    info!("connectivity validation completed");
}
