//! Fixed-stage critical-path timing model.
//!
//! The critical path is register read, interconnect transit, execution, and
//! writeback. Stage delays are constants; only the interconnect stage depends
//! on the design (crossbars are slower than mesh and NoC links). These are
//! order-of-magnitude figures, not sign-off numbers.

use std::fmt;

use log::debug;
use serde::Serialize;

use tessel_core::{SynthesizedDesign, TimingConfig, Topology};

use crate::error::{EstimateError, Result};

/// Register-file read delay in ps.
pub const REGISTER_READ_PS: f64 = 85.0;
/// Crossbar transit delay in ps.
pub const CROSSBAR_TRANSIT_PS: f64 = 95.0;
/// Mesh and NoC transit delay in ps.
pub const LINK_TRANSIT_PS: f64 = 50.0;
/// Execution-stage delay in ps.
pub const EXECUTION_PS: f64 = 180.0;
/// Writeback delay in ps.
pub const WRITEBACK_PS: f64 = 70.0;

/// Critical-path estimate against a target frequency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingEstimate {
    pub register_read_ps: f64,
    pub interconnect_ps: f64,
    pub execution_ps: f64,
    pub writeback_ps: f64,
    /// Sum of the stage delays.
    pub critical_path_ps: f64,
    pub max_frequency_ghz: f64,
    pub target_frequency_ghz: f64,
    /// Target cycle time minus the critical path. Negative slack is advisory.
    pub slack_ps: f64,
}

impl TimingEstimate {
    /// Stage delays in path order.
    pub fn breakdown(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("register_read", self.register_read_ps),
            ("interconnect", self.interconnect_ps),
            ("execution", self.execution_ps),
            ("writeback", self.writeback_ps),
        ]
    }

    pub fn meets_target(&self) -> bool {
        self.slack_ps >= 0.0
    }
}

impl fmt::Display for TimingEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timing:")?;
        for (stage, ps) in self.breakdown() {
            writeln!(f, "  {stage:<14} {ps:>8.1} ps")?;
        }
        writeln!(f, "  {:<14} {:>8.1} ps", "critical path", self.critical_path_ps)?;
        writeln!(f, "  max frequency  {:.3} GHz", self.max_frequency_ghz)?;
        write!(
            f,
            "  slack          {:.1} ps @ {} GHz",
            self.slack_ps, self.target_frequency_ghz
        )
    }
}

/// Setup/hold verdict for the critical path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SetupHoldCheck {
    pub critical_path_ps: f64,
    pub cycle_time_ps: f64,
    pub setup_time_ps: f64,
    pub hold_time_ps: f64,
    pub setup_ok: bool,
    pub hold_ok: bool,
}

impl SetupHoldCheck {
    pub fn passed(&self) -> bool {
        self.setup_ok && self.hold_ok
    }
}

impl fmt::Display for SetupHoldCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = |ok: bool| if ok { "OK" } else { "VIOLATED" };
        writeln!(
            f,
            "  setup: {} ({:.1} ps < {:.1} ps - {:.1} ps)",
            verdict(self.setup_ok),
            self.critical_path_ps,
            self.cycle_time_ps,
            self.setup_time_ps
        )?;
        write!(
            f,
            "  hold:  {} ({:.1} ps > {:.1} ps)",
            verdict(self.hold_ok),
            self.critical_path_ps,
            self.hold_time_ps
        )
    }
}

/// Transit delay through the interconnect for a topology.
pub fn interconnect_delay_ps(topology: Topology) -> f64 {
    match topology {
        Topology::Crossbar => CROSSBAR_TRANSIT_PS,
        Topology::Mesh | Topology::Noc => LINK_TRANSIT_PS,
    }
}

/// Critical-path length for a design, in ps.
pub fn critical_path_ps(design: &SynthesizedDesign) -> f64 {
    REGISTER_READ_PS + interconnect_delay_ps(design.topology()) + EXECUTION_PS + WRITEBACK_PS
}

fn check_frequency(timing: &TimingConfig) -> Result<f64> {
    let frequency = timing.target_frequency_ghz;
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(EstimateError::InvalidFrequency { frequency });
    }
    Ok(frequency)
}

/// Estimate the critical path and slack against `timing.target_frequency_ghz`.
pub fn estimate_timing(design: &SynthesizedDesign, timing: &TimingConfig) -> Result<TimingEstimate> {
    let target = check_frequency(timing)?;
    let interconnect_ps = interconnect_delay_ps(design.topology());
    let total = critical_path_ps(design);

    let estimate = TimingEstimate {
        register_read_ps: REGISTER_READ_PS,
        interconnect_ps,
        execution_ps: EXECUTION_PS,
        writeback_ps: WRITEBACK_PS,
        critical_path_ps: total,
        max_frequency_ghz: 1000.0 / total,
        target_frequency_ghz: target,
        slack_ps: 1000.0 / target - total,
    };
    debug!(
        "timing: critical path {total} ps, slack {:.1} ps",
        estimate.slack_ps
    );
    Ok(estimate)
}

/// Check setup and hold margins of the critical path.
///
/// Setup holds iff `path < cycle - setup`; hold holds iff `path > hold`.
pub fn check_setup_hold(design: &SynthesizedDesign, timing: &TimingConfig) -> Result<SetupHoldCheck> {
    check_frequency(timing)?;
    let total = critical_path_ps(design);
    let cycle_time_ps = timing.cycle_time_ps();
    let setup_time_ps = timing.setup_time_ns * 1000.0;
    let hold_time_ps = timing.hold_time_ns * 1000.0;

    Ok(SetupHoldCheck {
        critical_path_ps: total,
        cycle_time_ps,
        setup_time_ps,
        hold_time_ps,
        setup_ok: total < cycle_time_ps - setup_time_ps,
        hold_ok: total > hold_time_ps,
    })
}
