//! Combined estimate report.

use std::fmt;

use serde::Serialize;

use tessel_core::{Configuration, OperatorCatalog, SynthesizedDesign};

use crate::area::{estimate_area, AreaEstimate};
use crate::error::Result;
use crate::format::{bar_chart, format_area};
use crate::power::{estimate_power, PowerEstimate};
use crate::timing::{check_setup_hold, estimate_timing, SetupHoldCheck, TimingEstimate};

const BAR_WIDTH: usize = 20;

/// Timing, area, and power estimates for one design.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EstimateReport {
    /// Design label, e.g. `CPU P=4 crossbar`.
    pub design: String,
    pub timing: TimingEstimate,
    pub setup_hold: SetupHoldCheck,
    pub area: AreaEstimate,
    pub power: PowerEstimate,
}

impl EstimateReport {
    /// Run every estimator against `design`. Nothing is cached.
    pub fn compute(
        design: &SynthesizedDesign,
        config: &Configuration,
        catalog: &OperatorCatalog,
        activity: f64,
    ) -> Result<Self> {
        Ok(Self {
            design: format!(
                "{} P={} {}",
                design.target,
                design.parallelism,
                design.topology()
            ),
            timing: estimate_timing(design, config.timing())?,
            setup_hold: check_setup_hold(design, config.timing())?,
            area: estimate_area(design, catalog)?,
            power: estimate_power(design, catalog, activity)?,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for EstimateReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Estimate Report: {} ===", self.design)?;
        writeln!(f)?;
        writeln!(f, "{}", self.timing)?;
        writeln!(f, "{}", self.setup_hold)?;
        writeln!(f)?;

        writeln!(f, "Area:")?;
        for (name, um2) in self.area.breakdown() {
            writeln!(
                f,
                "  {name:<16} {:>14}  {}",
                format_area(um2),
                bar_chart(um2, self.area.total_um2, BAR_WIDTH)
            )?;
        }
        writeln!(
            f,
            "  {:<16} {:>14}  ({:.6} mm2)",
            "total",
            format_area(self.area.total_um2),
            self.area.total_mm2()
        )?;
        writeln!(f)?;

        writeln!(f, "{}", self.power)?;
        writeln!(f)?;
        write!(
            f,
            "Estimates are closed-form approximations, not sign-off figures."
        )
    }
}
