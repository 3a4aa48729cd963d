//! `tessel estimate`: timing, area, and power estimates.

use std::path::Path;

use anyhow::{Context, Result};

use tessel_estimate::EstimateReport;

use super::OutputFormat;
use crate::settings::DesignArgs;

pub fn run(cwd: &Path, args: &DesignArgs, activity: f64, format: OutputFormat) -> Result<()> {
    let (session, design) = super::synthesize(args, cwd)?;
    let report = EstimateReport::compute(&design, session.config(), session.catalog(), activity)
        .context("estimation failed")?;

    match format {
        OutputFormat::Text => println!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
