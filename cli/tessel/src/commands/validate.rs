//! `tessel validate`: run design checks and report findings.

use std::path::Path;

use anyhow::{bail, Result};

use super::OutputFormat;
use crate::settings::DesignArgs;

/// Print the validation report. Fails when the design has errors.
pub fn run(cwd: &Path, args: &DesignArgs, format: OutputFormat) -> Result<()> {
    let (session, design) = super::synthesize(args, cwd)?;
    let result = tessel_verify::validate(&*design, session.config());

    match format {
        OutputFormat::Text => {
            println!("{result}");
            for (severity, message) in result.findings() {
                log::debug!("{severity}: {message}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if !result.is_valid() {
        bail!("design has {} validation error(s)", result.errors.len());
    }
    Ok(())
}
