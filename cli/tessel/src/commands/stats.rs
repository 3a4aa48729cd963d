//! `tessel stats`: summary of the synthesized design.

use std::path::Path;

use anyhow::Result;

use super::OutputFormat;
use crate::settings::DesignArgs;

pub fn run(cwd: &Path, args: &DesignArgs, format: OutputFormat) -> Result<()> {
    let (session, _) = super::synthesize(args, cwd)?;
    let stats = session.stats()?;
    match format {
        OutputFormat::Text => print!("{stats}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
    }
    Ok(())
}
