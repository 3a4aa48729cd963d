//! `tessel generate`: synthesize and write structural Verilog.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;

use tessel_rtl::EmitOptions;

use crate::settings::DesignArgs;

/// Synthesize the configured design and write it to `output`.
pub fn run(
    cwd: &Path,
    args: &DesignArgs,
    output: &Path,
    with_library: bool,
    verbose: bool,
) -> Result<()> {
    let (session, design) = super::synthesize(args, cwd)?;

    let validation = tessel_verify::validate(&*design, session.config());
    for warning in &validation.warnings {
        eprintln!("warning: {warning}");
    }

    let options = EmitOptions {
        timestamp: Some(chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()),
        with_library,
    };
    let rtl = tessel_rtl::emit(&design, session.catalog(), &options);
    fs::write(output, &rtl).with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {} bytes", rtl.len());

    println!("RTL exported to: {}", output.display());

    let config = session.config();
    if config.dump_intermediate() {
        let path = intermediate_path(output);
        let json = serde_json::to_string_pretty(&*design)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("Design dumped to: {}", path.display());
    }

    if verbose || config.verbose() {
        println!();
        print!("{}", session.stats()?);
    }
    Ok(())
}

/// `out.v` -> `out.design.json`, next to the RTL.
fn intermediate_path(output: &Path) -> PathBuf {
    output.with_extension("design.json")
}
