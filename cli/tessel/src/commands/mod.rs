//! CLI command implementations.

pub mod estimate;
pub mod generate;
pub mod init;
pub mod operators;
pub mod stats;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::ValueEnum;

use tessel_core::{Generator, SynthesizedDesign};

use crate::settings::DesignArgs;

/// Report format for commands that print structured results.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Resolve the configuration and run synthesis once.
pub(crate) fn synthesize(
    args: &DesignArgs,
    cwd: &Path,
) -> Result<(Generator, Arc<SynthesizedDesign>)> {
    let config = args.resolve(cwd)?;
    let mut session = Generator::new(config);
    let design = session.synthesize().context("synthesis failed")?;
    Ok((session, design))
}
