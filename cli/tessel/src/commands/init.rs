//! `tessel init`: write a template configuration file.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use tessel_core::parse::generate_template;

/// Write a validated template to `path`. Refuses to overwrite unless `force`.
pub fn run(path: &Path, target: &str, parallelism: i64, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "'{}' already exists (use --force to overwrite)",
            path.display()
        );
    }
    let template = generate_template(target, parallelism).context("building template")?;
    fs::write(path, template).with_context(|| format!("writing {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}
