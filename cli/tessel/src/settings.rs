//! Configuration resolution: config file first, then command-line overrides.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use log::{debug, info};

use tessel_core::parse::{find_config, load_config_toml};
use tessel_core::{ConfigFile, Configuration};

/// Flags shared by every command that synthesizes a design.
#[derive(Args, Debug, Clone, Default)]
pub struct DesignArgs {
    /// Configuration file (default: nearest tessel.toml, else built-in defaults)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Target kind (CPU, NPU)
    #[arg(long)]
    pub target: Option<String>,
    /// Number of execution units (1-1024)
    #[arg(short = 'p', long)]
    pub parallelism: Option<i64>,
    /// Instruction-set family (RISCV, ARM, X86, CUSTOM)
    #[arg(long)]
    pub isa: Option<String>,
    /// Interconnect topology (crossbar, mesh, noc); derived from parallelism if unset
    #[arg(long)]
    pub topology: Option<String>,
    /// Arbitration policy (LRU, priority, round_robin)
    #[arg(long)]
    pub arbitration: Option<String>,
    /// Target clock frequency in GHz
    #[arg(long)]
    pub frequency: Option<f64>,
    /// Trace synthesis phases
    #[arg(long)]
    pub debug: bool,
}

impl DesignArgs {
    /// Load the raw configuration and apply flag overrides, without validating.
    pub fn raw_config(&self, cwd: &Path) -> Result<ConfigFile> {
        let mut file = match self.config_path(cwd) {
            Some(path) => {
                info!("loading configuration from {}", path.display());
                load_config_toml(&path)
                    .with_context(|| format!("loading {}", path.display()))?
            }
            None => {
                debug!("no configuration file; using defaults");
                ConfigFile::default()
            }
        };
        self.apply(&mut file);
        Ok(file)
    }

    /// Load, override, and validate.
    pub fn resolve(&self, cwd: &Path) -> Result<Configuration> {
        let file = self.raw_config(cwd)?;
        let config = file.validate().context("invalid configuration")?;
        debug!("resolved {config}");
        Ok(config)
    }

    fn config_path(&self, cwd: &Path) -> Option<PathBuf> {
        match self.config {
            Some(ref path) => Some(path.clone()),
            None => find_config(cwd),
        }
    }

    fn apply(&self, file: &mut ConfigFile) {
        if let Some(ref target) = self.target {
            file.target = target.clone();
        }
        if let Some(p) = self.parallelism {
            file.parallelism = p;
        }
        if let Some(ref isa) = self.isa {
            file.isa = isa.clone();
        }
        if let Some(ref topology) = self.topology {
            file.interconnect.topology = Some(topology.clone());
        }
        if let Some(ref arbitration) = self.arbitration {
            file.interconnect.arbitration = arbitration.clone();
        }
        if let Some(frequency) = self.frequency {
            file.timing.target_frequency = frequency;
        }
        if self.debug {
            file.debug = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessel_core::{TargetKind, Topology};

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = DesignArgs::default().resolve(dir.path()).unwrap();
        assert_eq!(config.target(), TargetKind::Cpu);
        assert_eq!(config.parallelism(), 4);
    }

    #[test]
    fn flags_override_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tessel.toml"),
            "target = \"NPU\"\nparallelism = 64\n\n[interconnect]\ntopology = \"noc\"\n",
        )
        .unwrap();

        let args = DesignArgs {
            parallelism: Some(8),
            topology: Some("mesh".into()),
            ..DesignArgs::default()
        };
        let config = args.resolve(dir.path()).unwrap();
        assert_eq!(config.target(), TargetKind::Npu);
        assert_eq!(config.parallelism(), 8);
        assert_eq!(config.interconnect().topology, Some(Topology::Mesh));
    }

    #[test]
    fn file_flags_carry_through() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("tessel.toml"),
            "verbose = true\ndump_intermediate = true\n",
        )
        .unwrap();
        let config = DesignArgs::default().resolve(dir.path()).unwrap();
        assert!(config.verbose());
        assert!(config.dump_intermediate());
        assert!(!config.debug());
    }

    #[test]
    fn invalid_flag_names_the_field() {
        let dir = tempfile::tempdir().unwrap();
        let args = DesignArgs {
            isa: Some("MIPS".into()),
            ..DesignArgs::default()
        };
        let err = args.resolve(dir.path()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("invalid isa: 'MIPS'"), "{msg}");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let args = DesignArgs {
            config: Some(dir.path().join("absent.toml")),
            ..DesignArgs::default()
        };
        assert!(args.resolve(dir.path()).is_err());
    }
}
