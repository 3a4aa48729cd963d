//! Generator session: configuration, catalog, and the current design.

use std::fmt;
use std::sync::Arc;

use log::info;

use crate::catalog::OperatorCatalog;
use crate::config::Configuration;
use crate::design::SynthesizedDesign;
use crate::error::{PreconditionError, SynthesisError};
use crate::observer::{LogObserver, NoopObserver, SynthesisObserver};
use crate::pipeline;
use crate::stats::DesignStats;

/// Owns a validated configuration and the most recent synthesized design.
///
/// A finished design is shared as `Arc<SynthesizedDesign>`; re-synthesis swaps
/// in a new `Arc` with a single assignment, so readers holding the previous
/// design keep a consistent snapshot. Read-only consumers called before the
/// first successful synthesis get [`PreconditionError::NotSynthesized`].
pub struct Generator {
    config: Configuration,
    catalog: OperatorCatalog,
    observer: Box<dyn SynthesisObserver>,
    design: Option<Arc<SynthesizedDesign>>,
}

impl Generator {
    /// Session over the standard catalog with the configuration's operator
    /// overrides applied. Uses [`LogObserver`] when the `debug` flag is set.
    pub fn new(config: Configuration) -> Self {
        let catalog = OperatorCatalog::standard().with_overrides(config.operator_overrides());
        Self::with_catalog(config, catalog)
    }

    pub fn with_catalog(config: Configuration, catalog: OperatorCatalog) -> Self {
        let observer: Box<dyn SynthesisObserver> = if config.debug() {
            Box::new(LogObserver)
        } else {
            Box::new(NoopObserver)
        };
        Self {
            config,
            catalog,
            observer,
            design: None,
        }
    }

    /// Replace the phase observer.
    pub fn with_observer(mut self, observer: Box<dyn SynthesisObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn catalog(&self) -> &OperatorCatalog {
        &self.catalog
    }

    /// Run the pipeline and install the result as the current design.
    ///
    /// On failure the previously installed design, if any, is kept.
    pub fn synthesize(&mut self) -> Result<Arc<SynthesizedDesign>, SynthesisError> {
        info!("synthesizing {}", self.config);
        let design = Arc::new(pipeline::synthesize(
            &self.config,
            &self.catalog,
            self.observer.as_mut(),
        )?);
        self.design = Some(Arc::clone(&design));
        Ok(design)
    }

    pub fn is_synthesized(&self) -> bool {
        self.design.is_some()
    }

    /// The current design, or a precondition error naming `consumer`.
    pub fn require(&self, consumer: &'static str) -> Result<Arc<SynthesizedDesign>, PreconditionError> {
        self.design
            .as_ref()
            .map(Arc::clone)
            .ok_or(PreconditionError::NotSynthesized { consumer })
    }

    pub fn design(&self) -> Result<Arc<SynthesizedDesign>, PreconditionError> {
        self.require("design")
    }

    pub fn stats(&self) -> Result<DesignStats, PreconditionError> {
        self.require("stats")
            .map(|design| DesignStats::from_design(&design))
    }
}

impl fmt::Debug for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("catalog", &self.catalog)
            .field("design", &self.design)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OperatorKind;
    use crate::config::{ConfigFile, Isa, OperatorOverride, TargetKind};

    fn generator(target: TargetKind, parallelism: u32) -> Generator {
        Generator::new(Configuration::with_knobs(target, parallelism, Isa::Riscv).unwrap())
    }

    #[test]
    fn consumers_fail_before_synthesis() {
        let session = generator(TargetKind::Cpu, 4);
        assert!(!session.is_synthesized());
        assert_eq!(
            session.stats().unwrap_err(),
            PreconditionError::NotSynthesized { consumer: "stats" }
        );
        assert_eq!(
            session.require("export").unwrap_err(),
            PreconditionError::NotSynthesized { consumer: "export" }
        );
        let msg = session.design().unwrap_err().to_string();
        assert!(msg.contains("design requires a synthesized design"), "{msg}");
    }

    #[test]
    fn stats_after_synthesis() {
        let mut session = generator(TargetKind::Npu, 12);
        session.synthesize().unwrap();
        let stats = session.stats().unwrap();
        assert_eq!(stats.eu_count, 12);
        assert_eq!(stats.parallelism, 12);
        assert_eq!(stats.target, TargetKind::Npu);
    }

    #[test]
    fn resynthesis_replaces_design() {
        let mut session = generator(TargetKind::Cpu, 4);
        let first = session.synthesize().unwrap();
        let second = session.synthesize().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&session.design().unwrap(), &second));
        // The earlier snapshot stays intact for readers that held it.
        assert_eq!(*first, *second);
    }

    #[test]
    fn failed_synthesis_installs_nothing() {
        let config = Configuration::with_knobs(TargetKind::Cpu, 2, Isa::Arm).unwrap();
        let mut session = Generator::with_catalog(config, OperatorCatalog::empty());
        assert!(session.synthesize().is_err());
        assert!(!session.is_synthesized());
    }

    #[test]
    fn overrides_reach_the_catalog() {
        let file = ConfigFile {
            operators: vec![OperatorOverride {
                name: "MUL".into(),
                latency: Some(5),
                area: None,
                power: None,
                bitwidths: None,
            }],
            ..ConfigFile::default()
        };
        let session = Generator::new(file.validate().unwrap());
        let mul = session.catalog().get(OperatorKind::Mul).unwrap();
        assert_eq!(mul.latency, 5);
        assert_eq!(mul.area_um2, 120.5);
    }
}
