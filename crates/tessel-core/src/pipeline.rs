//! Four-phase synthesis pipeline.
//!
//! operator tiling -> dataflow generation -> control collapse -> memory integration.
//!
//! Each phase reads only the configuration and the sizing produced by earlier
//! phases. The pipeline is a pure function of its inputs: no randomness, no
//! shared state, and a fresh [`DesignDraft`] per run. The configuration is
//! assumed valid and is not re-checked here.

use log::debug;

use crate::catalog::{OperatorCatalog, OperatorKind};
use crate::config::{Configuration, TargetKind};
use crate::design::{
    CacheSpec, ControllerSpec, DesignParts, ExecutionUnitSpec, InterconnectSpec, MemorySpec,
    RegisterFileSpec, SynthesizedDesign, REGISTER_FILE_DEPTH,
};
use crate::error::SynthesisError;
use crate::observer::{Phase, PhaseEvent, SynthesisObserver};
use crate::topology::TopologySelector;

/// Operator sequence tiled into every execution unit of a target kind.
pub fn operator_sequence(target: TargetKind) -> Vec<OperatorKind> {
    match target {
        TargetKind::Cpu => vec![
            OperatorKind::Alu,
            OperatorKind::Mul,
            OperatorKind::Fpu,
            OperatorKind::Bru,
        ],
        TargetKind::Npu => vec![
            OperatorKind::Mac,
            OperatorKind::VecAdd,
            OperatorKind::VecMul,
        ],
    }
}

/// Run all four phases and return the finished design.
pub fn synthesize(
    config: &Configuration,
    catalog: &OperatorCatalog,
    observer: &mut dyn SynthesisObserver,
) -> Result<SynthesizedDesign, SynthesisError> {
    let mut draft = DesignDraft::default();

    // Phase 1: Operator tiling
    draft.tile_operators(config, catalog)?;
    notify(observer, Phase::OperatorTiling, || {
        format!(
            "{} execution units x [{}]",
            draft.units.len(),
            join_names(draft.operators.as_deref().unwrap_or_default())
        )
    });

    // Phase 2: Dataflow generation
    draft.generate_dataflow(config)?;
    notify(observer, Phase::DataflowGeneration, || {
        let rf = draft.register_file.unwrap_or(RegisterFileSpec {
            depth: 0,
            read_ports: 0,
            write_ports: 0,
        });
        let (topology, edges) = draft
            .interconnect
            .as_ref()
            .map(|i| (i.topology().name(), i.edge_count()))
            .unwrap_or(("none", 0));
        format!(
            "regfile {}x{}R{}W, {topology} with {edges} connections",
            rf.depth, rf.read_ports, rf.write_ports
        )
    });

    // Phase 3: Control collapse
    draft.collapse_control(config)?;
    notify(observer, Phase::ControlCollapse, || {
        match draft.controller {
            Some(ControllerSpec::OutOfOrder { width, rob_entries }) => {
                format!("out-of-order, width {width}, {rob_entries} ROB entries")
            }
            Some(ControllerSpec::Systolic { dim }) => format!("systolic {dim}x{dim}"),
            None => String::new(),
        }
    });

    // Phase 4: Memory integration
    draft.integrate_memory(config)?;
    notify(observer, Phase::MemoryIntegration, || {
        draft
            .memory
            .map(|m| format!("LSU {} ports, {} MSHRs", m.lsu_ports, m.mshrs))
            .unwrap_or_default()
    });

    draft.finish(config)
}

fn notify(observer: &mut dyn SynthesisObserver, phase: Phase, summary: impl FnOnce() -> String) {
    observer.on_phase(&PhaseEvent {
        phase,
        summary: summary(),
    });
}

fn join_names(ops: &[OperatorKind]) -> String {
    ops.iter().map(|o| o.name()).collect::<Vec<_>>().join(", ")
}

/// Intermediate design state while the phases run.
#[derive(Debug, Default, Clone)]
pub struct DesignDraft {
    pub operators: Option<Vec<OperatorKind>>,
    pub units: Vec<ExecutionUnitSpec>,
    pub register_file: Option<RegisterFileSpec>,
    pub interconnect: Option<InterconnectSpec>,
    pub controller: Option<ControllerSpec>,
    pub memory: Option<MemorySpec>,
}

impl DesignDraft {
    /// Phase 1: instantiate `parallelism` execution units, each hosting the
    /// full operator sequence for the target kind.
    pub fn tile_operators(
        &mut self,
        config: &Configuration,
        catalog: &OperatorCatalog,
    ) -> Result<(), SynthesisError> {
        let parallelism = config.parallelism();
        if parallelism < 1 {
            return Err(SynthesisError::NoExecutionUnits { parallelism });
        }

        let ops = operator_sequence(config.target());
        if let Some(&missing) = ops.iter().find(|op| catalog.get(**op).is_none()) {
            return Err(SynthesisError::UnknownOperator { operator: missing });
        }

        self.units = (0..parallelism)
            .map(|i| ExecutionUnitSpec::new(i, ops.clone()))
            .collect();
        self.operators = Some(ops);
        Ok(())
    }

    /// Phase 2: size the register file from the unit port totals and build
    /// the interconnect.
    pub fn generate_dataflow(&mut self, config: &Configuration) -> Result<(), SynthesisError> {
        self.require_tiled(Phase::DataflowGeneration)?;

        let total_reads: u32 = self.units.iter().map(|eu| eu.input_ports).sum();
        let total_writes: u32 = self.units.iter().map(|eu| eu.output_ports).sum();

        self.register_file = Some(RegisterFileSpec {
            depth: REGISTER_FILE_DEPTH,
            read_ports: total_reads,
            write_ports: total_writes,
        });
        self.interconnect = Some(TopologySelector::select(
            config.parallelism(),
            &self.units,
            config.interconnect(),
        ));
        Ok(())
    }

    /// Phase 3: pick the controller variant for the target kind.
    pub fn collapse_control(&mut self, config: &Configuration) -> Result<(), SynthesisError> {
        self.require_tiled(Phase::ControlCollapse)?;

        let p = config.parallelism();
        self.controller = Some(match config.target() {
            TargetKind::Cpu => ControllerSpec::OutOfOrder {
                width: p,
                rob_entries: p * 4,
            },
            TargetKind::Npu => ControllerSpec::Systolic { dim: p },
        });
        Ok(())
    }

    /// Phase 4: size the load-store unit and cache.
    pub fn integrate_memory(&mut self, config: &Configuration) -> Result<(), SynthesisError> {
        self.require_tiled(Phase::MemoryIntegration)?;

        let p = config.parallelism();
        let cache = config.cache();
        let sets = cache.size_bytes / (u64::from(cache.ways) * u64::from(cache.line_size));
        self.memory = Some(MemorySpec {
            lsu_ports: p / 2,
            mshrs: p * 2,
            cache: CacheSpec {
                size_bytes: cache.size_bytes,
                ways: cache.ways,
                line_size: cache.line_size,
                sets,
                mshrs: cache.mshrs,
                write_policy: cache.write_policy,
            },
        });
        Ok(())
    }

    /// Assemble the finished design. Fails if any phase has not run.
    pub fn finish(self, config: &Configuration) -> Result<SynthesizedDesign, SynthesisError> {
        let incomplete = |phase: Phase| SynthesisError::PhaseOrder { phase: phase.name() };

        let operators = self.operators.ok_or_else(|| incomplete(Phase::OperatorTiling))?;
        let register_file = self
            .register_file
            .ok_or_else(|| incomplete(Phase::DataflowGeneration))?;
        let interconnect = self
            .interconnect
            .ok_or_else(|| incomplete(Phase::DataflowGeneration))?;
        let controller = self
            .controller
            .ok_or_else(|| incomplete(Phase::ControlCollapse))?;
        let memory = self
            .memory
            .ok_or_else(|| incomplete(Phase::MemoryIntegration))?;

        debug!("synthesis complete: {} units", self.units.len());

        Ok(SynthesizedDesign {
            target: config.target(),
            parallelism: config.parallelism(),
            isa: config.isa(),
            operators,
            units: self.units,
            register_file,
            interconnect,
            controller,
            memory,
        })
    }

    /// Borrowed view for validating a partially built design.
    pub fn parts(&self) -> DesignParts<'_> {
        DesignParts {
            units: &self.units,
            register_file: self.register_file.as_ref(),
            interconnect: self.interconnect.as_ref(),
            controller: self.controller.as_ref(),
            memory: self.memory.as_ref(),
        }
    }

    fn require_tiled(&self, phase: Phase) -> Result<(), SynthesisError> {
        if self.operators.is_none() {
            return Err(SynthesisError::PhaseOrder { phase: phase.name() });
        }
        Ok(())
    }
}

impl<'a> From<&'a DesignDraft> for DesignParts<'a> {
    fn from(draft: &'a DesignDraft) -> Self {
        draft.parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigFile, Isa, Topology};
    use crate::design::InterconnectKind;
    use crate::observer::{NoopObserver, RecordingObserver};

    fn config(target: &str, parallelism: i64, topology: Option<&str>) -> Configuration {
        let mut file = ConfigFile {
            target: target.into(),
            parallelism,
            ..ConfigFile::default()
        };
        file.interconnect.topology = topology.map(String::from);
        file.validate().unwrap()
    }

    fn run(config: &Configuration) -> SynthesizedDesign {
        synthesize(config, &OperatorCatalog::standard(), &mut NoopObserver).unwrap()
    }

    #[test]
    fn cpu_p4_crossbar_scenario() {
        let design = run(&config("CPU", 4, Some("crossbar")));
        assert_eq!(design.eu_count(), 4);
        assert_eq!(design.register_file.read_ports, 8);
        assert_eq!(design.register_file.write_ports, 4);
        assert_eq!(design.register_file.depth, 32);
        assert_eq!(design.interconnect.kind, InterconnectKind::Crossbar { n: 4 });
        assert_eq!(design.interconnect.edge_count(), 12);
        assert_eq!(
            design.controller,
            ControllerSpec::OutOfOrder {
                width: 4,
                rob_entries: 16
            }
        );
        assert_eq!(design.isa, Isa::Riscv);
    }

    #[test]
    fn npu_p256_scenario() {
        let design = run(&config("NPU", 256, None));
        assert_eq!(design.controller, ControllerSpec::Systolic { dim: 256 });
        assert_eq!(design.memory.lsu_ports, 128);
        assert_eq!(design.memory.mshrs, 512);
        assert_eq!(design.topology(), Topology::Noc);
    }

    #[test]
    fn every_unit_gets_the_whole_sequence() {
        let design = run(&config("CPU", 6, None));
        for (i, eu) in design.units.iter().enumerate() {
            assert_eq!(eu.index as usize, i);
            assert_eq!(eu.operators, operator_sequence(TargetKind::Cpu));
        }
        assert_eq!(
            operator_sequence(TargetKind::Npu),
            vec![OperatorKind::Mac, OperatorKind::VecAdd, OperatorKind::VecMul]
        );
    }

    #[test]
    fn port_invariant_holds_across_sizes() {
        for p in [1, 2, 3, 17, 100, 1024] {
            for target in ["CPU", "NPU"] {
                let design = run(&config(target, p, None));
                let rf = design.register_file;
                assert_eq!(rf.read_ports, 2 * rf.write_ports);
                assert_eq!(rf.write_ports as i64, p);
                assert_eq!(design.eu_count() as i64, p);
            }
        }
    }

    #[test]
    fn odd_parallelism_floors_lsu_ports() {
        let design = run(&config("CPU", 5, None));
        assert_eq!(design.memory.lsu_ports, 2);
        assert_eq!(design.memory.mshrs, 10);

        let design = run(&config("CPU", 1, None));
        assert_eq!(design.memory.lsu_ports, 0);
    }

    #[test]
    fn cache_geometry() {
        let design = run(&config("CPU", 4, None));
        // 32KB / (4 ways * 64B)
        assert_eq!(design.memory.cache.sets, 128);
        assert_eq!(design.memory.cache.mshrs, 16);

        let mut file = ConfigFile::default();
        file.cache.size = "256B".into();
        let design = run(&file.validate().unwrap());
        assert_eq!(design.memory.cache.sets, 1);
    }

    #[test]
    fn synthesis_is_deterministic() {
        let cfg = config("NPU", 12, None);
        let a = run(&cfg);
        let b = run(&cfg);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn observer_sees_phases_in_order() {
        let cfg = config("CPU", 4, None);
        let mut obs = RecordingObserver::default();
        synthesize(&cfg, &OperatorCatalog::standard(), &mut obs).unwrap();
        let phases: Vec<Phase> = obs.events.iter().map(|e| e.phase).collect();
        assert_eq!(
            phases,
            vec![
                Phase::OperatorTiling,
                Phase::DataflowGeneration,
                Phase::ControlCollapse,
                Phase::MemoryIntegration
            ]
        );
        assert!(obs.events[0].summary.contains("ALU, MUL, FPU, BRU"));
        assert!(obs.events[1].summary.contains("32x8R4W"));
    }

    #[test]
    fn missing_catalog_entry_fails() {
        let cfg = config("NPU", 4, None);
        let err = synthesize(&cfg, &OperatorCatalog::empty(), &mut NoopObserver).unwrap_err();
        assert!(matches!(
            err,
            SynthesisError::UnknownOperator {
                operator: OperatorKind::Mac
            }
        ));
    }

    #[test]
    fn phases_out_of_order_are_rejected() {
        let cfg = config("CPU", 4, None);
        let mut draft = DesignDraft::default();
        assert!(draft.generate_dataflow(&cfg).is_err());
        assert!(draft.clone().finish(&cfg).is_err());

        draft.tile_operators(&cfg, &OperatorCatalog::standard()).unwrap();
        draft.collapse_control(&cfg).unwrap();
        let parts = draft.parts();
        assert_eq!(parts.units.len(), 4);
        assert!(parts.register_file.is_none());
        assert!(parts.controller.is_some());
    }
}
