//! Core of the tessel architecture synthesizer.
//!
//! Turns a validated configuration into a structural processor design through
//! four ordered phases: operator tiling, dataflow generation, control collapse,
//! and memory integration.
//!
//! - **Configuration:** raw TOML record plus a validated, immutable form
//! - **Operator catalog:** latency/area/power figures per functional operator
//! - **Pipeline:** the four phases and the topology selector
//! - **Generator:** a session holding the current design and its stats

pub mod catalog;
pub mod config;
pub mod design;
pub mod error;
pub mod generator;
pub mod hash;
pub mod observer;
pub mod parse;
pub mod pipeline;
pub mod stats;
pub mod topology;

pub use catalog::{OperatorCatalog, OperatorKind, OperatorPatch, OperatorSpec};
pub use config::{
    Arbitration, CacheConfig, ConfigFile, Configuration, InterconnectConfig, Isa, TargetKind,
    TimingConfig, Topology, WritePolicy, MAX_PARALLELISM, MIN_PARALLELISM,
};
pub use design::{
    CacheSpec, Connection, ControllerSpec, DesignParts, Endpoint, ExecutionUnitSpec,
    InterconnectKind, InterconnectSpec, MemorySpec, RegisterFileSpec, SynthesizedDesign,
};
pub use error::{ConfigError, PreconditionError, SynthesisError};
pub use generator::Generator;
pub use observer::{LogObserver, NoopObserver, Phase, PhaseEvent, SynthesisObserver};
pub use pipeline::{operator_sequence, synthesize, DesignDraft};
pub use stats::DesignStats;
pub use topology::TopologySelector;
