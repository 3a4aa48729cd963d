//! Synthesized design model.
//!
//! Every component is a plain value produced by one pipeline phase. The
//! interconnect and controller are closed tagged variants; consumers match on
//! them rather than dispatching through a module hierarchy.

use serde::Serialize;

use crate::catalog::OperatorKind;
use crate::config::{Arbitration, Isa, TargetKind, Topology, WritePolicy};
use crate::hash::{content_hash, hash_hex};

/// Fixed register-file depth (architectural registers).
pub const REGISTER_FILE_DEPTH: u32 = 32;

/// Read ports consumed by every execution unit.
pub const EU_INPUT_PORTS: u32 = 2;

/// Write ports consumed by every execution unit.
pub const EU_OUTPUT_PORTS: u32 = 1;

/// One execution unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecutionUnitSpec {
    /// Position in the unit pool, `0..parallelism`.
    pub index: u32,
    /// Operators instantiated inside this unit.
    pub operators: Vec<OperatorKind>,
    pub input_ports: u32,
    pub output_ports: u32,
}

impl ExecutionUnitSpec {
    pub fn new(index: u32, operators: Vec<OperatorKind>) -> Self {
        Self {
            index,
            operators,
            input_ports: EU_INPUT_PORTS,
            output_ports: EU_OUTPUT_PORTS,
        }
    }

    /// Instance name used in reports and emitted RTL.
    pub fn name(&self) -> String {
        format!("eu_{}", self.index)
    }
}

/// Multi-ported register file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegisterFileSpec {
    pub depth: u32,
    pub read_ports: u32,
    pub write_ports: u32,
}

/// A node in the interconnect graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Endpoint {
    /// An execution unit, by pool index.
    Unit(u32),
    /// A network-on-chip router, by index.
    Router(u32),
}

impl Endpoint {
    pub fn is_router(&self) -> bool {
        matches!(self, Endpoint::Router(_))
    }
}

/// A directed link between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Connection {
    pub from: Endpoint,
    pub to: Endpoint,
}

impl Connection {
    pub fn new(from: Endpoint, to: Endpoint) -> Self {
        Self { from, to }
    }
}

/// Shape of the interconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InterconnectKind {
    /// Full crossbar over `n` units.
    Crossbar { n: u32 },
    /// 2-D mesh with `dim` columns.
    Mesh { dim: u32 },
    /// Network-on-chip with one router per unit.
    Noc { n: u32 },
}

impl InterconnectKind {
    pub fn topology(&self) -> Topology {
        match self {
            InterconnectKind::Crossbar { .. } => Topology::Crossbar,
            InterconnectKind::Mesh { .. } => Topology::Mesh,
            InterconnectKind::Noc { .. } => Topology::Noc,
        }
    }
}

/// Interconnect variant plus its concrete connection set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterconnectSpec {
    pub kind: InterconnectKind,
    pub arbitration: Arbitration,
    pub buffer_depth: u32,
    pub connections: Vec<Connection>,
}

impl InterconnectSpec {
    pub fn topology(&self) -> Topology {
        self.kind.topology()
    }

    pub fn edge_count(&self) -> usize {
        self.connections.len()
    }

    /// Connections with a router on both ends.
    pub fn router_to_router_count(&self) -> usize {
        self.connections
            .iter()
            .filter(|c| c.from.is_router() && c.to.is_router())
            .count()
    }
}

/// Instruction controller, chosen by target kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ControllerSpec {
    /// Out-of-order scheduler with a reorder buffer.
    OutOfOrder { width: u32, rob_entries: u32 },
    /// Fixed-schedule controller for a systolic array.
    Systolic { dim: u32 },
}

impl ControllerSpec {
    pub fn name(&self) -> &'static str {
        match self {
            ControllerSpec::OutOfOrder { .. } => "out-of-order",
            ControllerSpec::Systolic { .. } => "systolic",
        }
    }
}

/// Data cache geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CacheSpec {
    pub size_bytes: u64,
    pub ways: u32,
    pub line_size: u32,
    pub sets: u64,
    pub mshrs: u32,
    pub write_policy: WritePolicy,
}

/// Load-store unit and cache sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MemorySpec {
    pub lsu_ports: u32,
    pub mshrs: u32,
    pub cache: CacheSpec,
}

/// The complete, immutable output of one synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesizedDesign {
    pub target: TargetKind,
    pub parallelism: u32,
    pub isa: Isa,
    /// Operator sequence chosen for the target kind.
    pub operators: Vec<OperatorKind>,
    pub units: Vec<ExecutionUnitSpec>,
    pub register_file: RegisterFileSpec,
    pub interconnect: InterconnectSpec,
    pub controller: ControllerSpec,
    pub memory: MemorySpec,
}

impl SynthesizedDesign {
    pub fn eu_count(&self) -> usize {
        self.units.len()
    }

    pub fn topology(&self) -> Topology {
        self.interconnect.topology()
    }

    /// SHA-256 of the design's canonical serialization, as lowercase hex.
    pub fn fingerprint(&self) -> String {
        // No maps with non-string keys, so serialization cannot fail.
        let hash = content_hash(self).expect("design serialization should not fail");
        hash_hex(&hash)
    }
}

/// Borrowed view over a design in which any component may be absent.
///
/// The validator inspects this view so that missing pieces can be reported
/// rather than being unrepresentable.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesignParts<'a> {
    pub units: &'a [ExecutionUnitSpec],
    pub register_file: Option<&'a RegisterFileSpec>,
    pub interconnect: Option<&'a InterconnectSpec>,
    pub controller: Option<&'a ControllerSpec>,
    pub memory: Option<&'a MemorySpec>,
}

impl<'a> From<&'a SynthesizedDesign> for DesignParts<'a> {
    fn from(design: &'a SynthesizedDesign) -> Self {
        Self {
            units: &design.units,
            register_file: Some(&design.register_file),
            interconnect: Some(&design.interconnect),
            controller: Some(&design.controller),
            memory: Some(&design.memory),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_unit_ports() {
        let eu = ExecutionUnitSpec::new(3, vec![OperatorKind::Alu]);
        assert_eq!(eu.input_ports, 2);
        assert_eq!(eu.output_ports, 1);
        assert_eq!(eu.name(), "eu_3");
    }

    #[test]
    fn interconnect_kind_maps_to_topology() {
        assert_eq!(InterconnectKind::Crossbar { n: 4 }.topology(), Topology::Crossbar);
        assert_eq!(InterconnectKind::Mesh { dim: 3 }.topology(), Topology::Mesh);
        assert_eq!(InterconnectKind::Noc { n: 32 }.topology(), Topology::Noc);
    }

    #[test]
    fn router_links_are_counted() {
        let spec = InterconnectSpec {
            kind: InterconnectKind::Noc { n: 2 },
            arbitration: Arbitration::Lru,
            buffer_depth: 4,
            connections: vec![
                Connection::new(Endpoint::Unit(0), Endpoint::Router(0)),
                Connection::new(Endpoint::Router(0), Endpoint::Router(1)),
            ],
        };
        assert_eq!(spec.edge_count(), 2);
        assert_eq!(spec.router_to_router_count(), 1);
    }

    #[test]
    fn empty_parts_view() {
        let parts = DesignParts::default();
        assert!(parts.units.is_empty());
        assert!(parts.register_file.is_none());
        assert!(parts.controller.is_none());
    }
}
