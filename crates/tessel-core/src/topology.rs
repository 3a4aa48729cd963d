//! Interconnect topology selection and connection generation.

use log::debug;

use crate::config::{InterconnectConfig, Topology};
use crate::design::{Connection, Endpoint, ExecutionUnitSpec, InterconnectKind, InterconnectSpec};

/// Largest unit count served by a crossbar when the topology is derived.
pub const CROSSBAR_MAX_UNITS: u32 = 4;
/// Largest unit count served by a mesh when the topology is derived.
pub const MESH_MAX_UNITS: u32 = 16;

/// Builds the interconnect for a pool of execution units.
pub struct TopologySelector;

impl TopologySelector {
    /// Build the interconnect spec for `units`.
    ///
    /// An explicitly configured topology is always honored; otherwise one is
    /// derived from `parallelism`.
    pub fn select(
        parallelism: u32,
        units: &[ExecutionUnitSpec],
        config: &InterconnectConfig,
    ) -> InterconnectSpec {
        let topology = config
            .topology
            .unwrap_or_else(|| Self::derive(parallelism));
        let n = units.len() as u32;

        let (kind, connections) = match topology {
            Topology::Crossbar => (InterconnectKind::Crossbar { n }, crossbar_connections(n)),
            Topology::Mesh => {
                let dim = mesh_dim(parallelism);
                (InterconnectKind::Mesh { dim }, mesh_connections(n, dim))
            }
            Topology::Noc => (InterconnectKind::Noc { n }, noc_connections(n)),
        };

        debug!(
            "interconnect: {} over {} units, {} connections",
            topology,
            n,
            connections.len()
        );

        InterconnectSpec {
            kind,
            arbitration: config.arbitration,
            buffer_depth: config.buffer_depth,
            connections,
        }
    }

    /// Topology chosen when none is configured.
    pub fn derive(parallelism: u32) -> Topology {
        if parallelism <= CROSSBAR_MAX_UNITS {
            Topology::Crossbar
        } else if parallelism <= MESH_MAX_UNITS {
            Topology::Mesh
        } else {
            Topology::Noc
        }
    }
}

/// Side length of the square grid that holds `parallelism` units: ⌈√p⌉, at least 1.
pub fn mesh_dim(parallelism: u32) -> u32 {
    let mut dim: u32 = 1;
    while dim.saturating_mul(dim) < parallelism {
        dim += 1;
    }
    dim
}

/// Every ordered pair `(i, j)` with `i != j`.
pub fn crossbar_connections(n: u32) -> Vec<Connection> {
    let mut connections = Vec::with_capacity((n as usize) * (n.saturating_sub(1) as usize));
    for i in 0..n {
        for j in 0..n {
            if i != j {
                connections.push(Connection::new(Endpoint::Unit(i), Endpoint::Unit(j)));
            }
        }
    }
    connections
}

/// Right and below neighbors in a `dim`-column grid, without wraparound.
pub fn mesh_connections(n: u32, dim: u32) -> Vec<Connection> {
    let mut connections = Vec::new();
    if dim == 0 {
        return connections;
    }
    for i in 0..n {
        let x = i % dim;
        if x + 1 < dim && i + 1 < n {
            connections.push(Connection::new(Endpoint::Unit(i), Endpoint::Unit(i + 1)));
        }
        if i + dim < n {
            connections.push(Connection::new(Endpoint::Unit(i), Endpoint::Unit(i + dim)));
        }
    }
    connections
}

/// One router per unit; unit-to-router links only.
pub fn noc_connections(n: u32) -> Vec<Connection> {
    (0..n)
        .map(|i| Connection::new(Endpoint::Unit(i), Endpoint::Router(i)))
        .collect()
}
