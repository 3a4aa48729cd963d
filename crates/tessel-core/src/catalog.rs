//! Operator catalog.
//!
//! A fixed table of the functional operators an execution unit can host,
//! with the latency/area/power figures the estimators and the RTL emitter
//! read. The catalog is an ordinary value: it is built once, optionally
//! patched by configuration overrides, and passed by reference to every
//! consumer.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A kind of functional operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorKind {
    Alu,
    Mul,
    Fpu,
    Mac,
    Bru,
    Lsu,
    VecAdd,
    VecMul,
}

impl OperatorKind {
    pub const ALL: [OperatorKind; 8] = [
        OperatorKind::Alu,
        OperatorKind::Mul,
        OperatorKind::Fpu,
        OperatorKind::Mac,
        OperatorKind::Bru,
        OperatorKind::Lsu,
        OperatorKind::VecAdd,
        OperatorKind::VecMul,
    ];

    /// Canonical upper-case name (e.g. `"VEC_ADD"`).
    pub fn name(&self) -> &'static str {
        match self {
            OperatorKind::Alu => "ALU",
            OperatorKind::Mul => "MUL",
            OperatorKind::Fpu => "FPU",
            OperatorKind::Mac => "MAC",
            OperatorKind::Bru => "BRU",
            OperatorKind::Lsu => "LSU",
            OperatorKind::VecAdd => "VEC_ADD",
            OperatorKind::VecMul => "VEC_MUL",
        }
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperatorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperatorKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = OperatorKind::ALL.iter().map(|k| k.name()).collect();
                ConfigError::invalid("operators.name", s, &names)
            })
    }
}

/// Catalog entry describing one operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorSpec {
    pub kind: OperatorKind,
    /// Latency in cycles.
    pub latency: u32,
    /// Area in µm².
    pub area_um2: f64,
    /// Power in mW.
    pub power_mw: f64,
    /// Supported operand bit-widths.
    pub bitwidths: Vec<u32>,
}

/// A validated patch applied on top of a catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorPatch {
    pub kind: OperatorKind,
    pub latency: Option<u32>,
    pub area_um2: Option<f64>,
    pub power_mw: Option<f64>,
    pub bitwidths: Option<Vec<u32>>,
}

/// The table of available operators.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperatorCatalog {
    entries: BTreeMap<OperatorKind, OperatorSpec>,
}

impl OperatorCatalog {
    /// An empty catalog. Mostly useful in tests.
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// The standard operator table.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(spec(OperatorKind::Alu, 1, 45.2, 12.5, &[32, 64]));
        catalog.insert(spec(OperatorKind::Mul, 3, 120.5, 35.8, &[32, 64]));
        catalog.insert(spec(OperatorKind::Fpu, 4, 210.5, 85.2, &[32, 64]));
        catalog.insert(spec(OperatorKind::Mac, 1, 185.0, 65.5, &[8, 16, 32]));
        catalog.insert(spec(OperatorKind::Bru, 1, 65.0, 22.5, &[32, 64]));
        catalog.insert(spec(OperatorKind::Lsu, 2, 150.0, 45.0, &[32, 64]));
        catalog.insert(spec(OperatorKind::VecAdd, 1, 50.0, 20.0, &[8, 16, 32]));
        catalog.insert(spec(OperatorKind::VecMul, 1, 50.0, 20.0, &[8, 16, 32]));
        catalog
    }

    /// Insert or replace an entry.
    pub fn insert(&mut self, spec: OperatorSpec) {
        self.entries.insert(spec.kind, spec);
    }

    /// Look up an operator.
    pub fn get(&self, kind: OperatorKind) -> Option<&OperatorSpec> {
        self.entries.get(&kind)
    }

    /// All entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &OperatorSpec> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return a copy of this catalog with the given patches applied in order.
    ///
    /// Patches for kinds absent from the catalog are ignored.
    pub fn with_overrides(&self, patches: &[OperatorPatch]) -> Self {
        let mut catalog = self.clone();
        for patch in patches {
            if let Some(entry) = catalog.entries.get_mut(&patch.kind) {
                if let Some(latency) = patch.latency {
                    entry.latency = latency;
                }
                if let Some(area) = patch.area_um2 {
                    entry.area_um2 = area;
                }
                if let Some(power) = patch.power_mw {
                    entry.power_mw = power;
                }
                if let Some(ref widths) = patch.bitwidths {
                    entry.bitwidths = widths.clone();
                }
            }
        }
        catalog
    }
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn spec(kind: OperatorKind, latency: u32, area: f64, power: f64, widths: &[u32]) -> OperatorSpec {
    OperatorSpec {
        kind,
        latency,
        area_um2: area,
        power_mw: power,
        bitwidths: widths.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_catalog_contents() {
        let catalog = OperatorCatalog::standard();
        assert_eq!(catalog.len(), 8);
        let fpu = catalog.get(OperatorKind::Fpu).unwrap();
        assert_eq!(fpu.latency, 4);
        assert_eq!(fpu.area_um2, 210.5);
        assert_eq!(fpu.power_mw, 85.2);
        assert_eq!(catalog.get(OperatorKind::Mac).unwrap().bitwidths, vec![8, 16, 32]);
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in OperatorKind::ALL {
            assert_eq!(kind.name().parse::<OperatorKind>().unwrap(), kind);
        }
        assert_eq!(OperatorKind::VecMul.to_string(), "VEC_MUL");
    }

    #[test]
    fn unknown_operator_name_is_rejected() {
        let err = "DIV".parse::<OperatorKind>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("operators.name"));
        assert!(msg.contains("DIV"));
        assert!(msg.contains("VEC_ADD"));
    }

    #[test]
    fn overrides_patch_a_copy() {
        let base = OperatorCatalog::standard();
        let patched = base.with_overrides(&[OperatorPatch {
            kind: OperatorKind::Alu,
            latency: Some(2),
            area_um2: None,
            power_mw: Some(10.0),
            bitwidths: None,
        }]);

        let alu = patched.get(OperatorKind::Alu).unwrap();
        assert_eq!(alu.latency, 2);
        assert_eq!(alu.area_um2, 45.2);
        assert_eq!(alu.power_mw, 10.0);
        assert_eq!(base.get(OperatorKind::Alu).unwrap().latency, 1);
    }

    #[test]
    fn iteration_follows_declaration_order() {
        let names: Vec<&str> = OperatorCatalog::standard()
            .iter()
            .map(|s| s.kind.name())
            .collect();
        assert_eq!(
            names,
            vec!["ALU", "MUL", "FPU", "MAC", "BRU", "LSU", "VEC_ADD", "VEC_MUL"]
        );
    }
}
