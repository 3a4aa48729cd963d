//! Stats surface for reporting collaborators.

use std::fmt;

use serde::Serialize;

use crate::config::{Arbitration, Isa, TargetKind, Topology};
use crate::design::SynthesizedDesign;

/// Summary of a synthesized design.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesignStats {
    pub target: TargetKind,
    pub parallelism: u32,
    pub eu_count: usize,
    pub isa: Isa,
    pub topology: Topology,
    pub arbitration: Arbitration,
    pub fingerprint: String,
}

impl DesignStats {
    pub fn from_design(design: &SynthesizedDesign) -> Self {
        Self {
            target: design.target,
            parallelism: design.parallelism,
            eu_count: design.eu_count(),
            isa: design.isa,
            topology: design.topology(),
            arbitration: design.interconnect.arbitration,
            fingerprint: design.fingerprint(),
        }
    }

    /// Ordered key/value pairs.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("target", self.target.to_string()),
            ("parallelism", self.parallelism.to_string()),
            ("eu_count", self.eu_count.to_string()),
            ("isa", self.isa.to_string()),
            ("topology", self.topology.to_string()),
            ("arbitration", self.arbitration.to_string()),
            ("fingerprint", self.fingerprint.clone()),
        ]
    }
}

impl From<&SynthesizedDesign> for DesignStats {
    fn from(design: &SynthesizedDesign) -> Self {
        Self::from_design(design)
    }
}

impl fmt::Display for DesignStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries();
        let width = entries.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (key, value) in entries {
            writeln!(f, "{:<width$}  {value}", format!("{key}:"), width = width + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> DesignStats {
        DesignStats {
            target: TargetKind::Npu,
            parallelism: 8,
            eu_count: 8,
            isa: Isa::Custom,
            topology: Topology::Mesh,
            arbitration: Arbitration::RoundRobin,
            fingerprint: "abc123".into(),
        }
    }

    #[test]
    fn entries_are_ordered() {
        let keys: Vec<&str> = stats().entries().into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec![
                "target",
                "parallelism",
                "eu_count",
                "isa",
                "topology",
                "arbitration",
                "fingerprint"
            ]
        );
    }

    #[test]
    fn display_aligns_values() {
        let text = stats().to_string();
        assert!(text.contains("target:       NPU\n"), "{text}");
        assert!(text.contains("arbitration:  round_robin\n"), "{text}");
        assert_eq!(text.lines().count(), 7);
    }

    #[test]
    fn serializes_enums_by_name() {
        let json = serde_json::to_value(stats()).unwrap();
        assert_eq!(json["eu_count"], 8);
        assert_eq!(json["parallelism"], 8);
    }
}
