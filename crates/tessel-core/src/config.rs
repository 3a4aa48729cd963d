//! Generator configuration.
//!
//! Configuration exists in two layers:
//! - [`ConfigFile`]: the loosely-typed record read from TOML or assembled by a
//!   front end. Every field has the generator's default, and enumerated fields
//!   are plain strings.
//! - [`Configuration`]: the validated, immutable record the pipeline consumes.
//!   It can only be obtained through [`ConfigFile::validate`], so an invalid
//!   value never reaches synthesis. Values are rejected, never clamped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::{OperatorKind, OperatorPatch};
use crate::error::{ConfigError, Result};

/// Smallest accepted degree of parallelism.
pub const MIN_PARALLELISM: u32 = 1;
/// Largest accepted degree of parallelism.
pub const MAX_PARALLELISM: u32 = 1024;

// ---------------------------------------------------------------------------
// Enumerated settings
// ---------------------------------------------------------------------------

/// Kind of processor to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "NPU")]
    Npu,
}

impl TargetKind {
    const NAMES: [&'static str; 2] = ["CPU", "NPU"];

    pub fn name(&self) -> &'static str {
        match self {
            TargetKind::Cpu => "CPU",
            TargetKind::Npu => "NPU",
        }
    }
}

impl FromStr for TargetKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "CPU" => Ok(TargetKind::Cpu),
            "NPU" => Ok(TargetKind::Npu),
            _ => Err(ConfigError::invalid("target", s, &Self::NAMES)),
        }
    }
}

/// Instruction-set family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Isa {
    Riscv,
    Arm,
    X86,
    Custom,
}

impl Isa {
    const NAMES: [&'static str; 4] = ["RISCV", "ARM", "X86", "CUSTOM"];

    pub fn name(&self) -> &'static str {
        match self {
            Isa::Riscv => "RISCV",
            Isa::Arm => "ARM",
            Isa::X86 => "X86",
            Isa::Custom => "CUSTOM",
        }
    }
}

impl FromStr for Isa {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "RISCV" => Ok(Isa::Riscv),
            "ARM" => Ok(Isa::Arm),
            "X86" => Ok(Isa::X86),
            "CUSTOM" => Ok(Isa::Custom),
            _ => Err(ConfigError::invalid("isa", s, &Self::NAMES)),
        }
    }
}

/// Interconnect topology family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Crossbar,
    Mesh,
    Noc,
}

impl Topology {
    const NAMES: [&'static str; 3] = ["crossbar", "mesh", "noc"];

    pub fn name(&self) -> &'static str {
        match self {
            Topology::Crossbar => "crossbar",
            Topology::Mesh => "mesh",
            Topology::Noc => "noc",
        }
    }
}

impl FromStr for Topology {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "crossbar" => Ok(Topology::Crossbar),
            "mesh" => Ok(Topology::Mesh),
            "noc" => Ok(Topology::Noc),
            _ => Err(ConfigError::invalid("interconnect.topology", s, &Self::NAMES)),
        }
    }
}

/// Arbitration policy of the interconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arbitration {
    #[serde(rename = "LRU")]
    Lru,
    #[serde(rename = "priority")]
    Priority,
    #[serde(rename = "round_robin")]
    RoundRobin,
}

impl Arbitration {
    const NAMES: [&'static str; 3] = ["LRU", "priority", "round_robin"];

    pub fn name(&self) -> &'static str {
        match self {
            Arbitration::Lru => "LRU",
            Arbitration::Priority => "priority",
            Arbitration::RoundRobin => "round_robin",
        }
    }
}

impl FromStr for Arbitration {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "LRU" => Ok(Arbitration::Lru),
            "priority" => Ok(Arbitration::Priority),
            "round_robin" => Ok(Arbitration::RoundRobin),
            _ => Err(ConfigError::invalid("interconnect.arbitration", s, &Self::NAMES)),
        }
    }
}

/// Cache write policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WritePolicy {
    Writeback,
    Writethrough,
}

impl WritePolicy {
    const NAMES: [&'static str; 2] = ["writeback", "writethrough"];

    pub fn name(&self) -> &'static str {
        match self {
            WritePolicy::Writeback => "writeback",
            WritePolicy::Writethrough => "writethrough",
        }
    }
}

impl FromStr for WritePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "writeback" => Ok(WritePolicy::Writeback),
            "writethrough" => Ok(WritePolicy::Writethrough),
            _ => Err(ConfigError::invalid("cache.write_policy", s, &Self::NAMES)),
        }
    }
}

macro_rules! display_by_name {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.name())
            }
        })*
    };
}

display_by_name!(TargetKind, Isa, Topology, Arbitration, WritePolicy);

// ---------------------------------------------------------------------------
// Raw configuration
// ---------------------------------------------------------------------------

/// Cache section of the raw configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// Capacity with unit suffix, e.g. `"32KB"`.
    pub size: String,
    pub ways: u32,
    /// Line size in bytes.
    pub line_size: u32,
    pub mshrs: u32,
    pub write_policy: String,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            size: "32KB".into(),
            ways: 4,
            line_size: 64,
            mshrs: 16,
            write_policy: "writeback".into(),
        }
    }
}

/// Interconnect section of the raw configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterconnectSection {
    /// Explicit topology. `None` lets the topology selector decide.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topology: Option<String>,
    pub arbitration: String,
    pub buffer_depth: u32,
}

impl Default for InterconnectSection {
    fn default() -> Self {
        Self {
            topology: None,
            arbitration: "LRU".into(),
            buffer_depth: 4,
        }
    }
}

/// Timing section of the raw configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingSection {
    /// Target clock frequency in GHz.
    pub target_frequency: f64,
    pub process_node: String,
    /// Setup time in ns.
    pub setup_time: f64,
    /// Hold time in ns.
    pub hold_time: f64,
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            target_frequency: 2.5,
            process_node: "7nm".into(),
            setup_time: 0.05,
            hold_time: 0.05,
        }
    }
}

/// An operator override entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatorOverride {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latency: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitwidths: Option<Vec<u32>>,
}

/// Unvalidated configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub target: String,
    pub parallelism: i64,
    pub isa: String,
    pub debug: bool,
    pub dump_intermediate: bool,
    pub verbose: bool,
    pub cache: CacheSection,
    pub interconnect: InterconnectSection,
    pub timing: TimingSection,
    pub operators: Vec<OperatorOverride>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            target: "CPU".into(),
            parallelism: 4,
            isa: "RISCV".into(),
            debug: false,
            dump_intermediate: false,
            verbose: false,
            cache: CacheSection::default(),
            interconnect: InterconnectSection::default(),
            timing: TimingSection::default(),
            operators: Vec::new(),
        }
    }
}

impl ConfigFile {
    /// Validate every field and produce an immutable [`Configuration`].
    ///
    /// Fields are checked in declaration order; the first failure is returned.
    pub fn validate(&self) -> Result<Configuration> {
        let target: TargetKind = self.target.parse()?;

        if self.parallelism < i64::from(MIN_PARALLELISM)
            || self.parallelism > i64::from(MAX_PARALLELISM)
        {
            return Err(ConfigError::out_of_range(
                "parallelism",
                self.parallelism,
                format!("[{MIN_PARALLELISM}, {MAX_PARALLELISM}]"),
            ));
        }
        let parallelism = self.parallelism as u32;

        let isa: Isa = self.isa.parse()?;

        let cache = self.validate_cache()?;
        let interconnect = self.validate_interconnect()?;
        let timing = self.validate_timing()?;

        let operator_overrides = self
            .operators
            .iter()
            .map(validate_override)
            .collect::<Result<Vec<_>>>()?;

        Ok(Configuration {
            target,
            parallelism,
            isa,
            cache,
            interconnect,
            timing,
            operator_overrides,
            debug: self.debug,
            dump_intermediate: self.dump_intermediate,
            verbose: self.verbose,
        })
    }

    fn validate_cache(&self) -> Result<CacheConfig> {
        let c = &self.cache;
        let size_bytes = parse_size(&c.size)?;
        if c.ways == 0 {
            return Err(ConfigError::out_of_range("cache.ways", c.ways, ">= 1"));
        }
        if c.line_size < 4 || !c.line_size.is_power_of_two() {
            return Err(ConfigError::out_of_range(
                "cache.line_size",
                c.line_size,
                "a power of two >= 4",
            ));
        }
        let set_bytes = u64::from(c.ways) * u64::from(c.line_size);
        if size_bytes < set_bytes {
            return Err(ConfigError::out_of_range(
                "cache.size",
                format!("'{}'", c.size),
                format!(">= ways * line_size ({set_bytes}B)"),
            ));
        }
        if c.mshrs == 0 {
            return Err(ConfigError::out_of_range("cache.mshrs", c.mshrs, ">= 1"));
        }
        let write_policy: WritePolicy = c.write_policy.parse()?;
        Ok(CacheConfig {
            size_bytes,
            ways: c.ways,
            line_size: c.line_size,
            mshrs: c.mshrs,
            write_policy,
        })
    }

    fn validate_interconnect(&self) -> Result<InterconnectConfig> {
        let i = &self.interconnect;
        let topology = i
            .topology
            .as_deref()
            .map(str::parse::<Topology>)
            .transpose()?;
        let arbitration: Arbitration = i.arbitration.parse()?;
        if i.buffer_depth == 0 {
            return Err(ConfigError::out_of_range(
                "interconnect.buffer_depth",
                i.buffer_depth,
                ">= 1",
            ));
        }
        Ok(InterconnectConfig {
            topology,
            arbitration,
            buffer_depth: i.buffer_depth,
        })
    }

    fn validate_timing(&self) -> Result<TimingConfig> {
        let t = &self.timing;
        if !(t.target_frequency.is_finite() && t.target_frequency > 0.0) {
            return Err(ConfigError::out_of_range(
                "timing.target_frequency",
                t.target_frequency,
                "(0, inf) GHz",
            ));
        }
        if !(t.setup_time.is_finite() && t.setup_time >= 0.0) {
            return Err(ConfigError::out_of_range(
                "timing.setup_time",
                t.setup_time,
                "[0, inf) ns",
            ));
        }
        if !(t.hold_time.is_finite() && t.hold_time >= 0.0) {
            return Err(ConfigError::out_of_range(
                "timing.hold_time",
                t.hold_time,
                "[0, inf) ns",
            ));
        }
        Ok(TimingConfig {
            target_frequency_ghz: t.target_frequency,
            process_node: t.process_node.clone(),
            setup_time_ns: t.setup_time,
            hold_time_ns: t.hold_time,
        })
    }
}

fn validate_override(o: &OperatorOverride) -> Result<OperatorPatch> {
    let kind: OperatorKind = o.name.parse()?;
    if o.latency == Some(0) {
        return Err(ConfigError::out_of_range("operators.latency", 0, ">= 1 cycle"));
    }
    if let Some(area) = o.area {
        if !(area.is_finite() && area >= 0.0) {
            return Err(ConfigError::out_of_range("operators.area", area, "[0, inf) um2"));
        }
    }
    if let Some(power) = o.power {
        if !(power.is_finite() && power >= 0.0) {
            return Err(ConfigError::out_of_range("operators.power", power, "[0, inf) mW"));
        }
    }
    if let Some(ref widths) = o.bitwidths {
        if widths.is_empty() || widths.contains(&0) {
            return Err(ConfigError::out_of_range(
                "operators.bitwidths",
                format!("{widths:?}"),
                "a non-empty list of positive widths",
            ));
        }
    }
    Ok(OperatorPatch {
        kind,
        latency: o.latency,
        area_um2: o.area,
        power_mw: o.power,
        bitwidths: o.bitwidths.clone(),
    })
}

/// Parse a capacity such as `"32KB"`, `"1MB"`, or `"512B"` into bytes (1024-based).
pub fn parse_size(text: &str) -> Result<u64> {
    let trimmed = text.trim();
    let upper = trimmed.to_ascii_uppercase();
    let (digits, multiplier) = if let Some(n) = upper.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = upper.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = upper.strip_suffix('B') {
        (n, 1)
    } else {
        (upper.as_str(), 1)
    };

    let invalid = || {
        ConfigError::out_of_range("cache.size", format!("'{text}'"), "a positive size like 32KB")
    };
    let value: u64 = digits.trim().parse().map_err(|_| invalid())?;
    if value == 0 {
        return Err(invalid());
    }
    value.checked_mul(multiplier).ok_or_else(invalid)
}

// ---------------------------------------------------------------------------
// Validated configuration
// ---------------------------------------------------------------------------

/// Validated cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheConfig {
    pub size_bytes: u64,
    pub ways: u32,
    pub line_size: u32,
    pub mshrs: u32,
    pub write_policy: WritePolicy,
}

/// Validated interconnect settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterconnectConfig {
    /// Explicitly requested topology, if any.
    pub topology: Option<Topology>,
    pub arbitration: Arbitration,
    pub buffer_depth: u32,
}

/// Validated timing settings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimingConfig {
    pub target_frequency_ghz: f64,
    pub process_node: String,
    pub setup_time_ns: f64,
    pub hold_time_ns: f64,
}

impl TimingConfig {
    /// Clock period in ps.
    pub fn cycle_time_ps(&self) -> f64 {
        1000.0 / self.target_frequency_ghz
    }
}

/// Immutable, validated generator configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    target: TargetKind,
    parallelism: u32,
    isa: Isa,
    cache: CacheConfig,
    interconnect: InterconnectConfig,
    timing: TimingConfig,
    operator_overrides: Vec<OperatorPatch>,
    debug: bool,
    dump_intermediate: bool,
    verbose: bool,
}

impl Configuration {
    /// Validate a raw record. Equivalent to [`ConfigFile::validate`].
    pub fn from_file(file: &ConfigFile) -> Result<Self> {
        file.validate()
    }

    /// Build from the three headline knobs with every other setting defaulted.
    pub fn with_knobs(target: TargetKind, parallelism: u32, isa: Isa) -> Result<Self> {
        ConfigFile {
            target: target.name().into(),
            parallelism: i64::from(parallelism),
            isa: isa.name().into(),
            ..ConfigFile::default()
        }
        .validate()
    }

    pub fn target(&self) -> TargetKind {
        self.target
    }

    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    pub fn isa(&self) -> Isa {
        self.isa
    }

    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    pub fn interconnect(&self) -> &InterconnectConfig {
        &self.interconnect
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn operator_overrides(&self) -> &[OperatorPatch] {
        &self.operator_overrides
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn dump_intermediate(&self) -> bool {
        self.dump_intermediate
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }
}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Configuration(target={}, P={}, ISA={})",
            self.target, self.parallelism, self.isa
        )
    }
}
