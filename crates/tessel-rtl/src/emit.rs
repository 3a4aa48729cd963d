//! Top-level structural Verilog emission.
//!
//! The emitted module is a skeleton: it instantiates the support library's
//! modules with parameters and port slices computed from the design's
//! parallelism. Mesh and NoC interconnects are left as marked placeholders.

use log::debug;

use tessel_core::hash::short_hex;
use tessel_core::{
    ControllerSpec, InterconnectKind, OperatorCatalog, OperatorKind, SynthesizedDesign, TargetKind,
};

use crate::library;
use crate::widths::{decl, operand_slice, result_slice, BusWidths};

const INDENT: &str = "  ";
const RULE: &str =
    "//============================================================================";

/// Prefix of the generated top-level module name.
pub const MODULE_PREFIX: &str = "tessel";

/// Options that affect emitted text but not the design.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmitOptions {
    /// Value of the header's `Generated:` line. Omitted when `None`.
    pub timestamp: Option<String>,
    /// Append the support-module library after the top-level module.
    pub with_library: bool,
}

impl EmitOptions {
    pub fn with_timestamp(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: Some(timestamp.into()),
            ..Self::default()
        }
    }
}

/// Name of the top-level module, e.g. `tessel_cpu_p4`.
pub fn module_name(design: &SynthesizedDesign) -> String {
    format!(
        "{MODULE_PREFIX}_{}_p{}",
        design.target.name().to_lowercase(),
        design.parallelism
    )
}

/// Operator hosted by the instance block of unit `index`: round-robin over
/// the design's operator sequence.
pub fn instance_operator(design: &SynthesizedDesign, index: u32) -> Option<OperatorKind> {
    let ops = &design.operators;
    if ops.is_empty() {
        return None;
    }
    Some(ops[index as usize % ops.len()])
}

/// Render `design` as Verilog text.
///
/// Output depends only on `design`, the catalog latencies, and `options`.
pub fn emit(design: &SynthesizedDesign, catalog: &OperatorCatalog, options: &EmitOptions) -> String {
    let mut out = Vec::new();
    header(&mut out, design, options);
    out.push(String::new());
    module_decl(&mut out, design);
    out.push(String::new());
    signals(&mut out, design);
    out.push(String::new());
    execution_units(&mut out, design, catalog);
    out.push(String::new());
    interconnect(&mut out, design);
    out.push(String::new());
    control(&mut out, design);
    out.push(String::new());
    memory(&mut out, design);
    out.push(String::new());
    out.push("endmodule".into());

    let mut text = out.join("\n");
    text.push('\n');
    if options.with_library {
        text.push('\n');
        text.push_str(&library::support_library());
    }

    debug!(
        "emitted {} ({} lines)",
        module_name(design),
        text.lines().count()
    );
    text
}

fn section(out: &mut Vec<String>, title: &str) {
    out.push(RULE.into());
    out.push(format!("// {title}"));
    out.push(RULE.into());
    out.push(String::new());
}

fn header(out: &mut Vec<String>, design: &SynthesizedDesign, options: &EmitOptions) {
    let fingerprint = design.fingerprint();
    out.push(RULE.into());
    out.push("// tessel generated processor".into());
    out.push(format!("// Target: {}", design.target));
    out.push(format!("// Parallelism: {}", design.parallelism));
    out.push(format!("// ISA: {}", design.isa));
    out.push(format!("// Topology: {}", design.topology()));
    out.push(format!("// Fingerprint: {}", short_hex(&fingerprint, 16)));
    if let Some(ref ts) = options.timestamp {
        out.push(format!("// Generated: {ts}"));
    }
    out.push(RULE.into());
    out.push(String::new());
    out.push("`timescale 1ns/1ps".into());
}

fn module_decl(out: &mut Vec<String>, design: &SynthesizedDesign) {
    out.push(format!("module {} (", module_name(design)));
    out.push(format!("{INDENT}input  wire        clk,"));
    out.push(format!("{INDENT}input  wire        rst_n,"));
    out.push(String::new());

    if design.target == TargetKind::Cpu {
        out.push(format!("{INDENT}// Instruction Interface"));
        out.push(format!("{INDENT}input  wire [31:0] instr_addr,"));
        out.push(format!("{INDENT}input  wire [31:0] instr_data,"));
        out.push(format!("{INDENT}input  wire        instr_valid,"));
        out.push(format!("{INDENT}output wire        instr_ready,"));
        out.push(String::new());
    }

    out.push(format!("{INDENT}// Data Interface"));
    out.push(format!("{INDENT}output wire [31:0] data_addr,"));
    out.push(format!("{INDENT}inout  wire [63:0] data,"));
    out.push(format!("{INDENT}output wire        data_we,"));
    out.push(format!("{INDENT}output wire [7:0]  data_be,"));
    out.push(format!("{INDENT}output wire        data_valid,"));
    out.push(format!("{INDENT}input  wire        data_ready,"));
    out.push(String::new());

    out.push(format!("{INDENT}// Control Interface"));
    out.push(format!("{INDENT}output wire        proc_busy,"));
    out.push(format!("{INDENT}output wire        proc_done"));
    out.push(");".into());
}

fn signals(out: &mut Vec<String>, design: &SynthesizedDesign) {
    let w = BusWidths::for_parallelism(design.parallelism);
    section(out, "Internal Signals");

    out.push("// EU control signals".into());
    out.push(format!("wire {} eu_valid;", decl(w.valid)));
    out.push(format!("wire {} eu_ready;", decl(w.valid)));
    out.push(format!("wire {} eu_result;", decl(w.result)));
    out.push(String::new());

    out.push("// Register file interface".into());
    out.push(format!("wire {} rf_read_addr;", decl(w.read_addr)));
    out.push(format!("wire {} rf_read_data;", decl(w.read_data)));
    out.push(format!("wire {} rf_write_addr;", decl(w.write_addr)));
    out.push(format!("wire {} rf_write_data;", decl(w.write_data)));
    out.push(format!("wire {} rf_write_en;", decl(w.write_en)));
    out.push(String::new());

    out.push("// Control signals".into());
    out.push("reg  [31:0] pc;".into());
    out.push("wire [31:0] instr;".into());
    out.push("wire instr_valid_d;".into());
}

fn execution_units(out: &mut Vec<String>, design: &SynthesizedDesign, catalog: &OperatorCatalog) {
    section(out, "Execution Units");

    for i in 0..design.parallelism {
        let op = instance_operator(design, i);
        let name = op.map_or("NONE", |op| op.name());
        let latency = op
            .and_then(|op| catalog.get(op))
            .map_or(1, |spec| spec.latency);

        out.push(format!("// EU {i}: {name}"));
        out.push("execution_unit #(".into());
        out.push(format!("{INDENT}.OP_TYPE(\"{name}\"),"));
        out.push(format!("{INDENT}.LATENCY({latency})"));
        out.push(format!(") eu_{i} ("));
        out.push(format!("{INDENT}.clk(clk),"));
        out.push(format!("{INDENT}.rst_n(rst_n),"));
        out.push(format!("{INDENT}.valid(eu_valid[{i}]),"));
        out.push(format!("{INDENT}.ready(eu_ready[{i}]),"));
        out.push(format!("{INDENT}.operand_a(rf_read_data{}),", operand_slice(i, 0)));
        out.push(format!("{INDENT}.operand_b(rf_read_data{}),", operand_slice(i, 1)));
        out.push(format!("{INDENT}.result(eu_result{})", result_slice(i)));
        out.push(");".into());
        if i + 1 < design.parallelism {
            out.push(String::new());
        }
    }
}

fn interconnect(out: &mut Vec<String>, design: &SynthesizedDesign) {
    let ic = &design.interconnect;
    section(out, &format!("Interconnect ({})", ic.topology()));

    match ic.kind {
        InterconnectKind::Crossbar { n } => {
            out.push(format!("// {n}x{n} Crossbar"));
            out.push("crossbar #(".into());
            out.push(format!("{INDENT}.N({n}),"));
            out.push(format!("{INDENT}.ARB_POLICY(\"{}\")", ic.arbitration));
            out.push(") xbar (".into());
            out.push(format!("{INDENT}.clk(clk),"));
            out.push(format!("{INDENT}.rst_n(rst_n),"));
            out.push(format!("{INDENT}.req(eu_valid),"));
            out.push(format!("{INDENT}.grant(eu_ready),"));
            out.push(format!("{INDENT}.data_in(eu_result),"));
            out.push(format!("{INDENT}.data_out(rf_write_data)"));
            out.push(");".into());
        }
        InterconnectKind::Mesh { dim } => {
            out.push(format!("// {dim}x{dim} Mesh Network"));
            out.push(format!(
                "// Placeholder: {} mesh links are not generated",
                ic.edge_count()
            ));
        }
        InterconnectKind::Noc { n } => {
            out.push(format!("// Network-on-Chip, {n} routers"));
            out.push("// Placeholder: routers and routing logic are not generated".into());
        }
    }
}

fn control(out: &mut Vec<String>, design: &SynthesizedDesign) {
    section(out, "Control Logic");

    match design.controller {
        ControllerSpec::OutOfOrder { width, rob_entries } => {
            out.push(format!(
                "// Out-of-order issue: width {width}, {rob_entries} ROB entries"
            ));
            out.push(String::new());
            out.push("// Program Counter".into());
            out.push("always_ff @(posedge clk or negedge rst_n) begin".into());
            out.push("  if (!rst_n) begin".into());
            out.push("    pc <= 32'h0;".into());
            out.push("  end else if (instr_valid && instr_ready) begin".into());
            out.push("    pc <= pc + 4;".into());
            out.push("  end".into());
            out.push("end".into());
            out.push(String::new());
            out.push("// Instruction Fetch".into());
            out.push("assign instr_ready = !proc_busy;".into());
            out.push(String::new());
            out.push("// Instruction Decode".into());
            out.push("decoder #(".into());
            out.push(format!("{INDENT}.N({})", design.parallelism));
            out.push(") dec (".into());
            out.push(format!("{INDENT}.instr(instr_data),"));
            out.push(format!("{INDENT}.eu_sel(eu_valid),"));
            out.push(format!("{INDENT}.rf_read_addr(rf_read_addr),"));
            out.push(format!("{INDENT}.rf_write_addr(rf_write_addr),"));
            out.push(format!("{INDENT}.rf_write_en(rf_write_en)"));
            out.push(");".into());
        }
        ControllerSpec::Systolic { dim } => {
            out.push(format!("// NPU Controller: systolic schedule over {dim} PEs"));
        }
    }

    out.push(String::new());
    out.push("// Status".into());
    out.push("assign proc_busy = |eu_valid;".into());
    out.push("assign proc_done = !proc_busy;".into());
}

fn memory(out: &mut Vec<String>, design: &SynthesizedDesign) {
    let rf = &design.register_file;
    section(out, "Memory Interface");

    out.push(format!("// Multi-port Register File ({} entries)", rf.depth));
    out.push("regfile #(".into());
    out.push(format!("{INDENT}.NUM_READ_PORTS({}),", rf.read_ports));
    out.push(format!("{INDENT}.NUM_WRITE_PORTS({})", rf.write_ports));
    out.push(") rf (".into());
    out.push(format!("{INDENT}.clk(clk),"));
    out.push(format!("{INDENT}.rst_n(rst_n),"));
    out.push(format!("{INDENT}.read_addr(rf_read_addr),"));
    out.push(format!("{INDENT}.read_data(rf_read_data),"));
    out.push(format!("{INDENT}.write_addr(rf_write_addr),"));
    out.push(format!("{INDENT}.write_data(rf_write_data),"));
    out.push(format!("{INDENT}.write_en(rf_write_en)"));
    out.push(");".into());
    out.push(String::new());

    out.push(format!(
        "// Load-Store Unit ({} MSHRs)",
        design.memory.mshrs
    ));
    out.push("lsu #(".into());
    out.push(format!("{INDENT}.NUM_PORTS({})", design.memory.lsu_ports));
    out.push(") lsu_inst (".into());
    out.push(format!("{INDENT}.clk(clk),"));
    out.push(format!("{INDENT}.rst_n(rst_n),"));
    out.push(format!("{INDENT}.addr(data_addr),"));
    out.push(format!("{INDENT}.data(data),"));
    out.push(format!("{INDENT}.we(data_we),"));
    out.push(format!("{INDENT}.be(data_be),"));
    out.push(format!("{INDENT}.valid(data_valid),"));
    out.push(format!("{INDENT}.ready(data_ready)"));
    out.push(");".into());
}
