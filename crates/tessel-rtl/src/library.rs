//! Parameterized support modules instantiated by the top-level module.

/// Single-operator execution unit. `OP_TYPE` selects the datapath.
pub const EXECUTION_UNIT: &str = r#"module execution_unit #(
  parameter OP_TYPE = "ALU",
  parameter LATENCY = 1
) (
  input  wire        clk,
  input  wire        rst_n,
  input  wire        valid,
  output wire        ready,
  input  wire [63:0] operand_a,
  input  wire [63:0] operand_b,
  output wire [63:0] result
);
  assign ready = valid;

  generate
    if (OP_TYPE == "MUL" || OP_TYPE == "MAC" || OP_TYPE == "VEC_MUL") begin : g_mul
      assign result = operand_a * operand_b;
    end else if (OP_TYPE == "BRU") begin : g_cmp
      assign result = {63'd0, operand_a == operand_b};
    end else begin : g_add
      assign result = operand_a + operand_b;
    end
  endgenerate
endmodule
"#;

/// 32-entry register file with `NUM_READ_PORTS` read and `NUM_WRITE_PORTS` write ports.
pub const REGFILE: &str = r#"module regfile #(
  parameter NUM_READ_PORTS = 8,
  parameter NUM_WRITE_PORTS = 4
) (
  input  wire                          clk,
  input  wire                          rst_n,
  input  wire [NUM_READ_PORTS*5-1:0]   read_addr,
  output wire [NUM_READ_PORTS*64-1:0]  read_data,
  input  wire [NUM_WRITE_PORTS*5-1:0]  write_addr,
  input  wire [NUM_WRITE_PORTS*64-1:0] write_data,
  input  wire [NUM_WRITE_PORTS-1:0]    write_en
);
  reg [63:0] registers [0:31];

  genvar i;
  generate
    for (i = 0; i < NUM_READ_PORTS; i = i + 1) begin : read_port
      assign read_data[i*64 +: 64] = registers[read_addr[i*5 +: 5]];
    end
  endgenerate

  integer j;
  always @(posedge clk) begin
    for (j = 0; j < NUM_WRITE_PORTS; j = j + 1) begin
      if (write_en[j]) begin
        registers[write_addr[j*5 +: 5]] <= write_data[j*64 +: 64];
      end
    end
  end
endmodule
"#;

/// N-port crossbar. Every request is granted and data passes straight through.
pub const CROSSBAR: &str = r#"module crossbar #(
  parameter N = 4,
  parameter ARB_POLICY = "LRU"
) (
  input  wire            clk,
  input  wire            rst_n,
  input  wire [N-1:0]    req,
  output reg  [N-1:0]    grant,
  input  wire [N*64-1:0] data_in,
  output reg  [N*64-1:0] data_out
);
  always @(*) begin
    grant = req;
    data_out = data_in;
  end
endmodule
"#;

/// Load-store unit port shell; outputs idle after reset.
pub const LSU: &str = r#"module lsu #(
  parameter NUM_PORTS = 2
) (
  input  wire        clk,
  input  wire        rst_n,
  output reg  [31:0] addr,
  inout  wire [63:0] data,
  output reg         we,
  output reg  [7:0]  be,
  output reg         valid,
  input  wire        ready
);
  assign data = 64'bz;

  always @(posedge clk or negedge rst_n) begin
    if (!rst_n) begin
      addr  <= 32'h0;
      we    <= 1'b0;
      be    <= 8'h0;
      valid <= 1'b0;
    end
  end
endmodule
"#;

/// Instruction decoder driving unit selects and register addresses.
pub const DECODER: &str = r#"module decoder #(
  parameter N = 4
) (
  input  wire [31:0]      instr,
  output wire [N-1:0]     eu_sel,
  output wire [N*2*5-1:0] rf_read_addr,
  output wire [N*5-1:0]   rf_write_addr,
  output wire [N-1:0]     rf_write_en
);
  genvar i;
  generate
    for (i = 0; i < N; i = i + 1) begin : lane
      assign eu_sel[i] = (instr[6:0] != 7'd0);
      assign rf_read_addr[i*10 +: 5] = instr[19:15];
      assign rf_read_addr[i*10+5 +: 5] = instr[24:20];
      assign rf_write_addr[i*5 +: 5] = instr[11:7];
      assign rf_write_en[i] = (instr[11:7] != 5'd0);
    end
  endgenerate
endmodule
"#;

/// Module names in library order.
pub const MODULES: [&str; 5] = ["execution_unit", "regfile", "crossbar", "lsu", "decoder"];

/// Every support module, separated by blank lines.
pub fn support_library() -> String {
    [EXECUTION_UNIT, REGFILE, CROSSBAR, LSU, DECODER].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn library_defines_every_module_once() {
        let lib = support_library();
        for name in MODULES {
            let decl = format!("module {name} #(");
            assert_eq!(lib.matches(&decl).count(), 1, "{name}");
        }
        assert_eq!(lib.matches("endmodule").count(), MODULES.len());
    }

    #[test]
    fn library_has_no_placeholders() {
        assert!(!support_library().contains("TODO"));
    }
}
