//! Bus widths and slice bounds derived from parallelism.

/// Datapath width of one operand or result.
pub const DATA_WIDTH: u32 = 64;
/// Bits needed to address one of the 32 architectural registers.
pub const REG_ADDR_WIDTH: u32 = 5;
/// Register-file read ports per execution unit.
pub const READS_PER_UNIT: u32 = 2;

/// Widths of every parallelism-dependent internal bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusWidths {
    pub parallelism: u32,
    pub valid: u32,
    pub result: u32,
    pub read_addr: u32,
    pub read_data: u32,
    pub write_addr: u32,
    pub write_data: u32,
    pub write_en: u32,
}

impl BusWidths {
    pub fn for_parallelism(p: u32) -> Self {
        Self {
            parallelism: p,
            valid: p,
            result: p * DATA_WIDTH,
            read_addr: p * READS_PER_UNIT * REG_ADDR_WIDTH,
            read_data: p * READS_PER_UNIT * DATA_WIDTH,
            write_addr: p * REG_ADDR_WIDTH,
            write_data: p * DATA_WIDTH,
            write_en: p,
        }
    }
}

/// `[msb:lsb]` range covering `width` bits from `lsb`.
pub fn range(width: u32, lsb: u32) -> String {
    format!("[{}:{lsb}]", lsb + width.saturating_sub(1))
}

/// `[width-1:0]` declaration range.
pub fn decl(width: u32) -> String {
    range(width, 0)
}

/// Read-data slice feeding operand `port` (0 or 1) of unit `index`.
pub fn operand_slice(index: u32, port: u32) -> String {
    range(DATA_WIDTH, (index * READS_PER_UNIT + port) * DATA_WIDTH)
}

/// Result-bus slice driven by unit `index`.
pub fn result_slice(index: u32) -> String {
    range(DATA_WIDTH, index * DATA_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widths_scale_with_parallelism() {
        let w = BusWidths::for_parallelism(4);
        assert_eq!(w.valid, 4);
        assert_eq!(w.result, 256);
        assert_eq!(w.read_addr, 40);
        assert_eq!(w.read_data, 512);
        assert_eq!(w.write_addr, 20);
    }

    #[test]
    fn slices() {
        assert_eq!(decl(4), "[3:0]");
        assert_eq!(operand_slice(0, 0), "[63:0]");
        assert_eq!(operand_slice(0, 1), "[127:64]");
        assert_eq!(operand_slice(3, 0), "[447:384]");
        assert_eq!(operand_slice(3, 1), "[511:448]");
        assert_eq!(result_slice(2), "[191:128]");
    }
}
