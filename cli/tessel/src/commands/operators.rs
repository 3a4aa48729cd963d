//! `tessel operators`: list the operator catalog.

use anyhow::Result;

use tessel_core::OperatorCatalog;

pub fn run() -> Result<()> {
    let catalog = OperatorCatalog::standard();
    println!(
        "  {:<8} {:>7} {:>11} {:>11}  bit-widths",
        "name", "latency", "area (um2)", "power (mW)"
    );
    for op in catalog.iter() {
        let widths: Vec<String> = op.bitwidths.iter().map(u32::to_string).collect();
        println!(
            "  {:<8} {:>7} {:>11.1} {:>11.1}  [{}]",
            op.kind.name(),
            op.latency,
            op.area_um2,
            op.power_mw,
            widths.join(", ")
        );
    }
    Ok(())
}
