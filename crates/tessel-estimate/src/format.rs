//! Text formatting helpers for estimate reports.

/// Render an ASCII share bar for `part` out of `whole`.
///
/// Example output: `[████████░░░░░░░░░░░░]  42.0%`
pub fn bar_chart(part: f64, whole: f64, bar_width: usize) -> String {
    if whole.is_nan() || whole <= 0.0 {
        let empty = "░".repeat(bar_width);
        return format!("[{empty}]   0.0%");
    }

    let percent = (part / whole * 100.0).clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * bar_width as f64).round() as usize;
    let filled = filled.min(bar_width);

    format!(
        "[{}{}] {percent:5.1}%",
        "█".repeat(filled),
        "░".repeat(bar_width - filled)
    )
}

/// Format µm² with a mm² suffix once the figure passes 0.1 mm².
pub fn format_area(um2: f64) -> String {
    if um2 >= 100_000.0 {
        format!("{:.3} mm2", um2 / 1e6)
    } else {
        format!("{um2:.1} um2")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_chart_half() {
        let bar = bar_chart(50.0, 100.0, 10);
        assert_eq!(bar, "[█████░░░░░]  50.0%");
    }

    #[test]
    fn bar_chart_empty_whole() {
        assert_eq!(bar_chart(1.0, 0.0, 4), "[░░░░]   0.0%");
    }

    #[test]
    fn bar_chart_full() {
        assert_eq!(bar_chart(3.0, 3.0, 4), "[████] 100.0%");
    }

    #[test]
    fn area_units() {
        assert_eq!(format_area(3744.8), "3744.8 um2");
        assert_eq!(format_area(2_500_000.0), "2.500 mm2");
    }
}
