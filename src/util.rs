/// Format a sampling interval (e.g., "200ms", "1s", "1.5s").
pub fn format_interval(ms: u64) -> String {
    if ms < 1000 {
        format!("{ms}ms")
    } else if ms % 1000 == 0 {
        format!("{}s", ms / 1000)
    } else {
        format!("{:.1}s", ms as f64 / 1000.0)
    }
}

/// Format a whole percentage, right-aligned (e.g., " 45%").
pub fn format_percent(value: u32) -> String {
    format!("{value:>3}%")
}

/// Format the 1/5/15 minute load averages.
pub fn format_load(load: [f64; 3]) -> String {
    format!("{:.2} {:.2} {:.2}", load[0], load[1], load[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intervals() {
        assert_eq!(format_interval(100), "100ms");
        assert_eq!(format_interval(1000), "1s");
        assert_eq!(format_interval(2000), "2s");
        assert_eq!(format_interval(1500), "1.5s");
    }

    #[test]
    fn percent_and_load() {
        assert_eq!(format_percent(7), "  7%");
        assert_eq!(format_percent(100), "100%");
        assert_eq!(format_load([0.5, 1.25, 2.0]), "0.50 1.25 2.00");
    }
}
