use std::time::Duration;

use colored::Colorize;

use crate::stats::StatsSnapshot;

/// Format a count with commas as thousand separators.
pub fn comma(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Print the end-of-run summary: totals, percentage trimmed, per-category
/// rejection counts, and elapsed time. Informational only.
pub fn print_summary(snapshot: &StatsSnapshot, elapsed: Duration) {
    println!("\nTotal reads: {}", comma(snapshot.total));
    println!("Trimmed reads: {}", comma(snapshot.trimmed));
    println!(
        "{}",
        format!("Percentage of trimmed reads: {:.2}%", snapshot.trimmed_percent()).bright_green()
    );
    println!();
    println!(
        "{}",
        format!("Adapter missing count: {}", comma(snapshot.adapter_missing)).bright_magenta()
    );
    println!(
        "{}",
        format!("Too short count: {}", comma(snapshot.too_short)).bright_magenta()
    );
    println!(
        "{}",
        format!("Low quality count: {}", comma(snapshot.low_quality)).bright_magenta()
    );
    println!("\nApplication execution time: {elapsed:.2?}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma() {
        assert_eq!(comma(0), "0");
        assert_eq!(comma(123), "123");
        assert_eq!(comma(1234), "1,234");
        assert_eq!(comma(1234567), "1,234,567");
        assert_eq!(comma(1234567890), "1,234,567,890");
        assert_eq!(comma(1234567890123), "1,234,567,890,123");
    }
}
