//! Compact display of large counts, e.g. `12345` as `12.35K`

const UNITS: &[&str] = &["", "K", "M", "B", "T"];

/// Formats `number` scaled to its thousands group with a unit suffix.
///
/// `precision` is the smallest step kept after scaling (`0.01` keeps two
/// decimals). Values below 1000 are printed unchanged. A value that rounds up
/// to 1000 of one unit is shown as 1 of the next unit.
pub fn short_number(number: u64, precision: f64) -> String {
    if number < 1000 {
        return number.to_string();
    }

    let factor = 1.0 / precision;
    let mut group = ((number.ilog10() / 3) as usize).min(UNITS.len() - 1);
    let mut scaled = scale(number, group, factor);

    if scaled >= 1000.0 && group < UNITS.len() - 1 {
        group += 1;
        scaled = scale(number, group, factor);
    }

    format!("{}{}", scaled, UNITS[group])
}

fn scale(number: u64, group: usize, factor: f64) -> f64 {
    let divisor = 1000f64.powi(group as i32);
    (number as f64 / divisor * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, "0")]
    #[case(7, "7")]
    #[case(999, "999")]
    #[case(1_000, "1K")]
    #[case(1_234, "1.23K")]
    #[case(12_340, "12.34K")]
    #[case(123_400, "123.4K")]
    #[case(999_999, "1M")]
    #[case(1_500_000, "1.5M")]
    #[case(2_000_000_000, "2B")]
    #[case(3_000_000_000_000, "3T")]
    fn test_short_number_two_decimals(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(short_number(input, 0.01), expected);
    }

    #[test]
    fn test_coarser_precision() {
        assert_eq!(short_number(1_250, 0.1), "1.3K");
        assert_eq!(short_number(1_250, 1.0), "1K");
    }

    #[test]
    fn test_beyond_largest_unit_stays_on_last_suffix() {
        assert_eq!(short_number(5_000_000_000_000_000, 0.01), "5000T");
    }
}
