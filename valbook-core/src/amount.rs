//! Monetary amount parsing and display formatting.
//!
//! Amounts travel as plain f64 internally and as en-IN grouped text
//! (12,34,567.89) on screen. Parsing is total: any input that is not a
//! finite non-negative number becomes 0.

/// Clamp to a finite, non-negative amount.
pub fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// Parse locale-formatted amount text: comma group separators stripped,
/// whitespace trimmed. Unparseable, non-finite or negative input yields 0.
pub fn parse_amount(text: &str) -> f64 {
    let cleaned = text.replace(',', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(v) => non_negative(v),
        Err(_) => 0.0,
    }
}

/// Render with exactly two fraction digits and Indian digit grouping
/// (last three digits, then groups of two). Non-finite values render as
/// "0.00".
pub fn format_amount(value: f64) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    // Round at two decimals first so 999.999 carries into the integer part.
    let cents = (v.abs() * 100.0).round() as u128;
    let sign = if v < 0.0 && cents > 0 { "-" } else { "" };
    let whole = (cents / 100).to_string();
    let frac = cents % 100;
    format!("{sign}{}.{frac:02}", group_indian(&whole))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_group_separators() {
        assert_eq!(parse_amount("1,200.50"), 1200.50);
        assert_eq!(parse_amount("12,34,567.89"), 1234567.89);
        assert_eq!(parse_amount(" 450 "), 450.0);
        assert_eq!(parse_amount("1e3"), 1000.0);
    }

    #[test]
    fn garbage_and_negatives_become_zero() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("12.5.6"), 0.0);
        assert_eq!(parse_amount("-500"), 0.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
    }

    #[test]
    fn parse_is_never_negative() {
        for text in ["-1", "-0.01", "-12,000", "5", "0"] {
            assert!(parse_amount(text) >= 0.0, "negative for {text}");
        }
    }

    #[test]
    fn formats_with_indian_grouping() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(5.0), "5.00");
        assert_eq!(format_amount(999.9), "999.90");
        assert_eq!(format_amount(1200.5), "1,200.50");
        assert_eq!(format_amount(123456.0), "1,23,456.00");
        assert_eq!(format_amount(1234567.89), "12,34,567.89");
        assert_eq!(format_amount(100000000.0), "10,00,00,000.00");
    }

    #[test]
    fn non_finite_renders_as_zero() {
        assert_eq!(format_amount(f64::NAN), "0.00");
        assert_eq!(format_amount(f64::INFINITY), "0.00");
    }

    #[test]
    fn rounding_carries_into_the_integer_part() {
        assert_eq!(format_amount(999.995), "1,000.00");
        assert_eq!(format_amount(0.004), "0.00");
        assert_eq!(format_amount(0.005), "0.01");
    }
}
