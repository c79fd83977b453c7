use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Format a float as a dollar amount with thousands separators: $1,234.56
pub fn money(val: f64) -> String {
    let negative = val < 0.0;
    let cents = format!("{:.2}", val.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let with_commas = group_thousands(int_part);
    if negative {
        format!("-${with_commas}.{dec_part}")
    } else {
        format!("${with_commas}.{dec_part}")
    }
}

pub fn money_decimal(val: Decimal) -> String {
    money(val.round_dp(2).to_f64().unwrap_or_default())
}

/// Whole units with thousands separators: 12,345
pub fn units(val: f64) -> String {
    let rounded = format!("{:.0}", val.abs());
    let grouped = group_thousands(&rounded);
    if val < 0.0 && rounded != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(1234.56), "$1,234.56");
        assert_eq!(money(-500.00), "-$500.00");
        assert_eq!(money(0.0), "$0.00");
        assert_eq!(money(1000000.99), "$1,000,000.99");
        assert_eq!(money(42.10), "$42.10");
    }

    #[test]
    fn test_money_decimal() {
        assert_eq!(money_decimal(Decimal::new(35025, 2)), "$350.25");
        assert_eq!(money_decimal(Decimal::new(1234567, 3)), "$1,234.57");
    }

    #[test]
    fn test_units() {
        assert_eq!(units(0.0), "0");
        assert_eq!(units(2999.0), "2,999");
        assert_eq!(units(1234567.0), "1,234,567");
    }
}
