//! Currency helpers for monetary values carried as [`rust_decimal::Decimal`].
//!
//! Amounts stay in decimal form through every computation; the Brazilian-real
//! display format (`R$1.234,56`) exists only at the rendering and ingest
//! boundaries and is never parsed back for arithmetic that the caller already
//! holds in decimal form.

use rust_decimal::Decimal;

/// Renders an amount in BRL display format: `R$` prefix, `.` thousands
/// separator, `,` decimal separator, always two decimal places.
pub fn format_brl(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded.is_sign_negative();
    let text = rounded.abs().to_string();
    let (integral, fraction) = match text.split_once('.') {
        Some((integral, fraction)) => (integral.to_string(), format!("{fraction:0<2}")),
        None => (text, "00".to_string()),
    };

    let mut grouped = String::new();
    let digits = integral.as_bytes();
    for (idx, digit) in digits.iter().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*digit as char);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}R${grouped},{fraction}")
}

/// Parses a BRL display string back into a decimal amount.
///
/// Tolerates a missing `R$` prefix and surrounding whitespace; returns zero
/// for unparseable input, matching the lenient ingest behavior of the form
/// boundary this mirrors.
pub fn parse_brl(value: &str) -> Decimal {
    let normalized = value
        .trim()
        .trim_start_matches("R$")
        .replace('.', "")
        .replace(',', ".");
    normalized.trim().parse::<Decimal>().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_grouping_and_decimal_comma() {
        assert_eq!(format_brl(Decimal::new(123456, 2)), "R$1.234,56");
        assert_eq!(format_brl(Decimal::new(50000, 2)), "R$500,00");
        assert_eq!(format_brl(Decimal::ZERO), "R$0,00");
        assert_eq!(format_brl(Decimal::new(1234567890, 2)), "R$12.345.678,90");
    }

    #[test]
    fn formats_negative_amounts() {
        assert_eq!(format_brl(Decimal::new(-9950, 2)), "-R$99,50");
    }

    #[test]
    fn parses_display_strings() {
        assert_eq!(parse_brl("R$1.234,56"), Decimal::new(123456, 2));
        assert_eq!(parse_brl("  500,00 "), Decimal::new(50000, 2));
        assert_eq!(parse_brl("not money"), Decimal::ZERO);
    }

    #[test]
    fn round_trips_through_display_format() {
        let amount = Decimal::new(350075, 2);
        assert_eq!(parse_brl(&format_brl(amount)), amount);
    }
}
