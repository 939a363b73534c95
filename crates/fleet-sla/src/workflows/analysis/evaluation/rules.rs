use rust_decimal::Decimal;

/// Net business days after subtracting the caller-supplied holiday count,
/// clamped at zero.
pub(crate) fn net_business_days(raw_business_days: u32, holidays: u32) -> u32 {
    raw_business_days.saturating_sub(holidays)
}

/// Business days beyond the contractual allowance, clamped at zero.
pub(crate) fn excess_days(business_days: u32, threshold_days: u32) -> u32 {
    business_days.saturating_sub(threshold_days)
}

/// Pro-rated penalty: the monthly fee divided by a fixed 30-day month, times
/// the excess. The 30-day divisor is contractual and independent of the
/// actual days in the month. Rounded to two decimal places.
pub(crate) fn pro_rated_discount(monthly_fee: Decimal, excess_days: u32) -> Decimal {
    if excess_days == 0 {
        return Decimal::ZERO;
    }

    (monthly_fee / Decimal::from(30) * Decimal::from(excess_days)).round_dp(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holidays_never_drive_the_count_negative() {
        assert_eq!(net_business_days(3, 5), 0);
        assert_eq!(net_business_days(5, 5), 0);
        assert_eq!(net_business_days(8, 2), 6);
    }

    #[test]
    fn excess_clamps_at_zero() {
        assert_eq!(excess_days(2, 3), 0);
        assert_eq!(excess_days(8, 3), 5);
    }

    #[test]
    fn discount_is_zero_without_excess() {
        assert_eq!(pro_rated_discount(Decimal::from(3000), 0), Decimal::ZERO);
    }

    #[test]
    fn discount_pro_rates_against_a_thirty_day_month() {
        assert_eq!(
            pro_rated_discount(Decimal::from(3000), 5),
            Decimal::new(50000, 2)
        );
        assert_eq!(
            pro_rated_discount(Decimal::from(3000), 3),
            Decimal::new(30000, 2)
        );
    }

    #[test]
    fn discount_rounds_to_cents() {
        // 1000 / 30 = 33.333..., one excess day.
        assert_eq!(
            pro_rated_discount(Decimal::from(1000), 1),
            Decimal::new(3333, 2)
        );
    }
}
