use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Percent, Rate};

/// Longest schedule `amortization_schedule` will expand (100 years of installments).
pub const MAX_SCHEDULE_MONTHS: u32 = 1200;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fixed-installment (Price table) loan figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amortization {
    /// Amount financed
    pub principal: Money,
    /// Nominal annual rate in percent
    pub annual_rate_pct: Percent,
    /// Periodic rate as a decimal (annual / 100 / 12)
    pub monthly_rate: Rate,
    /// Number of monthly installments
    pub term_months: u32,
    /// Fixed monthly installment
    pub installment: Money,
    /// installment * term_months
    pub total_paid: Money,
    /// total_paid - principal
    pub total_interest: Money,
}

/// One month of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub installment: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convert a nominal annual percentage into the monthly decimal rate.
pub fn monthly_rate(annual_rate_pct: Percent) -> Rate {
    annual_rate_pct / dec!(100) / dec!(12)
}

/// Fixed installment via the annuity formula:
///
/// `installment = P * i(1+i)^n / ((1+i)^n - 1)`
///
/// Returns `None` instead of evaluating when `i <= 0`, `P <= 0` or `n == 0`,
/// or when an intermediate value leaves the representable range.
pub fn compute_amortization(
    principal: Money,
    annual_rate_pct: Percent,
    term_months: u32,
) -> Option<Amortization> {
    let i = monthly_rate(annual_rate_pct);
    if i <= Decimal::ZERO || principal <= Decimal::ZERO || term_months == 0 {
        return None;
    }

    let compound = (Decimal::ONE + i).checked_powu(u64::from(term_months))?;
    let denominator = compound - Decimal::ONE;
    if denominator <= Decimal::ZERO {
        return None;
    }

    let installment = principal
        .checked_mul(i)?
        .checked_mul(compound)?
        .checked_div(denominator)?;
    let total_paid = installment.checked_mul(Decimal::from(term_months))?;

    Some(Amortization {
        principal,
        annual_rate_pct,
        monthly_rate: i,
        term_months,
        installment,
        total_paid,
        total_interest: total_paid - principal,
    })
}

/// Loan figures for an installment fixed by the borrower over a whole number
/// of months. `total_paid` counts every installment in full, so when `term_months`
/// came from rounding up `solve_term` the last payment is overstated by the
/// unused part of the final month.
///
/// `None` under the same conditions as `compute_amortization`, and when the
/// installment does not cover the first month's interest.
pub fn amortization_for_installment(
    principal: Money,
    annual_rate_pct: Percent,
    term_months: u32,
    installment: Money,
) -> Option<Amortization> {
    let i = monthly_rate(annual_rate_pct);
    if i <= Decimal::ZERO || principal <= Decimal::ZERO || term_months == 0 {
        return None;
    }
    if installment <= principal.checked_mul(i)? {
        return None;
    }

    let total_paid = installment.checked_mul(Decimal::from(term_months))?;
    Some(Amortization {
        principal,
        annual_rate_pct,
        monthly_rate: i,
        term_months,
        installment,
        total_paid,
        total_interest: total_paid - principal,
    })
}

/// Solve the annuity formula for the term given an installment:
///
/// `n = ln(A / (A - P*i)) / ln(1 + i)`
///
/// The result is fractional. `None` when `i <= 0`, `P <= 0`, `A <= 0`, or
/// when the installment does not cover the first month's interest (`A <= P*i`),
/// where the loan never amortizes.
pub fn solve_term(principal: Money, annual_rate_pct: Percent, installment: Money) -> Option<Decimal> {
    let i = monthly_rate(annual_rate_pct);
    if i <= Decimal::ZERO || principal <= Decimal::ZERO || installment <= Decimal::ZERO {
        return None;
    }

    let interest_only = principal.checked_mul(i)?;
    if installment <= interest_only {
        return None;
    }

    let ratio = installment.checked_div(installment - interest_only)?;
    let numerator = ratio.checked_ln()?;
    let denominator = (Decimal::ONE + i).checked_ln()?;
    if denominator <= Decimal::ZERO {
        return None;
    }

    numerator.checked_div(denominator)
}

/// `solve_term` rounded up to whole installments. Values within half a
/// thousandth of a month of an integer are snapped to it first so a
/// forward/backward round trip is exact.
pub fn solve_term_months(principal: Money, annual_rate_pct: Percent, installment: Money) -> Option<u32> {
    let n = solve_term(principal, annual_rate_pct, installment)?;
    n.round_dp(3).ceil().to_u32()
}

/// Month-by-month Price table. The final row pays off whatever balance is left
/// so the schedule always closes at zero.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_months: u32,
) -> Option<Vec<ScheduleRow>> {
    if term_months > MAX_SCHEDULE_MONTHS {
        return None;
    }
    let amort = compute_amortization(principal, annual_rate_pct, term_months)?;

    let mut rows = Vec::with_capacity(term_months as usize);
    let mut balance = principal;

    for month in 1..=term_months {
        let interest = balance * amort.monthly_rate;
        let (installment, principal_part) = if month == term_months {
            (interest + balance, balance)
        } else {
            (amort.installment, amort.installment - interest)
        };
        balance -= principal_part;

        rows.push(ScheduleRow {
            month,
            installment,
            interest,
            principal: principal_part,
            balance,
        });
    }

    Some(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: Decimal, expected: Decimal, tolerance: Decimal) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn test_monthly_rate() {
        assert_eq!(monthly_rate(dec!(12)), dec!(0.01));
        assert_eq!(monthly_rate(dec!(10.5)), dec!(0.00875));
    }

    #[test]
    fn test_installment_financed_amount() {
        // 350k purchase, 70k down => 280k financed at 10.5% over 30 years
        let amort = compute_amortization(dec!(280000), dec!(10.5), 360).unwrap();
        assert_close(amort.installment, dec!(2561.27), dec!(0.01));
        assert_eq!(amort.total_interest, amort.installment * dec!(360) - dec!(280000));
        assert_close(amort.total_interest, dec!(642057.21), dec!(1));
    }

    #[test]
    fn test_installment_full_price() {
        let amort = compute_amortization(dec!(350000), dec!(10.5), 360).unwrap();
        assert_close(amort.installment, dec!(3201.59), dec!(0.01));
    }

    #[test]
    fn test_single_installment_repays_principal_plus_interest() {
        let amort = compute_amortization(dec!(1000), dec!(12), 1).unwrap();
        assert_close(amort.installment, dec!(1010), dec!(0.0000001));
    }

    #[test]
    fn test_amortization_short_circuits() {
        assert!(compute_amortization(dec!(100000), dec!(0), 360).is_none());
        assert!(compute_amortization(dec!(100000), dec!(-1), 360).is_none());
        assert!(compute_amortization(dec!(0), dec!(10), 360).is_none());
        assert!(compute_amortization(dec!(-5), dec!(10), 360).is_none());
        assert!(compute_amortization(dec!(100000), dec!(10), 0).is_none());
    }

    #[test]
    fn test_solve_term_round_trip() {
        for (principal, rate, term) in [
            (dec!(280000), dec!(10.5), 360u32),
            (dec!(50000), dec!(7.2), 120),
            (dec!(1200000), dec!(13.9), 240),
            (dec!(15000), dec!(24), 12),
        ] {
            let amort = compute_amortization(principal, rate, term).unwrap();
            let n = solve_term(principal, rate, amort.installment).unwrap();
            assert_close(n, Decimal::from(term), dec!(0.0001));
            assert_eq!(solve_term_months(principal, rate, amort.installment), Some(term));
        }
    }

    #[test]
    fn test_solve_term_rounds_up_partial_month() {
        // 10 more per month pays the loan off during month 351
        let amort = compute_amortization(dec!(280000), dec!(10.5), 360).unwrap();
        let n = solve_term(dec!(280000), dec!(10.5), amort.installment + dec!(10)).unwrap();
        assert!(n > dec!(350) && n < dec!(351), "got {n}");
        let months = solve_term_months(dec!(280000), dec!(10.5), amort.installment + dec!(10));
        assert_eq!(months, Some(351));
    }

    #[test]
    fn test_amortization_keeps_stated_installment() {
        let amort = amortization_for_installment(dec!(280000), dec!(10.5), 351, dec!(2571.27)).unwrap();
        assert_eq!(amort.installment, dec!(2571.27));
        assert_eq!(amort.total_paid, dec!(2571.27) * dec!(351));
        assert_eq!(amort.total_interest, amort.total_paid - dec!(280000));

        // Interest-only or less never amortizes
        assert!(amortization_for_installment(dec!(280000), dec!(10.5), 360, dec!(2450)).is_none());
        assert!(amortization_for_installment(dec!(280000), dec!(0), 360, dec!(3000)).is_none());
        assert!(amortization_for_installment(dec!(280000), dec!(10.5), 0, dec!(3000)).is_none());
    }

    #[test]
    fn test_solve_term_installment_below_interest() {
        // First month interest = 280000 * 0.00875 = 2450
        assert!(solve_term(dec!(280000), dec!(10.5), dec!(2450)).is_none());
        assert!(solve_term(dec!(280000), dec!(10.5), dec!(2000)).is_none());
        assert!(solve_term(dec!(280000), dec!(10.5), dec!(2450.01)).is_some());
    }

    #[test]
    fn test_solve_term_degenerate_inputs() {
        assert!(solve_term(dec!(280000), dec!(0), dec!(3000)).is_none());
        assert!(solve_term(dec!(0), dec!(10), dec!(3000)).is_none());
        assert!(solve_term(dec!(280000), dec!(10), dec!(0)).is_none());
    }

    #[test]
    fn test_schedule_closes_at_zero() {
        let rows = amortization_schedule(dec!(100000), dec!(9), 120).unwrap();
        assert_eq!(rows.len(), 120);
        assert_eq!(rows.first().unwrap().month, 1);
        assert_eq!(rows.last().unwrap().balance, Decimal::ZERO);

        // First month: interest on the full balance
        assert_close(rows[0].interest, dec!(750), dec!(0.0000001));

        // Interest share falls, principal share rises
        assert!(rows[1].interest < rows[0].interest);
        assert!(rows[1].principal > rows[0].principal);

        let principal_repaid: Decimal = rows.iter().map(|r| r.principal).sum();
        assert_close(principal_repaid, dec!(100000), dec!(0.0000001));
    }

    #[test]
    fn test_schedule_last_installment_matches_regular() {
        let amort = compute_amortization(dec!(100000), dec!(9), 120).unwrap();
        let rows = amortization_schedule(dec!(100000), dec!(9), 120).unwrap();
        assert_close(rows.last().unwrap().installment, amort.installment, dec!(0.0001));
    }

    #[test]
    fn test_schedule_limits() {
        assert!(amortization_schedule(dec!(100000), dec!(9), MAX_SCHEDULE_MONTHS + 1).is_none());
        assert!(amortization_schedule(dec!(100000), dec!(0), 12).is_none());
    }
}
