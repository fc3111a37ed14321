use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use realty_calc_core::amortization::{
    amortization_schedule, compute_amortization, solve_term, solve_term_months,
};

/// Arguments for the fixed-installment loan calculation
#[derive(Args)]
pub struct AmortizeArgs {
    /// Amount financed (whole currency units)
    #[arg(long)]
    pub principal: Decimal,

    /// Nominal annual interest rate in percent (e.g. 10.5)
    #[arg(long)]
    pub rate: Decimal,

    /// Term in months
    #[arg(long)]
    pub term: u32,

    /// Print the month-by-month schedule instead of the summary
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for solving the term from an installment
#[derive(Args)]
pub struct SolveTermArgs {
    /// Amount financed (whole currency units)
    #[arg(long)]
    pub principal: Decimal,

    /// Nominal annual interest rate in percent
    #[arg(long)]
    pub rate: Decimal,

    /// Monthly installment the borrower can pay
    #[arg(long)]
    pub installment: Decimal,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    tracing::debug!(
        principal = %args.principal,
        rate = %args.rate,
        term = args.term,
        "computing amortization"
    );

    if args.schedule {
        let rows = amortization_schedule(args.principal, args.rate, args.term).ok_or(
            "no schedule: principal, rate and term must be positive and the term at most 1200 months",
        )?;
        return Ok(serde_json::to_value(rows)?);
    }

    let amort = compute_amortization(args.principal, args.rate, args.term)
        .ok_or("no installment: principal, rate and term must be positive")?;
    Ok(json!({ "result": amort }))
}

pub fn run_solve_term(args: SolveTermArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let exact = solve_term(args.principal, args.rate, args.installment).ok_or(
        "no term: the installment must exceed the first month's interest (principal * monthly rate)",
    )?;
    let months = solve_term_months(args.principal, args.rate, args.installment);
    tracing::debug!(%exact, ?months, "solved term");

    Ok(json!({
        "result": {
            "term_months": months,
            "exact_term": exact,
            "principal": args.principal,
            "rate": args.rate,
            "installment": args.installment,
        }
    }))
}
