use tracing::debug;

use super::buy::project_buy;
use super::crossover::find_crossover;
use super::errors::CalculatorResult;
use super::rent::project_rent;
use super::types::{Comparison, Parameters};
use super::validation::validate_parameters;

pub fn run_comparison(params: &Parameters) -> CalculatorResult<Comparison> {
    validate_parameters(params)?;

    let rent_series = project_rent(&params.rent, params.horizon_years);
    let buy = project_buy(&params.buy, params.horizon_years, params.accounting_mode);
    debug!(
        loan_amount = buy.loan_amount,
        monthly_payment = buy.monthly_payment,
        horizon_years = params.horizon_years,
        mode = ?params.accounting_mode,
        "projected rent and buy costs"
    );

    let crossover = find_crossover(&rent_series, &buy.series)?;
    match crossover {
        Some(c) => debug!(year = c.year, "buying becomes cheaper"),
        None => debug!("no crossover within horizon"),
    }

    Ok(Comparison {
        horizon_years: params.horizon_years,
        accounting_mode: params.accounting_mode,
        rent_series,
        buy,
        crossover,
    })
}
