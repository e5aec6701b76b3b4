use super::errors::{CalculatorError, CalculatorResult};
use super::types::{BuyInputs, InsuranceCost, Parameters, RentInputs};

pub const MAX_HORIZON_YEARS: u32 = 100;

pub fn validate_parameters(params: &Parameters) -> CalculatorResult<()> {
    if params.horizon_years == 0 {
        return Err(CalculatorError::invalid("horizon_years", "must be > 0"));
    }
    if params.horizon_years > MAX_HORIZON_YEARS {
        return Err(CalculatorError::invalid(
            "horizon_years",
            format!("must be <= {MAX_HORIZON_YEARS}"),
        ));
    }

    validate_rent(&params.rent)?;
    validate_buy(&params.buy)
}

fn validate_rent(rent: &RentInputs) -> CalculatorResult<()> {
    non_negative("monthly_rent", rent.monthly_rent)?;
    finite("annual_rent_increase", rent.annual_rent_increase)?;
    if rent.annual_rent_increase <= -1.0 {
        return Err(CalculatorError::invalid(
            "annual_rent_increase",
            "must be > -100%",
        ));
    }
    Ok(())
}

fn validate_buy(buy: &BuyInputs) -> CalculatorResult<()> {
    non_negative("home_price", buy.home_price)?;
    non_negative("down_payment", buy.down_payment)?;
    if buy.down_payment > buy.home_price {
        return Err(CalculatorError::invalid(
            "down_payment",
            format!(
                "must not exceed home_price ({} > {})",
                buy.down_payment, buy.home_price
            ),
        ));
    }
    if buy.loan_term_years == 0 {
        return Err(CalculatorError::invalid("loan_term_years", "must be > 0"));
    }

    non_negative("mortgage_rate", buy.mortgage_rate)?;
    non_negative("property_tax_rate", buy.property_tax_rate)?;
    match buy.insurance {
        InsuranceCost::Annual(amount) => non_negative("insurance", amount)?,
        InsuranceCost::RateOfHomeValue(rate) => non_negative("insurance_rate", rate)?,
    }
    non_negative("maintenance_rate", buy.maintenance_rate)?;
    non_negative("hoa_monthly", buy.hoa_monthly)?;
    non_negative("appreciation_rate", buy.appreciation_rate)?;
    non_negative("selling_cost_rate", buy.selling_cost_rate)?;
    if buy.selling_cost_rate > 1.0 {
        return Err(CalculatorError::invalid(
            "selling_cost_rate",
            "must be between 0 and 100%",
        ));
    }
    Ok(())
}

fn finite(field: &'static str, value: f64) -> CalculatorResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(CalculatorError::invalid(field, "must be a finite number"))
    }
}

fn non_negative(field: &'static str, value: f64) -> CalculatorResult<()> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(CalculatorError::invalid(field, "must be >= 0"));
    }
    Ok(())
}
