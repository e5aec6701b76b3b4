// Tax, maintenance and rate-based insurance are charged on a single basis
// chosen by `CostBasis`: the purchase price, or the appreciated value at the
// start of the year.
//
// Equity uses an annual approximation, not a monthly schedule: interest is
// the start-of-year balance times the annual rate and the rest of the year's
// payments reduce principal. This overstates interest, so at a positive rate
// some balance is still outstanding when the term ends. That residual stays
// on `remaining_balance` and is netted out of the sale proceeds.

use super::types::{
    AccountingMode, BuyInputs, BuyProjection, BuyYearDetail, CostBasis, CostSeries, InsuranceCost,
};

pub fn monthly_payment(loan_amount: f64, annual_rate: f64, term_years: u32) -> f64 {
    if term_years == 0 {
        return 0.0;
    }
    let months = f64::from(term_years) * 12.0;
    let monthly_rate = annual_rate / 12.0;
    if monthly_rate == 0.0 {
        return loan_amount / months;
    }
    loan_amount * monthly_rate / (1.0 - (1.0 + monthly_rate).powf(-months))
}

pub fn project_buy(buy: &BuyInputs, horizon_years: u32, mode: AccountingMode) -> BuyProjection {
    let loan_amount = buy.home_price - buy.down_payment;
    let payment = monthly_payment(loan_amount, buy.mortgage_rate, buy.loan_term_years);
    let annual_mortgage = payment * 12.0;

    let mut remaining_balance = loan_amount;
    let mut equity = if buy.include_down_payment {
        buy.down_payment
    } else {
        0.0
    };
    let mut gross_cumulative = 0.0;
    let mut start_value = buy.home_price;
    let mut years = Vec::with_capacity(horizon_years as usize);

    for year in 1..=horizon_years {
        let end_value = start_value * (1.0 + buy.appreciation_rate);
        let basis = match buy.cost_basis {
            CostBasis::PurchasePrice => buy.home_price,
            CostBasis::CurrentValue => start_value,
        };

        let (mortgage_paid, interest_paid, principal_paid) =
            amortize_year(year, buy, annual_mortgage, remaining_balance);
        remaining_balance -= principal_paid;
        equity += principal_paid;

        let property_tax = buy.property_tax_rate * basis;
        let insurance = match buy.insurance {
            InsuranceCost::Annual(amount) => amount,
            InsuranceCost::RateOfHomeValue(rate) => rate * basis,
        };
        let maintenance = buy.maintenance_rate * basis;
        let hoa = buy.hoa_monthly * 12.0;
        let upfront = if buy.include_down_payment && year == 1 {
            buy.down_payment
        } else {
            0.0
        };

        let annual_cost = upfront + mortgage_paid + property_tax + insurance + maintenance + hoa;
        gross_cumulative += annual_cost;

        years.push(BuyYearDetail {
            year,
            home_value: end_value,
            mortgage_paid,
            interest_paid,
            principal_paid,
            property_tax,
            insurance,
            maintenance,
            hoa,
            annual_cost,
            gross_cumulative_cost: gross_cumulative,
            remaining_balance,
            equity,
        });
        start_value = end_value;
    }

    let series = CostSeries::from_cumulative(years.iter().map(|y| match mode {
        AccountingMode::Gross | AccountingMode::NetOfSale => y.gross_cumulative_cost,
        AccountingMode::NetOfEquity => y.gross_cumulative_cost - y.equity,
    }));

    let net_cost_at_sale = match mode {
        AccountingMode::NetOfSale => years
            .last()
            .map(|last| net_cost_after_sale(last, buy.selling_cost_rate)),
        AccountingMode::Gross | AccountingMode::NetOfEquity => None,
    };

    BuyProjection {
        loan_amount,
        monthly_payment: payment,
        series,
        years,
        net_cost_at_sale,
    }
}

// (mortgage paid, interest, principal); payment never exceeds what is owed.
fn amortize_year(
    year: u32,
    buy: &BuyInputs,
    annual_mortgage: f64,
    remaining_balance: f64,
) -> (f64, f64, f64) {
    if year > buy.loan_term_years {
        return (0.0, 0.0, 0.0);
    }
    let interest = remaining_balance * buy.mortgage_rate;
    let principal = (annual_mortgage - interest).max(0.0).min(remaining_balance);
    (interest + principal, interest, principal)
}

fn net_cost_after_sale(last: &BuyYearDetail, selling_cost_rate: f64) -> f64 {
    let sale_proceeds = last.home_value * (1.0 - selling_cost_rate) - last.remaining_balance;
    last.gross_cumulative_cost - sale_proceeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::{prop_assert, prop_assert_eq, proptest};

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    fn assert_approx_tol(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() <= tol,
            "expected {expected}, got {actual}, tolerance {tol}"
        );
    }

    fn bare_inputs() -> BuyInputs {
        BuyInputs {
            home_price: 300_000.0,
            down_payment: 60_000.0,
            loan_term_years: 30,
            mortgage_rate: 0.0,
            property_tax_rate: 0.0,
            insurance: InsuranceCost::Annual(0.0),
            maintenance_rate: 0.0,
            hoa_monthly: 0.0,
            appreciation_rate: 0.0,
            selling_cost_rate: 0.0,
            cost_basis: CostBasis::PurchasePrice,
            include_down_payment: false,
        }
    }

    #[test]
    fn zero_rate_payment_is_straight_line() {
        assert_eq!(monthly_payment(240_000.0, 0.0, 30), 240_000.0 / 360.0);
    }

    #[test]
    fn zero_term_payment_is_zero() {
        assert_eq!(monthly_payment(240_000.0, 0.04, 0), 0.0);
    }

    #[test]
    fn amortizing_payment_matches_known_value() {
        assert_approx_tol(monthly_payment(240_000.0, 0.04, 30), 1_145.80, 0.01);
        assert_approx_tol(monthly_payment(100_000.0, 0.05, 30), 536.82, 0.01);
    }

    #[test]
    fn one_year_zero_rate_mortgage_only() {
        let projection = project_buy(&bare_inputs(), 1, AccountingMode::Gross);
        assert_eq!(projection.series.len(), 1);
        assert_approx(projection.loan_amount, 240_000.0);
        assert_approx(projection.series.cumulative_costs()[0], 8_000.0);
        assert_eq!(projection.net_cost_at_sale, None);
    }

    #[test]
    fn down_payment_counts_as_year_one_cost_when_included() {
        let mut buy = bare_inputs();
        buy.include_down_payment = true;
        let projection = project_buy(&buy, 2, AccountingMode::Gross);
        let costs = projection.series.cumulative_costs();
        assert_approx(costs[0], 68_000.0);
        assert_approx(costs[1], 76_000.0);
        assert_approx(projection.years[0].equity, 68_000.0);
    }

    #[test]
    fn running_costs_on_purchase_price_ignore_appreciation() {
        let mut buy = bare_inputs();
        buy.home_price = 200_000.0;
        buy.down_payment = 200_000.0;
        buy.property_tax_rate = 0.01;
        buy.appreciation_rate = 0.10;

        let projection = project_buy(&buy, 2, AccountingMode::Gross);
        let costs = projection.series.cumulative_costs();
        assert_approx(costs[0], 2_000.0);
        assert_approx(costs[1], 4_000.0);
        assert_approx(projection.years[1].home_value, 242_000.0);
    }

    #[test]
    fn running_costs_on_current_value_follow_appreciation() {
        let mut buy = bare_inputs();
        buy.home_price = 200_000.0;
        buy.down_payment = 200_000.0;
        buy.property_tax_rate = 0.01;
        buy.maintenance_rate = 0.01;
        buy.appreciation_rate = 0.10;
        buy.cost_basis = CostBasis::CurrentValue;

        let projection = project_buy(&buy, 2, AccountingMode::Gross);
        assert_approx(projection.years[0].property_tax, 2_000.0);
        assert_approx(projection.years[1].property_tax, 2_200.0);
        assert_approx(projection.years[1].maintenance, 2_200.0);
        assert_approx(projection.series.cumulative_costs()[1], 8_400.0);
    }

    #[test]
    fn insurance_and_hoa_are_added_each_year() {
        let mut buy = bare_inputs();
        buy.down_payment = buy.home_price;
        buy.insurance = InsuranceCost::RateOfHomeValue(0.002);
        buy.hoa_monthly = 100.0;

        let projection = project_buy(&buy, 3, AccountingMode::Gross);
        assert_approx(projection.years[0].insurance, 600.0);
        assert_approx(projection.years[0].hoa, 1_200.0);
        assert_approx(projection.series.cumulative_costs()[2], 3.0 * 1_800.0);

        buy.insurance = InsuranceCost::Annual(900.0);
        let projection = project_buy(&buy, 1, AccountingMode::Gross);
        assert_approx(projection.series.cumulative_costs()[0], 2_100.0);
    }

    #[test]
    fn mortgage_stops_after_the_loan_term() {
        let mut buy = bare_inputs();
        buy.home_price = 120_000.0;
        buy.down_payment = 0.0;
        buy.loan_term_years = 1;

        let projection = project_buy(&buy, 3, AccountingMode::Gross);
        assert_eq!(
            projection.series.cumulative_costs(),
            vec![120_000.0, 120_000.0, 120_000.0]
        );
        assert_eq!(projection.years[0].remaining_balance, 0.0);
        assert_eq!(projection.years[2].mortgage_paid, 0.0);
    }

    #[test]
    fn first_year_equity_is_payment_less_interest_on_balance() {
        let mut buy = bare_inputs();
        buy.home_price = 100_000.0;
        buy.down_payment = 0.0;
        buy.mortgage_rate = 0.05;

        let projection = project_buy(&buy, 1, AccountingMode::NetOfEquity);
        let first = projection.years[0];
        let annual_payment = projection.monthly_payment * 12.0;
        assert_approx(first.interest_paid, 5_000.0);
        assert_approx(first.equity, annual_payment - 5_000.0);
        assert_approx(first.remaining_balance, 100_000.0 - first.equity);
        assert_approx(
            projection.series.cumulative_costs()[0],
            annual_payment - first.equity,
        );
    }

    #[test]
    fn interest_is_charged_on_declining_balance() {
        let mut buy = bare_inputs();
        buy.mortgage_rate = 0.04;

        let projection = project_buy(&buy, 2, AccountingMode::Gross);
        let second = projection.years[1];
        assert_approx(
            second.interest_paid,
            projection.years[0].remaining_balance * 0.04,
        );
        assert!(second.interest_paid < projection.years[0].interest_paid);
    }

    #[test]
    fn zero_rate_loan_is_repaid_by_end_of_term() {
        let projection = project_buy(&bare_inputs(), 35, AccountingMode::Gross);
        let at_term = projection.years[29];
        assert_approx(at_term.remaining_balance, 0.0);
        assert_approx(at_term.equity, 240_000.0);
        assert_eq!(projection.years[34].mortgage_paid, 0.0);
    }

    #[test]
    fn residual_balance_survives_the_term_unpaid() {
        let mut buy = bare_inputs();
        buy.mortgage_rate = 0.04;

        let projection = project_buy(&buy, 35, AccountingMode::Gross);
        let at_term = projection.years[29];
        assert!(at_term.remaining_balance > 0.0);
        assert_approx(at_term.equity, 240_000.0 - at_term.remaining_balance);

        let after = projection.years[34];
        assert_eq!(after.mortgage_paid, 0.0);
        assert_eq!(after.principal_paid, 0.0);
        assert_eq!(after.remaining_balance, at_term.remaining_balance);
        assert_approx(after.gross_cumulative_cost, at_term.gross_cumulative_cost);
    }

    #[test]
    fn high_rate_long_term_net_of_equity_never_drops() {
        let buy = BuyInputs {
            home_price: 100_000.0,
            down_payment: 0.0,
            loan_term_years: 40,
            mortgage_rate: 0.15,
            ..bare_inputs()
        };

        let projection = project_buy(&buy, 40, AccountingMode::NetOfEquity);
        for detail in &projection.years {
            assert_approx(detail.interest_paid + detail.principal_paid, detail.mortgage_paid);
            assert!(detail.principal_paid <= detail.mortgage_paid);
        }
        let costs = projection.series.cumulative_costs();
        for pair in costs.windows(2) {
            assert!(pair[1] >= pair[0], "{} then {}", pair[0], pair[1]);
        }
        assert!(projection.years[39].remaining_balance > 0.0);
    }

    #[test]
    fn net_of_equity_cancels_zero_rate_mortgage() {
        let mut buy = bare_inputs();
        buy.home_price = 120_000.0;
        buy.down_payment = 0.0;
        buy.loan_term_years = 10;

        let projection = project_buy(&buy, 12, AccountingMode::NetOfEquity);
        for cost in projection.series.cumulative_costs() {
            assert_approx(cost, 0.0);
        }
    }

    #[test]
    fn net_of_equity_leaves_only_unrecoverable_costs() {
        let mut buy = bare_inputs();
        buy.include_down_payment = true;
        buy.property_tax_rate = 0.01;

        let gross = project_buy(&buy, 3, AccountingMode::Gross);
        let net = project_buy(&buy, 3, AccountingMode::NetOfEquity);
        let net_costs = net.series.cumulative_costs();
        assert_approx(net_costs[0], 3_000.0);
        assert_approx(net_costs[2], 9_000.0);
        for (g, n) in gross.years.iter().zip(&net_costs) {
            assert_approx(*n, g.gross_cumulative_cost - g.equity);
        }
    }

    #[test]
    fn net_of_sale_subtracts_proceeds_at_horizon() {
        let mut buy = bare_inputs();
        buy.home_price = 100_000.0;
        buy.down_payment = 100_000.0;
        buy.mortgage_rate = 0.04;
        buy.selling_cost_rate = 0.06;

        let projection = project_buy(&buy, 5, AccountingMode::NetOfSale);
        assert_approx(
            projection.net_cost_at_sale.expect("net cost in sale mode"),
            -94_000.0,
        );
        assert_approx(projection.series.cumulative_costs()[4], 0.0);

        buy.include_down_payment = true;
        let projection = project_buy(&buy, 5, AccountingMode::NetOfSale);
        assert_approx(
            projection.net_cost_at_sale.expect("net cost in sale mode"),
            6_000.0,
        );
    }

    #[test]
    fn net_of_sale_counts_outstanding_loan_and_appreciation() {
        let mut buy = bare_inputs();
        buy.appreciation_rate = 0.05;
        buy.selling_cost_rate = 0.05;

        let projection = project_buy(&buy, 2, AccountingMode::NetOfSale);
        let last = projection.years[1];
        assert_approx(last.home_value, 300_000.0 * 1.05 * 1.05);
        assert_approx(last.remaining_balance, 240_000.0 - 16_000.0);
        let expected = last.gross_cumulative_cost
            - (last.home_value * 0.95 - last.remaining_balance);
        assert_approx(projection.net_cost_at_sale.unwrap_or(f64::NAN), expected);
    }

    proptest! {
        #![proptest_config(proptest::test_runner::Config::with_cases(48))]

        #[test]
        fn prop_gross_series_is_non_decreasing_and_loan_amortizes(
            home_price in 0u32..2_000_000,
            down_pct in 0u32..101,
            term in 1u32..41,
            horizon in 1u32..61,
            rate_bp in 0u32..1_500,
            tax_bp in 0u32..300,
            appreciation_bp in 0u32..1_000,
            current_value_basis in proptest::bool::ANY,
        ) {
            let home_price = home_price as f64;
            let buy = BuyInputs {
                home_price,
                down_payment: home_price * down_pct as f64 / 100.0,
                loan_term_years: term,
                mortgage_rate: rate_bp as f64 / 10_000.0,
                property_tax_rate: tax_bp as f64 / 10_000.0,
                insurance: InsuranceCost::RateOfHomeValue(0.002),
                maintenance_rate: 0.01,
                hoa_monthly: 50.0,
                appreciation_rate: appreciation_bp as f64 / 10_000.0,
                selling_cost_rate: 0.06,
                cost_basis: if current_value_basis {
                    CostBasis::CurrentValue
                } else {
                    CostBasis::PurchasePrice
                },
                include_down_payment: false,
            };

            let projection = project_buy(&buy, horizon, AccountingMode::Gross);
            prop_assert_eq!(projection.series.len(), horizon as usize);

            let costs = projection.series.cumulative_costs();
            for pair in costs.windows(2) {
                prop_assert!(pair[1] >= pair[0]);
            }

            let mut previous_balance = projection.loan_amount;
            for detail in &projection.years {
                prop_assert!((detail.interest_paid + detail.principal_paid - detail.mortgage_paid).abs() < EPS);
                prop_assert!(detail.principal_paid <= detail.mortgage_paid + EPS);
                prop_assert!(detail.remaining_balance >= 0.0);
                prop_assert!(detail.remaining_balance <= previous_balance);
                prop_assert!(detail.equity <= projection.loan_amount + 1e-6);
                previous_balance = detail.remaining_balance;
            }
            let net = project_buy(&buy, horizon, AccountingMode::NetOfEquity);
            for pair in net.series.cumulative_costs().windows(2) {
                prop_assert!(pair[1] >= pair[0] - EPS);
            }
            if horizon > term {
                let at_term = projection.years[term as usize - 1];
                prop_assert_eq!(projection.years[horizon as usize - 1].remaining_balance, at_term.remaining_balance);
            }
        }
    }
}
