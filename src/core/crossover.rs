use super::errors::{CalculatorError, CalculatorResult};
use super::types::{CostSeries, Crossover};

pub fn find_crossover(rent: &CostSeries, buy: &CostSeries) -> CalculatorResult<Option<Crossover>> {
    if rent.len() != buy.len() {
        return Err(CalculatorError::SeriesLengthMismatch {
            rent: rent.len(),
            buy: buy.len(),
        });
    }

    let crossover = rent
        .points()
        .iter()
        .zip(buy.points())
        .find(|(r, b)| b.cumulative_cost < r.cumulative_cost)
        .map(|(r, b)| Crossover {
            year: r.year,
            rent_cost: r.cumulative_cost,
            buy_cost: b.cumulative_cost,
        });
    Ok(crossover)
}
