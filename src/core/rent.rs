use super::types::{CostSeries, RentInputs};

pub fn project_rent(rent: &RentInputs, horizon_years: u32) -> CostSeries {
    let mut monthly_rent = rent.monthly_rent;
    let mut cumulative = 0.0;
    let mut costs = Vec::with_capacity(horizon_years as usize);

    for _ in 0..horizon_years {
        cumulative += monthly_rent * 12.0;
        costs.push(cumulative);
        monthly_rent *= 1.0 + rent.annual_rent_increase;
    }

    CostSeries::from_cumulative(costs)
}
