use serde::Serialize;

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum AccountingMode {
    #[default]
    Gross,
    NetOfEquity,
    NetOfSale,
}

/// Home value used for property tax, maintenance and rate-based insurance.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum CostBasis {
    /// Original purchase price, every year.
    #[default]
    PurchasePrice,
    /// Appreciated value at the start of each year.
    CurrentValue,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum InsuranceCost {
    Annual(f64),
    RateOfHomeValue(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RentInputs {
    pub monthly_rent: f64,
    pub annual_rent_increase: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuyInputs {
    pub home_price: f64,
    pub down_payment: f64,
    pub loan_term_years: u32,
    pub mortgage_rate: f64,
    pub property_tax_rate: f64,
    pub insurance: InsuranceCost,
    pub maintenance_rate: f64,
    pub hoa_monthly: f64,
    pub appreciation_rate: f64,
    pub selling_cost_rate: f64,
    pub cost_basis: CostBasis,
    pub include_down_payment: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    pub rent: RentInputs,
    pub buy: BuyInputs,
    pub horizon_years: u32,
    pub accounting_mode: AccountingMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearCost {
    pub year: u32,
    pub cumulative_cost: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CostSeries {
    points: Vec<YearCost>,
}

impl CostSeries {
    pub fn from_cumulative<I>(costs: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let points = costs
            .into_iter()
            .zip(1u32..)
            .map(|(cumulative_cost, year)| YearCost {
                year,
                cumulative_cost,
            })
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[YearCost] {
        &self.points
    }

    pub fn get(&self, year: u32) -> Option<&YearCost> {
        let index = usize::try_from(year).ok()?.checked_sub(1)?;
        self.points.get(index)
    }

    pub fn last(&self) -> Option<&YearCost> {
        self.points.last()
    }

    pub fn years(&self) -> Vec<u32> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn cumulative_costs(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.cumulative_cost).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyYearDetail {
    pub year: u32,
    pub home_value: f64,
    pub mortgage_paid: f64,
    pub interest_paid: f64,
    pub principal_paid: f64,
    pub property_tax: f64,
    pub insurance: f64,
    pub maintenance: f64,
    pub hoa: f64,
    pub annual_cost: f64,
    pub gross_cumulative_cost: f64,
    pub remaining_balance: f64,
    pub equity: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BuyProjection {
    pub loan_amount: f64,
    pub monthly_payment: f64,
    pub series: CostSeries,
    pub years: Vec<BuyYearDetail>,
    pub net_cost_at_sale: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Crossover {
    pub year: u32,
    pub rent_cost: f64,
    pub buy_cost: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub horizon_years: u32,
    pub accounting_mode: AccountingMode,
    pub rent_series: CostSeries,
    pub buy: BuyProjection,
    pub crossover: Option<Crossover>,
}
