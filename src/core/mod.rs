mod buy;
mod crossover;
mod engine;
mod errors;
mod rent;
mod report;
mod types;
mod validation;

pub use buy::{monthly_payment, project_buy};
pub use crossover::find_crossover;
pub use engine::run_comparison;
pub use errors::{CalculatorError, CalculatorResult};
pub use rent::project_rent;
pub use report::{ChartData, DISCLAIMER, chart_data, format_money, render_table, summary_text};
pub use types::{
    AccountingMode, BuyInputs, BuyProjection, BuyYearDetail, Comparison, CostBasis, CostSeries,
    Crossover, InsuranceCost, Parameters, RentInputs, YearCost,
};
pub use validation::{MAX_HORIZON_YEARS, validate_parameters};
