use axum::{
    Router,
    extract::{
        Json, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::core::{
    AccountingMode, BuyInputs, BuyYearDetail, CalculatorError, CalculatorResult, ChartData,
    Comparison, CostBasis, CostSeries, Crossover, DISCLAIMER, InsuranceCost, Parameters,
    RentInputs, chart_data, render_table, run_comparison, summary_text, validate_parameters,
};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

const DEFAULT_MONTHLY_RENT: f64 = 1_000.0;
const DEFAULT_HOME_PRICE: f64 = 300_000.0;
const DEFAULT_DOWN_PAYMENT: f64 = 60_000.0;
const DEFAULT_MORTGAGE_RATE: f64 = 4.0;
const DEFAULT_LOAN_TERM_YEARS: u32 = 30;
const DEFAULT_PROPERTY_TAX_RATE: f64 = 1.0;
const DEFAULT_INSURANCE_RATE: f64 = 0.2;
const DEFAULT_MAINTENANCE_RATE: f64 = 1.0;
const DEFAULT_SELLING_COST_RATE: f64 = 6.0;
const DEFAULT_HORIZON_YEARS: u32 = 30;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliAccountingMode {
    Gross,
    NetOfEquity,
    NetOfSale,
}

impl From<CliAccountingMode> for AccountingMode {
    fn from(value: CliAccountingMode) -> Self {
        match value {
            CliAccountingMode::Gross => AccountingMode::Gross,
            CliAccountingMode::NetOfEquity => AccountingMode::NetOfEquity,
            CliAccountingMode::NetOfSale => AccountingMode::NetOfSale,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum CliCostBasis {
    PurchasePrice,
    CurrentValue,
}

impl From<CliCostBasis> for CostBasis {
    fn from(value: CliCostBasis) -> Self {
        match value {
            CliCostBasis::PurchasePrice => CostBasis::PurchasePrice,
            CliCostBasis::CurrentValue => CostBasis::CurrentValue,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiAccountingMode {
    Gross,
    #[serde(alias = "netOfEquity", alias = "net_of_equity", alias = "equity")]
    NetOfEquity,
    #[serde(alias = "netOfSale", alias = "net_of_sale", alias = "sale")]
    NetOfSale,
}

impl From<ApiAccountingMode> for CliAccountingMode {
    fn from(value: ApiAccountingMode) -> Self {
        match value {
            ApiAccountingMode::Gross => CliAccountingMode::Gross,
            ApiAccountingMode::NetOfEquity => CliAccountingMode::NetOfEquity,
            ApiAccountingMode::NetOfSale => CliAccountingMode::NetOfSale,
        }
    }
}

impl From<AccountingMode> for ApiAccountingMode {
    fn from(value: AccountingMode) -> Self {
        match value {
            AccountingMode::Gross => ApiAccountingMode::Gross,
            AccountingMode::NetOfEquity => ApiAccountingMode::NetOfEquity,
            AccountingMode::NetOfSale => ApiAccountingMode::NetOfSale,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
enum ApiCostBasis {
    #[serde(alias = "purchasePrice", alias = "purchase_price", alias = "purchase")]
    PurchasePrice,
    #[serde(alias = "currentValue", alias = "current_value", alias = "current")]
    CurrentValue,
}

impl From<ApiCostBasis> for CliCostBasis {
    fn from(value: ApiCostBasis) -> Self {
        match value {
            ApiCostBasis::PurchasePrice => CliCostBasis::PurchasePrice,
            ApiCostBasis::CurrentValue => CliCostBasis::CurrentValue,
        }
    }
}

impl From<CostBasis> for ApiCostBasis {
    fn from(value: CostBasis) -> Self {
        match value {
            CostBasis::PurchasePrice => ApiCostBasis::PurchasePrice,
            CostBasis::CurrentValue => ApiCostBasis::CurrentValue,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ComparePayload {
    monthly_rent: Option<f64>,
    annual_rent: Option<f64>,
    rent_increase: Option<f64>,

    home_price: Option<f64>,
    down_payment: Option<f64>,
    mortgage_rate: Option<f64>,
    #[serde(alias = "loanTerm")]
    loan_term_years: Option<u32>,
    property_tax_rate: Option<f64>,
    insurance_annual: Option<f64>,
    insurance_rate: Option<f64>,
    maintenance_rate: Option<f64>,
    hoa_monthly: Option<f64>,
    appreciation_rate: Option<f64>,
    selling_cost_rate: Option<f64>,
    include_down_payment: Option<bool>,

    #[serde(alias = "horizon")]
    horizon_years: Option<u32>,
    accounting_mode: Option<ApiAccountingMode>,
    cost_basis: Option<ApiCostBasis>,
}

#[derive(Args, Debug, Clone)]
pub struct CompareArgs {
    #[arg(
        long,
        conflicts_with = "annual_rent",
        help = "Monthly rent in the first year [default: 1000]"
    )]
    pub monthly_rent: Option<f64>,
    #[arg(long, help = "Annual rent in the first year, as an alternative to --monthly-rent")]
    pub annual_rent: Option<f64>,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual rent increase in percent, applied from the second year"
    )]
    pub rent_increase: f64,
    #[arg(long, default_value_t = DEFAULT_HOME_PRICE)]
    pub home_price: f64,
    #[arg(long, default_value_t = DEFAULT_DOWN_PAYMENT)]
    pub down_payment: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MORTGAGE_RATE,
        help = "Annual mortgage rate in percent"
    )]
    pub mortgage_rate: f64,
    #[arg(long, default_value_t = DEFAULT_LOAN_TERM_YEARS)]
    pub loan_term_years: u32,
    #[arg(
        long,
        default_value_t = DEFAULT_PROPERTY_TAX_RATE,
        help = "Annual property tax in percent of the home value"
    )]
    pub property_tax_rate: f64,
    #[arg(
        long,
        conflicts_with = "insurance_rate",
        help = "Fixed annual home insurance premium; replaces --insurance-rate"
    )]
    pub insurance_annual: Option<f64>,
    #[arg(
        long,
        default_value_t = DEFAULT_INSURANCE_RATE,
        help = "Annual home insurance in percent of the home value"
    )]
    pub insurance_rate: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MAINTENANCE_RATE,
        help = "Annual maintenance in percent of the home value"
    )]
    pub maintenance_rate: f64,
    #[arg(long, default_value_t = 0.0, help = "Monthly HOA fee")]
    pub hoa_monthly: f64,
    #[arg(
        long,
        default_value_t = 0.0,
        help = "Annual home price appreciation in percent"
    )]
    pub appreciation_rate: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_SELLING_COST_RATE,
        help = "Selling costs in percent of the sale price, used with --accounting-mode=net-of-sale"
    )]
    pub selling_cost_rate: f64,
    #[arg(long, help = "Count the down payment as a first-year cost of buying")]
    pub include_down_payment: bool,
    #[arg(long, default_value_t = DEFAULT_HORIZON_YEARS, help = "Years to compare")]
    pub horizon_years: u32,
    #[arg(
        long,
        value_enum,
        default_value_t = CliAccountingMode::Gross,
        help = "Buy cost accounting: gross, net of equity, or gross with net cost after selling"
    )]
    pub accounting_mode: CliAccountingMode,
    #[arg(
        long,
        value_enum,
        default_value_t = CliCostBasis::PurchasePrice,
        help = "Value that tax, maintenance and rate-based insurance are charged on"
    )]
    pub cost_basis: CliCostBasis,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompareResponse {
    accounting_mode: ApiAccountingMode,
    cost_basis: ApiCostBasis,
    horizon_years: u32,
    loan_amount: f64,
    monthly_mortgage_payment: f64,
    rent_series: CostSeries,
    buy_series: CostSeries,
    buy_years: Vec<BuyYearDetail>,
    crossover: Option<Crossover>,
    net_cost_at_sale: Option<f64>,
    chart: ChartData,
    summary: String,
    disclaimer: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Calculator(#[from] CalculatorError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Not found")]
    NotFound,
    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Calculator(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, &self.to_string())
    }
}

pub fn build_parameters(args: CompareArgs) -> CalculatorResult<Parameters> {
    let monthly_rent = match (args.monthly_rent, args.annual_rent) {
        (Some(monthly), _) => monthly,
        (None, Some(annual)) => annual / 12.0,
        (None, None) => DEFAULT_MONTHLY_RENT,
    };
    let insurance = match args.insurance_annual {
        Some(amount) => InsuranceCost::Annual(amount),
        None => InsuranceCost::RateOfHomeValue(args.insurance_rate / 100.0),
    };

    let params = Parameters {
        rent: RentInputs {
            monthly_rent,
            annual_rent_increase: args.rent_increase / 100.0,
        },
        buy: BuyInputs {
            home_price: args.home_price,
            down_payment: args.down_payment,
            loan_term_years: args.loan_term_years,
            mortgage_rate: args.mortgage_rate / 100.0,
            property_tax_rate: args.property_tax_rate / 100.0,
            insurance,
            maintenance_rate: args.maintenance_rate / 100.0,
            hoa_monthly: args.hoa_monthly,
            appreciation_rate: args.appreciation_rate / 100.0,
            selling_cost_rate: args.selling_cost_rate / 100.0,
            cost_basis: args.cost_basis.into(),
            include_down_payment: args.include_down_payment,
        },
        horizon_years: args.horizon_years,
        accounting_mode: args.accounting_mode.into(),
    };
    validate_parameters(&params)?;
    Ok(params)
}

pub fn run_compare_cli(args: CompareArgs, json: bool) -> Result<String, ApiError> {
    let params = build_parameters(args)?;
    let comparison = run_comparison(&params)?;
    if json {
        let response = build_compare_response(&params, &comparison);
        return Ok(serde_json::to_string_pretty(&response)?);
    }
    Ok(format!(
        "{}\n\n{}\n{}",
        summary_text(&comparison),
        render_table(&comparison),
        DISCLAIMER
    ))
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route(
            "/api/compare",
            get(compare_get_handler).post(compare_post_handler),
        )
        .fallback(not_found_handler)
}

pub async fn run_http_server(config: ServerConfig) -> std::io::Result<()> {
    let addr = config.listen_addr;
    let listener = TcpListener::bind(addr).await?;
    info!("rent vs buy HTTP API listening on http://{addr}");
    info!("Local access: http://127.0.0.1:{}/", addr.port());

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

async fn compare_get_handler(
    query: Result<Query<ComparePayload>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(payload) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    compare_handler_impl(payload)
}

async fn compare_post_handler(
    body: Result<Json<ComparePayload>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    compare_handler_impl(payload)
}

fn compare_handler_impl(payload: ComparePayload) -> Result<Response, ApiError> {
    debug!(?payload, "compare request");
    let params = parameters_from_payload(payload)
        .inspect_err(|e| warn!(error = %e, "rejected compare request"))?;
    let comparison = run_comparison(&params)?;
    let response = build_compare_response(&params, &comparison);
    Ok(json_response(StatusCode::OK, response))
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        "no-store".parse().expect("valid header"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
        },
    )
}

#[cfg(test)]
fn parameters_from_json(json: &str) -> Result<Parameters, ApiError> {
    let payload = serde_json::from_str::<ComparePayload>(json)
        .map_err(|e| ApiError::BadRequest(format!("Invalid API JSON payload: {e}")))?;
    Ok(parameters_from_payload(payload)?)
}

fn parameters_from_payload(payload: ComparePayload) -> CalculatorResult<Parameters> {
    if payload.monthly_rent.is_some() && payload.annual_rent.is_some() {
        return Err(CalculatorError::invalid(
            "annual_rent",
            "cannot be combined with monthly_rent",
        ));
    }
    if payload.insurance_annual.is_some() && payload.insurance_rate.is_some() {
        return Err(CalculatorError::invalid(
            "insurance_annual",
            "cannot be combined with insurance_rate",
        ));
    }

    let mut args = default_args_for_api();

    if let Some(v) = payload.annual_rent {
        args.annual_rent = Some(v);
        args.monthly_rent = None;
    }
    if let Some(v) = payload.monthly_rent {
        args.monthly_rent = Some(v);
        args.annual_rent = None;
    }
    if let Some(v) = payload.rent_increase {
        args.rent_increase = v;
    }

    if let Some(v) = payload.home_price {
        args.home_price = v;
    }
    if let Some(v) = payload.down_payment {
        args.down_payment = v;
    }
    if let Some(v) = payload.mortgage_rate {
        args.mortgage_rate = v;
    }
    if let Some(v) = payload.loan_term_years {
        args.loan_term_years = v;
    }
    if let Some(v) = payload.property_tax_rate {
        args.property_tax_rate = v;
    }
    if let Some(v) = payload.insurance_rate {
        args.insurance_rate = v;
    }
    if let Some(v) = payload.insurance_annual {
        args.insurance_annual = Some(v);
    }
    if let Some(v) = payload.maintenance_rate {
        args.maintenance_rate = v;
    }
    if let Some(v) = payload.hoa_monthly {
        args.hoa_monthly = v;
    }
    if let Some(v) = payload.appreciation_rate {
        args.appreciation_rate = v;
    }
    if let Some(v) = payload.selling_cost_rate {
        args.selling_cost_rate = v;
    }
    if let Some(v) = payload.include_down_payment {
        args.include_down_payment = v;
    }

    if let Some(v) = payload.horizon_years {
        args.horizon_years = v;
    }
    if let Some(v) = payload.accounting_mode {
        args.accounting_mode = v.into();
    }
    if let Some(v) = payload.cost_basis {
        args.cost_basis = v.into();
    }

    build_parameters(args)
}

fn default_args_for_api() -> CompareArgs {
    CompareArgs {
        monthly_rent: Some(DEFAULT_MONTHLY_RENT),
        annual_rent: None,
        rent_increase: 0.0,
        home_price: DEFAULT_HOME_PRICE,
        down_payment: DEFAULT_DOWN_PAYMENT,
        mortgage_rate: DEFAULT_MORTGAGE_RATE,
        loan_term_years: DEFAULT_LOAN_TERM_YEARS,
        property_tax_rate: DEFAULT_PROPERTY_TAX_RATE,
        insurance_annual: None,
        insurance_rate: DEFAULT_INSURANCE_RATE,
        maintenance_rate: DEFAULT_MAINTENANCE_RATE,
        hoa_monthly: 0.0,
        appreciation_rate: 0.0,
        selling_cost_rate: DEFAULT_SELLING_COST_RATE,
        include_down_payment: false,
        horizon_years: DEFAULT_HORIZON_YEARS,
        accounting_mode: CliAccountingMode::Gross,
        cost_basis: CliCostBasis::PurchasePrice,
    }
}

fn build_compare_response(params: &Parameters, comparison: &Comparison) -> CompareResponse {
    CompareResponse {
        accounting_mode: comparison.accounting_mode.into(),
        cost_basis: params.buy.cost_basis.into(),
        horizon_years: comparison.horizon_years,
        loan_amount: comparison.buy.loan_amount,
        monthly_mortgage_payment: comparison.buy.monthly_payment,
        rent_series: comparison.rent_series.clone(),
        buy_series: comparison.buy.series.clone(),
        buy_years: comparison.buy.years.clone(),
        crossover: comparison.crossover,
        net_cost_at_sale: comparison.buy.net_cost_at_sale,
        chart: chart_data(comparison),
        summary: summary_text(comparison),
        disclaimer: DISCLAIMER,
    }
}
