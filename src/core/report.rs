use std::fmt::Write as _;

use serde::Serialize;

use super::types::{AccountingMode, Comparison};

pub const DISCLAIMER: &str = "These figures are projections based on the assumptions entered. \
Actual rents, rates, taxes, maintenance and home prices will differ, so treat the results as \
an estimate rather than financial advice.";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub legend: [&'static str; 2],
    pub years: Vec<u32>,
    pub rent: Vec<f64>,
    pub buy: Vec<f64>,
    pub highlight_year: Option<u32>,
    pub highlight_label: Option<String>,
}

pub fn chart_data(comparison: &Comparison) -> ChartData {
    ChartData {
        title: "Rent vs Buy Cumulative Costs",
        x_label: "Years",
        y_label: "Cumulative Costs ($)",
        legend: ["Rent Cost", buy_label(comparison.accounting_mode)],
        years: comparison.rent_series.years(),
        rent: comparison.rent_series.cumulative_costs(),
        buy: comparison.buy.series.cumulative_costs(),
        highlight_year: comparison.crossover.map(|c| c.year),
        highlight_label: comparison
            .crossover
            .map(|c| format!("Crossover at Year {}", c.year)),
    }
}

fn buy_label(mode: AccountingMode) -> &'static str {
    match mode {
        AccountingMode::Gross | AccountingMode::NetOfSale => "Buy Cost",
        AccountingMode::NetOfEquity => "Buy Cost (net of equity)",
    }
}

pub fn summary_text(comparison: &Comparison) -> String {
    let horizon = comparison.horizon_years;
    let final_rent = comparison.rent_series.last().map(|p| p.cumulative_cost);
    if let (Some(net), Some(rent)) = (comparison.buy.net_cost_at_sale, final_rent) {
        return sale_summary(comparison, net, rent);
    }

    let mut summary = match comparison.crossover {
        Some(c) => format!(
            "Buying becomes cheaper than renting in year {}: cumulative rent {} vs. cumulative buying cost {}.",
            c.year,
            format_money(c.rent_cost),
            format_money(c.buy_cost),
        ),
        None => {
            let rent = comparison.rent_series.last().map(|p| p.cumulative_cost);
            let buy = comparison.buy.series.last().map(|p| p.cumulative_cost);
            match (rent, buy) {
                (Some(rent), Some(buy)) => format!(
                    "Buying never becomes cheaper than renting within the {horizon}-year horizon: cumulative rent {} vs. cumulative buying cost {} in year {horizon}.",
                    format_money(rent),
                    format_money(buy),
                ),
                _ => "No years were projected.".to_string(),
            }
        }
    };

    if comparison.accounting_mode == AccountingMode::NetOfEquity {
        summary.push_str(" Buying costs are shown net of the equity built up in the home.");
    }
    summary
}

// In sale mode the verdict rests on the net cost after selling, not on the
// gross curves.
fn sale_summary(comparison: &Comparison, net: f64, rent: f64) -> String {
    let horizon = comparison.horizon_years;
    let verdict = if net < rent {
        "buying is cheaper than renting"
    } else if net > rent {
        "renting is cheaper than buying"
    } else {
        "buying and renting cost the same"
    };
    let mut summary = format!(
        "After selling at the end of year {horizon}, buying costs a net {} vs. cumulative rent {}, so {verdict} over the {horizon}-year horizon.",
        format_money(net),
        format_money(rent),
    );
    match comparison.crossover {
        Some(c) => {
            let _ = write!(
                summary,
                " Before sale proceeds, cumulative buying costs drop below rent in year {}.",
                c.year
            );
        }
        None => summary.push_str(
            " Before sale proceeds, cumulative buying costs stay above rent in every year.",
        ),
    }
    summary
}

pub fn render_table(comparison: &Comparison) -> String {
    let crossover_year = comparison.crossover.map(|c| c.year);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:>16}  {:>16}",
        "Year",
        "Rent Cost",
        buy_label(comparison.accounting_mode)
    );
    let _ = writeln!(out, "{}", "-".repeat(40));
    for (rent, buy) in comparison
        .rent_series
        .points()
        .iter()
        .zip(comparison.buy.series.points())
    {
        let marker = if Some(rent.year) == crossover_year {
            "  <- crossover"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{:>4}  {:>16}  {:>16}{marker}",
            rent.year,
            format_money(rent.cumulative_cost),
            format_money(buy.cumulative_cost),
        );
    }
    out
}

pub fn format_money(value: f64) -> String {
    if !value.is_finite() {
        return format!("${value}");
    }
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}
