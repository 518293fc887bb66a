// 📊 Financial Metrics - Ratios and European metrics from reported facts
// Each metric can be laid next to its sector average for comparison

use crate::facts::Fact;
use crate::xbrl::SectorAverages;
use serde::Serialize;

/// Value of the first fact whose concept contains `name`, case-insensitively
///
/// Commas are stripped before parsing. Unparsable values and missing facts
/// both count as 0.0.
pub fn fact_value(facts: &[Fact], name: &str) -> f64 {
    let needle = name.to_lowercase();
    facts
        .iter()
        .find(|fact| fact.concept.to_lowercase().contains(&needle))
        .map(|fact| fact.value.replace(',', "").trim().parse::<f64>().unwrap_or(0.0))
        .unwrap_or(0.0)
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

// ============================================================================
// METRIC SETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialRatios {
    pub current_ratio: f64,
    pub debt_to_equity_ratio: f64,
    pub return_on_assets: f64,
    pub return_on_equity: f64,
    pub profit_margin: f64,
}

impl FinancialRatios {
    pub fn calculate(facts: &[Fact]) -> Self {
        let current_assets = fact_value(facts, "CurrentAssets");
        let current_liabilities = fact_value(facts, "CurrentLiabilities");
        let total_assets = fact_value(facts, "Assets");
        let total_liabilities = fact_value(facts, "Liabilities");
        let equity = fact_value(facts, "Equity");
        let net_income = fact_value(facts, "ProfitLoss");
        let revenue = fact_value(facts, "Revenue");

        FinancialRatios {
            current_ratio: ratio(current_assets, current_liabilities),
            debt_to_equity_ratio: ratio(total_liabilities, equity),
            return_on_assets: ratio(net_income, total_assets),
            return_on_equity: ratio(net_income, equity),
            profit_margin: ratio(net_income, revenue),
        }
    }

    /// (sector-average key, value) pairs in display order
    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("CurrentRatio", self.current_ratio),
            ("DebtToEquityRatio", self.debt_to_equity_ratio),
            ("ReturnOnAssets", self.return_on_assets),
            ("ReturnOnEquity", self.return_on_equity),
            ("ProfitMargin", self.profit_margin),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EuropeanMetrics {
    pub asset_turnover: f64,
    pub working_capital: f64,
    pub equity_ratio: f64,
    pub revenue_growth: f64,
}

impl EuropeanMetrics {
    pub fn calculate(facts: &[Fact]) -> Self {
        let total_assets = fact_value(facts, "Assets");
        let current_assets = fact_value(facts, "CurrentAssets");
        let current_liabilities = fact_value(facts, "CurrentLiabilities");
        let equity = fact_value(facts, "Equity");
        let revenue = fact_value(facts, "Revenue");
        let prior_year_revenue = fact_value(facts, "PriorYearRevenue");

        EuropeanMetrics {
            asset_turnover: ratio(revenue, total_assets),
            working_capital: current_assets - current_liabilities,
            equity_ratio: ratio(equity, total_assets),
            revenue_growth: ratio(revenue - prior_year_revenue, prior_year_revenue),
        }
    }

    pub fn entries(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("AssetTurnover", self.asset_turnover),
            ("WorkingCapital", self.working_capital),
            ("EquityRatio", self.equity_ratio),
            ("RevenueGrowth", self.revenue_growth),
        ]
    }
}

// ============================================================================
// SECTOR COMPARISON
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub label: String,
    pub company: f64,
    pub sector: f64,
}

/// Titled set of comparison rows, rendered as one chart/table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub title: String,
    pub rows: Vec<ComparisonRow>,
}

impl Comparison {
    /// Largest magnitude across both series, for bar scaling
    pub fn max_magnitude(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| [row.company.abs(), row.sector.abs()])
            .fold(0.0, f64::max)
    }
}

/// Pair each metric with its sector average (0 when unknown)
pub fn compare_with_sector(
    title: &str,
    entries: &[(&str, f64)],
    sector_averages: &SectorAverages,
) -> Comparison {
    Comparison {
        title: title.to_string(),
        rows: entries
            .iter()
            .map(|(label, company)| ComparisonRow {
                label: label.to_string(),
                company: *company,
                sector: sector_averages.get(*label).copied().unwrap_or(0.0),
            })
            .collect(),
    }
}

/// Both standard comparisons for a fact set
pub fn standard_comparisons(facts: &[Fact], sector_averages: &SectorAverages) -> Vec<Comparison> {
    vec![
        compare_with_sector(
            "Financial Ratios Comparison",
            &FinancialRatios::calculate(facts).entries(),
            sector_averages,
        ),
        compare_with_sector(
            "European Metrics Comparison",
            &EuropeanMetrics::calculate(facts).entries(),
            sector_averages,
        ),
    ]
}

// ============================================================================
// TESTS
// ============================================================================
