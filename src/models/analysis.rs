use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::QuoteId;

/// Production keyed by calendar month, 1 through 12.
pub type MonthlyProduction = BTreeMap<u8, f64>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarAnalysisResult {
    pub quote_id: QuoteId,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub system_size: f64,
    pub production: Production,
    pub co2_reduction: f64,
    pub recommendations: Recommendations,
    pub financial: Financial,
    pub quote_analysis: Vec<QuoteAnalysisEntry>,
    pub visualizations: Visualizations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Production {
    pub annual: f64,
    pub monthly: MonthlyProduction,
}

impl Production {
    pub fn monthly_total(&self) -> f64 {
        self.monthly.values().sum()
    }

    /// Running total per month, as plotted by the cumulative production chart.
    pub fn cumulative(&self) -> MonthlyProduction {
        let mut total = 0.0;
        self.monthly
            .iter()
            .map(|(month, kwh)| {
                total += kwh;
                (*month, total)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    pub general: Vec<String>,
    pub technical: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Financial {
    pub estimated_cost: f64,
    pub annual_savings: f64,
    pub payback_period: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteAnalysisEntry {
    pub components: String,
    pub price_assessment: String,
    pub guarantees: String,
    pub missing_elements: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visualizations {
    pub production_chart: String,
    pub cumulative_production: String,
    pub production_vs_consumption: String,
}

/// Horizon of the savings chart on the results page.
pub const SAVINGS_PROJECTION_YEARS: u32 = 25;

/// One year of the savings chart. Year 0 is the day of installation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsPoint {
    pub year: u32,
    pub cumulative_savings: f64,
    pub net_position: f64,
}

impl Financial {
    /// Straight-line savings against the up-front cost, years `0..=years`.
    pub fn savings_projection(&self, years: u32) -> Vec<SavingsPoint> {
        (0..=years)
            .map(|year| {
                let cumulative_savings = f64::from(year) * self.annual_savings;
                SavingsPoint {
                    year,
                    cumulative_savings,
                    net_position: cumulative_savings - self.estimated_cost,
                }
            })
            .collect()
    }
}

/// Payload of the results page: the stored analysis plus the series its
/// charts plot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsView {
    #[serde(flatten)]
    pub analysis: SolarAnalysisResult,
    pub cumulative_production: MonthlyProduction,
    pub annual_consumption: f64,
    pub savings: Vec<SavingsPoint>,
    /// First projected year with a non-negative net position, if any.
    pub break_even_year: Option<u32>,
}

impl ResultsView {
    pub fn new(analysis: SolarAnalysisResult, annual_consumption: f64) -> Self {
        let savings = analysis
            .financial
            .savings_projection(SAVINGS_PROJECTION_YEARS);
        let break_even_year = savings
            .iter()
            .find(|point| point.net_position >= 0.0)
            .map(|point| point.year);

        Self {
            cumulative_production: analysis.production.cumulative(),
            analysis,
            annual_consumption,
            savings,
            break_even_year,
        }
    }
}
