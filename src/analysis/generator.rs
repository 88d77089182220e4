use time::OffsetDateTime;

use crate::models::{
    Financial, Location, MonthlyProduction, PersonalInfo, Production, QuoteAnalysisEntry, QuoteId,
    Recommendations, SolarAnalysisResult, Visualizations,
};

pub const REFERENCE_LATITUDE: f64 = 45.0;
pub const BASE_SYSTEM_SIZE_KWP: f64 = 3.0;
pub const YIELD_KWH_PER_KWP: f64 = 1100.0;
pub const CO2_KG_PER_KWH: f64 = 0.4;
pub const COST_PER_KWP: f64 = 1500.0;
pub const SAVINGS_PER_KWH: f64 = 0.25;

/// Fixed, not derived from cost and savings.
pub const PAYBACK_YEARS: f64 = 8.0;

/// Northern-hemisphere seasonal curve, January first. The raw table adds up to
/// 1.01, so shares are taken relative to its sum.
pub const MONTHLY_WEIGHTS: [f64; 12] = [
    0.05, 0.06, 0.08, 0.10, 0.12, 0.13, 0.13, 0.12, 0.09, 0.06, 0.04, 0.03,
];

const PLACEHOLDER_CHART: &str = "/placeholder.svg?height=300&width=500";

pub fn system_size_for_latitude(latitude: f64) -> f64 {
    BASE_SYSTEM_SIZE_KWP + (latitude - REFERENCE_LATITUDE).abs() / 10.0
}

pub fn monthly_production(annual: f64) -> MonthlyProduction {
    let total_weight: f64 = MONTHLY_WEIGHTS.iter().sum();

    MONTHLY_WEIGHTS
        .iter()
        .enumerate()
        .map(|(index, weight)| ((index + 1) as u8, annual * weight / total_weight))
        .collect()
}

/// Builds the mock report for a quote. `personal_info` is accepted for parity
/// with a real analysis backend but does not influence any figure.
pub fn generate_analysis(
    quote_id: &QuoteId,
    address: &str,
    location: Location,
    _personal_info: &PersonalInfo,
) -> SolarAnalysisResult {
    let system_size = system_size_for_latitude(location.latitude);
    let annual = system_size * YIELD_KWH_PER_KWP;

    SolarAnalysisResult {
        quote_id: quote_id.clone(),
        timestamp: OffsetDateTime::now_utc(),
        system_size,
        production: Production {
            annual,
            monthly: monthly_production(annual),
        },
        co2_reduction: annual * CO2_KG_PER_KWH,
        recommendations: Recommendations {
            general: vec![
                format!(
                    "Based on your location at {address}, a {system_size:.1}kWp system would be optimal for your needs."
                ),
                "South-facing installation would maximize your energy production.".to_string(),
                format!("Estimated annual production: {} kWh.", annual.round() as i64),
                "Consider adding battery storage to increase self-consumption.".to_string(),
            ],
            technical: vec![
                "Use high-efficiency monocrystalline panels for better performance.".to_string(),
                "Install a smart energy monitoring system to track production and consumption."
                    .to_string(),
                "Consider microinverters for better performance in partial shading conditions."
                    .to_string(),
            ],
        },
        financial: Financial {
            estimated_cost: system_size * COST_PER_KWP,
            annual_savings: annual * SAVINGS_PER_KWH,
            payback_period: PAYBACK_YEARS,
        },
        quote_analysis: vec![QuoteAnalysisEntry {
            components: "The quote includes 10 premium monocrystalline panels (400W each) and a SolarEdge inverter with optimizers.".to_string(),
            price_assessment: "The price is competitive at 1.45€/Wp, which is below the market average of 1.60€/Wp.".to_string(),
            guarantees: "25-year performance warranty on panels, 12-year product warranty, 10-year inverter warranty.".to_string(),
            missing_elements: "No monitoring system included. Consider requesting this addition for better system oversight.".to_string(),
        }],
        visualizations: Visualizations {
            production_chart: PLACEHOLDER_CHART.to_string(),
            cumulative_production: PLACEHOLDER_CHART.to_string(),
            production_vs_consumption: PLACEHOLDER_CHART.to_string(),
        },
    }
}
