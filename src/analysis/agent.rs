use serde::Serialize;

/// Fixed sizing used by the analysis agent endpoint.
pub const AGENT_PEAK_POWER_KWC: f64 = 5.0;
pub const AGENT_SYSTEM_LOSS_PERCENT: f64 = 14.0;
pub const AGENT_YIELD_KWH_PER_KWC: f64 = 950.0;
/// Household consumption the production figures are compared against.
pub const REFERENCE_CONSUMPTION_KWH: f64 = 3500.0;

const PLACEHOLDER_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAA...";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentInputs {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub peak_power_kwc: f64,
    pub system_loss_percent: f64,
    pub document_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyYield {
    pub month: u8,
    pub energy_kwh: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentVisuals {
    pub monthly_production: String,
    pub cumulative_production: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentRecommendations {
    pub general: String,
    pub orientation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentReport {
    pub inputs: AgentInputs,
    pub monthly: Vec<MonthlyYield>,
    pub annual_production: f64,
    pub annual_consumption: f64,
    pub coverage_percent: i64,
    pub visuals: AgentVisuals,
    pub recommendations: AgentRecommendations,
}

/// Triangular monthly curve: 100 kWh in January rising by 30 kWh a month to
/// June, then falling back symmetrically.
fn monthly_yield(index: u8) -> f64 {
    let steps = if index < 6 { index } else { 11 - index };
    100.0 + f64::from(steps) * 30.0
}

pub fn solar_agent_report(
    address: &str,
    latitude: f64,
    longitude: f64,
    document_count: usize,
) -> AgentReport {
    let annual_production = AGENT_PEAK_POWER_KWC * AGENT_YIELD_KWH_PER_KWC;
    let coverage_percent = (annual_production / REFERENCE_CONSUMPTION_KWH * 100.0).round() as i64;

    AgentReport {
        inputs: AgentInputs {
            address: address.to_string(),
            latitude,
            longitude,
            peak_power_kwc: AGENT_PEAK_POWER_KWC,
            system_loss_percent: AGENT_SYSTEM_LOSS_PERCENT,
            document_count,
        },
        monthly: (0..12u8)
            .map(|index| MonthlyYield {
                month: index + 1,
                energy_kwh: monthly_yield(index),
            })
            .collect(),
        annual_production,
        annual_consumption: REFERENCE_CONSUMPTION_KWH,
        coverage_percent,
        visuals: AgentVisuals {
            monthly_production: PLACEHOLDER_PNG.to_string(),
            cumulative_production: PLACEHOLDER_PNG.to_string(),
        },
        recommendations: AgentRecommendations {
            general: format!(
                "Based on the analysis, a solar installation of {AGENT_PEAK_POWER_KWC} kWc would produce approximately {annual_production} kWh per year. This would cover about {coverage_percent}% of your annual consumption."
            ),
            orientation:
                "The solar panels should be installed facing south for optimal production."
                    .to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_curve() {
        let report = solar_agent_report("1 Main St", 48.85, 2.35, 0);
        let energy: Vec<f64> = report.monthly.iter().map(|m| m.energy_kwh).collect();

        assert_eq!(
            energy,
            vec![
                100.0, 130.0, 160.0, 190.0, 220.0, 250.0, 250.0, 220.0, 190.0, 160.0, 130.0,
                100.0
            ]
        );
        assert_eq!(report.monthly[0].month, 1);
        assert_eq!(report.monthly[11].month, 12);
    }

    #[test]
    fn test_annual_figures() {
        let report = solar_agent_report("1 Main St", 48.85, 2.35, 2);

        assert_eq!(report.annual_production, 4750.0);
        assert_eq!(report.coverage_percent, 136);
        assert_eq!(report.inputs.document_count, 2);
        assert_eq!(
            report.recommendations.general,
            "Based on the analysis, a solar installation of 5 kWc would produce approximately 4750 kWh per year. This would cover about 136% of your annual consumption."
        );
    }

    #[test]
    fn test_report_serialization() {
        let report = solar_agent_report("1 Main St", 48.85, 2.35, 0);
        let json = serde_json::to_value(&report).expect("serialization should succeed");

        assert_eq!(json["inputs"]["peakPowerKwc"], 5.0);
        assert_eq!(json["annualConsumption"], 3500.0);
        assert_eq!(json["monthly"][5]["energyKwh"], 250.0);
    }
}
