//! Synthetic solar reports. Nothing here performs a real irradiance
//! computation; every figure is derived from fixed formulas.

mod agent;
mod generator;

pub use agent::{
    AgentInputs, AgentRecommendations, AgentReport, AgentVisuals, MonthlyYield,
    REFERENCE_CONSUMPTION_KWH, solar_agent_report,
};
pub use generator::{
    BASE_SYSTEM_SIZE_KWP, CO2_KG_PER_KWH, COST_PER_KWP, MONTHLY_WEIGHTS, PAYBACK_YEARS,
    REFERENCE_LATITUDE, SAVINGS_PER_KWH, YIELD_KWH_PER_KWP, generate_analysis,
    monthly_production, system_size_for_latitude,
};
