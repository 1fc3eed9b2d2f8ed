// Valuation engine: risk profiles, schedule strength, scarcity premiums,
// enhanced-value ranking, and draft recommendations.

pub mod enhanced;
pub mod recommend;
pub mod risk;
pub mod risk_adjust;
pub mod scarcity;
pub mod schedule;
