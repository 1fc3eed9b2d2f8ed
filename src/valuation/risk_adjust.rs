// Risk-tolerance dial: discounts base value by injury and inconsistency.

use serde::{Deserialize, Serialize};

use crate::config::RiskSettings;
use crate::valuation::risk::RiskProfile;

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Risk-adjusted value with a per-factor breakdown.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskAdjustedVor {
    pub base_vor: f64,
    /// Final adjusted value, rounded to the nearest point.
    pub adjusted_vor: f64,
    /// Signed change attributable to injury risk alone.
    pub risk_adjustment: f64,
    /// Signed change attributable to inconsistency, on top of the
    /// injury-discounted value.
    pub consistency_adjustment: f64,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Apply the risk-tolerance dial to a base value.
///
/// `sensitivity = 1 - risk_tolerance`: a fully aggressive drafter
/// (tolerance 1) ignores risk entirely, a fully conservative one
/// (tolerance 0) takes the whole discount.
///
/// - `injury_factor = 1 - (injury_score/100) * sensitivity`
/// - `consistency_factor = consistency_score ^ sensitivity`
/// - `adjusted = round(base * injury_factor * consistency_factor)`
///
/// When the combined factor is exactly 1 (zero sensitivity, or a
/// zero-injury perfectly-consistent player) the base value passes
/// through unrounded, so a no-op adjustment is exact.
pub fn compute_risk_adjusted_vor(
    base_vor: f64,
    profile: &RiskProfile,
    settings: &RiskSettings,
) -> RiskAdjustedVor {
    let sensitivity = (1.0 - settings.risk_tolerance).clamp(0.0, 1.0);

    let injury_factor = 1.0 - (profile.injury_score / 100.0) * sensitivity;
    let consistency_factor = profile.consistency_score.powf(sensitivity);

    if injury_factor * consistency_factor == 1.0 {
        return RiskAdjustedVor {
            base_vor,
            adjusted_vor: base_vor,
            risk_adjustment: 0.0,
            consistency_adjustment: 0.0,
        };
    }

    let after_injury = base_vor * injury_factor;
    let adjusted = (after_injury * consistency_factor).round();

    RiskAdjustedVor {
        base_vor,
        adjusted_vor: adjusted,
        risk_adjustment: after_injury - base_vor,
        consistency_adjustment: adjusted - after_injury,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
