// Injury risk scoring, weekly consistency, and risk profile assembly.
//
// All math here is pure and total: missing inputs produce documented
// moderate defaults, and every output is clamped to its contract range.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RiskSettings;
use crate::player::{Player, Position, RiskData};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Recency weights for the three-season attendance history, most recent
/// season first.
const RECENCY_WEIGHTS: [f64; 3] = [0.5, 0.3, 0.2];

/// Injury risk accrued per year past the positional age threshold.
const AGE_RISK_PER_YEAR: f64 = 0.15;

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Moderate defaults used when a player carries no risk data at all.
pub const DEFAULT_INJURY_SCORE: f64 = 50.0;
pub const DEFAULT_CONSISTENCY: f64 = 0.7;
pub const DEFAULT_WEEKLY_VARIANCE: f64 = 0.3;

// ---------------------------------------------------------------------------
// Risk profile
// ---------------------------------------------------------------------------

/// Derived risk assessment for one player, recomputed per evaluation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Injury risk, 0 (durable) to 100 (walking infirmary).
    pub injury_score: f64,
    /// Week-to-week consistency, 0 (boom/bust) to 1 (metronome).
    pub consistency_score: f64,
    /// Season-total downside estimate. Always <= ceiling.
    pub floor: f64,
    /// Season-total upside estimate.
    pub ceiling: f64,
    /// Coefficient of variation of the weekly series.
    pub weekly_variance: f64,
}

// ---------------------------------------------------------------------------
// Series statistics
// ---------------------------------------------------------------------------

/// Mean and population standard deviation of a series.
///
/// Returns `(0.0, 0.0)` for an empty slice. Population (N denominator)
/// because the series is the full observed history, not a sample.
fn series_stats(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

/// Percentile by linear interpolation between order statistics.
///
/// `sorted` must be ascending; `p` in [0, 1].
fn percentile(sorted: &[f64], p: f64) -> f64 {
    match sorted.len() {
        0 => 0.0,
        1 => sorted[0],
        n => {
            let idx = p.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = idx.floor() as usize;
            let hi = idx.ceil() as usize;
            if lo == hi {
                sorted[lo]
            } else {
                sorted[lo] + (idx - lo as f64) * (sorted[hi] - sorted[lo])
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Injury score
// ---------------------------------------------------------------------------

/// Share of recent seasons missed, recency-weighted.
///
/// Each season's attendance ratio is clamped to [0, 1] before weighting
/// (a 17-game ironman in an old 16-game season must not produce negative
/// missed time), and the blended rate is clamped again on the way out.
pub fn historical_injury_rate(games_played: &[u16; 3], season_length: u32) -> f64 {
    if season_length == 0 {
        return 0.0;
    }
    let len = season_length as f64;
    let attended: f64 = games_played
        .iter()
        .zip(RECENCY_WEIGHTS)
        .map(|(&games, weight)| (games as f64 / len).clamp(0.0, 1.0) * weight)
        .sum();
    (1.0 - attended).clamp(0.0, 1.0)
}

/// Injury risk score in [0, 100].
///
/// Blends four 0-1 factors with the configured category weights:
/// attendance history, age past the positional decline threshold, the
/// position's baseline proneness, and the current injury designation.
pub fn injury_score(risk: &RiskData, pos: Position, settings: &RiskSettings) -> f64 {
    let historical = historical_injury_rate(&risk.games_played, settings.season_length);

    let age_factor = match risk.age {
        Some(age) => {
            let threshold = settings.age_thresholds.get(pos);
            let years_over = age as f64 - threshold;
            if years_over > 0.0 {
                (years_over * AGE_RISK_PER_YEAR).min(1.0)
            } else {
                0.0
            }
        }
        None => 0.0,
    };

    let position_factor = settings.position_risk.get(pos);
    let status_factor = risk.status.risk_factor();

    let w = &settings.weights;
    let blended = historical * w.historical
        + age_factor * w.age
        + position_factor * w.position
        + status_factor * w.status;

    (blended * 100.0).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Consistency and range
// ---------------------------------------------------------------------------

/// Week-to-week consistency in [0, 1]: `1 - stddev/mean`.
///
/// Empty series -> 0 (nothing is known), single sample -> 1 (no observed
/// variation), non-positive mean -> 0 (guards the division).
pub fn consistency_score(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    if series.len() == 1 {
        return 1.0;
    }
    let (mean, stddev) = series_stats(series);
    if mean <= 0.0 {
        return 0.0;
    }
    (1.0 - stddev / mean).clamp(0.0, 1.0)
}

/// Floor, ceiling, and weekly variance from a weekly scoring series.
///
/// Floor and ceiling are the 10th and 90th percentiles of the weekly
/// series, rescaled by `projection / mean` into season-total units.
/// Weekly variance is the series' coefficient of variation.
///
/// Degenerate inputs (fewer than two samples, zero spread, or a
/// non-positive mean or projection) collapse to
/// `(projection, projection, 0.0)`.
pub fn floor_ceiling_variance(series: &[f64], projection: f64) -> (f64, f64, f64) {
    if series.len() < 2 {
        return (projection, projection, 0.0);
    }
    let (mean, stddev) = series_stats(series);
    if stddev < STDEV_EPSILON || mean <= 0.0 || projection <= 0.0 {
        return (projection, projection, 0.0);
    }

    let mut sorted = series.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let scale = projection / mean;
    let floor = percentile(&sorted, 0.10) * scale;
    let ceiling = percentile(&sorted, 0.90) * scale;
    (floor, ceiling, stddev / mean)
}

// ---------------------------------------------------------------------------
// Profile builder
// ---------------------------------------------------------------------------

/// Assemble the full risk profile for a player.
///
/// Data availability tiers:
/// - no risk block at all -> moderate defaults across the board;
/// - risk block without a weekly series -> injury score computed,
///   consistency/range defaulted;
/// - full data -> everything computed.
pub fn build_risk_profile(player: &Player, settings: &RiskSettings) -> RiskProfile {
    let projection = player.projected_points;

    let Some(risk) = &player.risk else {
        debug!("no risk data for '{}', using moderate defaults", player.key);
        return RiskProfile {
            injury_score: DEFAULT_INJURY_SCORE,
            consistency_score: DEFAULT_CONSISTENCY,
            floor: projection,
            ceiling: projection,
            weekly_variance: DEFAULT_WEEKLY_VARIANCE,
        };
    };

    let injury = injury_score(risk, player.pos, settings);

    match &risk.weekly_points {
        Some(series) => {
            let consistency = consistency_score(series);
            let (floor, ceiling, weekly_variance) =
                floor_ceiling_variance(series, projection);
            RiskProfile {
                injury_score: injury,
                consistency_score: consistency,
                floor,
                ceiling,
                weekly_variance,
            }
        }
        None => RiskProfile {
            injury_score: injury,
            consistency_score: DEFAULT_CONSISTENCY,
            floor: projection,
            ceiling: projection,
            weekly_variance: DEFAULT_WEEKLY_VARIANCE,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
