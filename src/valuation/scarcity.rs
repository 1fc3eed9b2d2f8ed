// Positional scarcity: remaining supply in value tiers, severity-derived
// premiums, and tier-cliff alerts.
//
// Supply is always measured against the undrafted pool; drafted players
// count toward totals but never toward remaining tiers.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{LeagueFormat, ScarcitySettings};
use crate::player::{Player, Position, SCORING_POSITIONS};

// ---------------------------------------------------------------------------
// Severity levels
// ---------------------------------------------------------------------------

/// How depleted a position's quality supply is relative to league demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScarcitySeverity {
    /// Quality supply comfortably exceeds demand.
    None,
    /// Supply still covers every starting slot, with little slack.
    Low,
    /// Not enough quality players left for every starting slot.
    Medium,
    /// Elite tier exhausted and the starter tier is thinning fast.
    High,
    /// Both quality tiers empty: replacement level from here on.
    Critical,
}

impl ScarcitySeverity {
    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ScarcitySeverity::None => "NONE",
            ScarcitySeverity::Low => "LOW",
            ScarcitySeverity::Medium => "MEDIUM",
            ScarcitySeverity::High => "HIGH",
            ScarcitySeverity::Critical => "CRITICAL",
        }
    }
}

// ---------------------------------------------------------------------------
// Supply snapshot
// ---------------------------------------------------------------------------

/// Scarcity analysis for a single position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositionSupply {
    pub position: Position,
    /// All pool players at this position, drafted or not.
    pub total: usize,
    pub drafted: usize,
    pub remaining: usize,
    /// Undrafted players at or above the tier-1 (elite) threshold.
    pub tier1_remaining: usize,
    /// Undrafted players in the tier-2 (starter) band.
    pub tier2_remaining: usize,
    pub severity: ScarcitySeverity,
    /// Value bonus applied to undrafted players at this position.
    pub premium: f64,
}

// ---------------------------------------------------------------------------
// Drop-off alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Warning,
    Critical,
}

/// A looming value cliff at a position: the elite tier is nearly gone and
/// the next band is markedly worse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DropOffAlert {
    pub position: Position,
    pub severity: AlertSeverity,
    /// Mean VOR of the remaining elite-tier players.
    pub tier_avg: f64,
    /// Mean VOR of the next non-empty band below.
    pub next_tier_avg: f64,
    pub drop: f64,
    /// Elite-tier players left before the cliff hits.
    pub picks_until_cliff: usize,
}

// ---------------------------------------------------------------------------
// Severity classification
// ---------------------------------------------------------------------------

/// Classify supply against demand.
///
/// `expected` is the league-wide dedicated starter count for the
/// position; `tier1`/`tier2` are undrafted counts in each quality band.
fn severity_for(tier1: usize, tier2: usize, expected: usize) -> ScarcitySeverity {
    let quality = tier1 + tier2;
    if tier1 == 0 && tier2 == 0 {
        ScarcitySeverity::Critical
    } else if tier1 == 0 && (tier2 as f64) <= expected as f64 / 2.0 {
        ScarcitySeverity::High
    } else if quality as f64 > expected as f64 * 1.5 {
        ScarcitySeverity::None
    } else if quality > expected {
        ScarcitySeverity::Low
    } else {
        ScarcitySeverity::Medium
    }
}

fn multiplier_for(severity: ScarcitySeverity, settings: &ScarcitySettings) -> f64 {
    let m = &settings.multipliers;
    match severity {
        ScarcitySeverity::None => m.none,
        ScarcitySeverity::Low => m.low,
        ScarcitySeverity::Medium => m.medium,
        ScarcitySeverity::High => m.high,
        ScarcitySeverity::Critical => m.critical,
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute the supply snapshot and scarcity premium for every scoring
/// position.
///
/// For each position:
/// 1. Count total, drafted, and remaining players.
/// 2. Bucket the remaining players into the configured value tiers.
/// 3. Classify severity against expected starter demand.
/// 4. Premium = severity multiplier x position demand weight.
pub fn compute_scarcity_premiums(
    players: &[Player],
    drafted: &HashSet<String>,
    format: &LeagueFormat,
    settings: &ScarcitySettings,
) -> Vec<PositionSupply> {
    let mut supplies = Vec::with_capacity(SCORING_POSITIONS.len());

    for &pos in SCORING_POSITIONS {
        let at_pos: Vec<&Player> = players.iter().filter(|p| p.pos == pos).collect();
        let total = at_pos.len();
        let undrafted: Vec<&Player> = at_pos
            .iter()
            .copied()
            .filter(|p| !drafted.contains(&p.key))
            .collect();
        let remaining = undrafted.len();
        let drafted_count = total - remaining;

        let tier1_remaining = undrafted
            .iter()
            .filter(|p| p.vor >= settings.tier1_threshold)
            .count();
        let tier2_remaining = undrafted
            .iter()
            .filter(|p| p.vor >= settings.tier2_threshold && p.vor < settings.tier1_threshold)
            .count();

        let expected = format.expected_starters(pos);
        let severity = severity_for(tier1_remaining, tier2_remaining, expected);
        let premium = multiplier_for(severity, settings) * settings.position_weights.get(pos);

        supplies.push(PositionSupply {
            position: pos,
            total,
            drafted: drafted_count,
            remaining,
            tier1_remaining,
            tier2_remaining,
            severity,
            premium,
        });
    }

    supplies
}

/// Look up the supply snapshot for a given position.
pub fn supply_for_position(
    supplies: &[PositionSupply],
    position: Position,
) -> Option<&PositionSupply> {
    supplies.iter().find(|s| s.position == position)
}

/// Add the positional premium to a value. An unmatched position or a
/// zero premium passes the value through unchanged.
pub fn apply_premium(value: f64, position: Position, supplies: &[PositionSupply]) -> f64 {
    match supply_for_position(supplies, position) {
        Some(supply) if supply.premium > 0.0 => value + supply.premium,
        _ => value,
    }
}

// ---------------------------------------------------------------------------
// Drop-off detection
// ---------------------------------------------------------------------------

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Detect value cliffs across all scoring positions.
///
/// For each position, compares the mean VOR of remaining elite-tier
/// players against the mean of the next non-empty band (the starter
/// tier, or the depth pool below it). An alert fires when the drop
/// exceeds the configured threshold; it is critical when three or fewer
/// elite picks remain.
pub fn detect_drop_offs(
    players: &[Player],
    drafted: &HashSet<String>,
    settings: &ScarcitySettings,
) -> Vec<DropOffAlert> {
    let mut alerts = Vec::new();

    for &pos in SCORING_POSITIONS {
        let undrafted: Vec<&Player> = players
            .iter()
            .filter(|p| p.pos == pos && !drafted.contains(&p.key))
            .collect();

        let tier1: Vec<f64> = undrafted
            .iter()
            .filter(|p| p.vor >= settings.tier1_threshold)
            .map(|p| p.vor)
            .collect();
        if tier1.is_empty() {
            continue;
        }

        let tier2: Vec<f64> = undrafted
            .iter()
            .filter(|p| p.vor >= settings.tier2_threshold && p.vor < settings.tier1_threshold)
            .map(|p| p.vor)
            .collect();
        let depth: Vec<f64> = undrafted
            .iter()
            .filter(|p| p.vor < settings.tier2_threshold)
            .map(|p| p.vor)
            .collect();

        let next = if !tier2.is_empty() {
            &tier2
        } else if !depth.is_empty() {
            &depth
        } else {
            // Nothing below the elite tier: no cliff to measure.
            continue;
        };

        let tier_avg = mean(&tier1);
        let next_tier_avg = mean(next);
        let drop = tier_avg - next_tier_avg;
        if drop <= settings.dropoff_threshold {
            continue;
        }

        let severity = if tier1.len() <= settings.cliff_critical_picks {
            AlertSeverity::Critical
        } else {
            AlertSeverity::Warning
        };

        alerts.push(DropOffAlert {
            position: pos,
            severity,
            tier_avg,
            next_tier_avg,
            drop,
            picks_until_cliff: tier1.len(),
        });
    }

    alerts
}

/// Look up the drop-off alert for a given position.
pub fn alert_for_position(
    alerts: &[DropOffAlert],
    position: Position,
) -> Option<&DropOffAlert> {
    alerts.iter().find(|a| a.position == position)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
