// Enhanced value aggregation: folds risk, schedule, and scarcity
// adjustments into each player's base VOR, then ranks the undrafted pool.
//
// Fully recomputed from the snapshot on every call; nothing is cached or
// mutated in place, and identical inputs produce bit-identical output.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::config::{LeagueFormat, RiskSettings, ScarcitySettings, ScheduleSettings};
use crate::player::{Player, Position};
use crate::valuation::risk::build_risk_profile;
use crate::valuation::risk_adjust::compute_risk_adjusted_vor;
use crate::valuation::scarcity::{compute_scarcity_premiums, supply_for_position};
use crate::valuation::schedule::{schedule_adjustment_for, TeamSchedules};

// ---------------------------------------------------------------------------
// Enhanced VOR record
// ---------------------------------------------------------------------------

/// Per-player valuation output for one aggregation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedVor {
    pub key: String,
    pub name: String,
    pub pos: Position,
    pub base_vor: f64,
    pub projected_points: f64,
    /// Signed value change from the risk model. Zero when the player
    /// carries no risk data.
    pub risk_adjustment: f64,
    pub schedule_adjustment: f64,
    pub scarcity_premium: f64,
    /// `base_vor + risk + schedule + scarcity`.
    pub enhanced_vor: f64,
    /// 1-based dense rank by enhanced value, descending.
    pub overall_rank: u32,
    /// 1-based dense rank within the player's position group.
    pub position_rank: u32,
    /// ADP-implied rank minus enhanced-value rank. Positive = the market
    /// undervalues the player; zero when no ADP data exists.
    pub adp_diff: f64,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute enhanced VOR for every undrafted player and rank the result.
///
/// Pipeline per player:
/// 1. Risk adjustment via the risk profile and tolerance dial, applied
///    only when the player carries risk data.
/// 2. Schedule adjustment from the team schedule book (neutral when the
///    team has no entry).
/// 3. Scarcity premium for the player's position.
/// 4. Sum into enhanced value; sort descending (ties broken by key so
///    output is deterministic); assign dense overall and positional
///    ranks and the ADP differential.
pub fn compute_enhanced_vors(
    players: &[Player],
    drafted: &HashSet<String>,
    schedules: &TeamSchedules,
    format: &LeagueFormat,
    risk_settings: &RiskSettings,
    schedule_settings: &ScheduleSettings,
    scarcity_settings: &ScarcitySettings,
) -> Vec<EnhancedVor> {
    let supplies = compute_scarcity_premiums(players, drafted, format, scarcity_settings);

    let mut records: Vec<EnhancedVor> = players
        .iter()
        .filter(|p| !drafted.contains(&p.key))
        .map(|player| {
            let risk_adjustment = if player.risk.is_some() {
                let profile = build_risk_profile(player, risk_settings);
                let adjusted =
                    compute_risk_adjusted_vor(player.vor, &profile, risk_settings);
                adjusted.adjusted_vor - player.vor
            } else {
                0.0
            };

            let schedule_adjustment = schedule_adjustment_for(
                player.pos,
                &player.team,
                player.bye,
                schedules,
                schedule_settings,
            );

            let scarcity_premium = supply_for_position(&supplies, player.pos)
                .map(|s| s.premium)
                .unwrap_or(0.0);

            let enhanced_vor =
                player.vor + risk_adjustment + schedule_adjustment + scarcity_premium;

            EnhancedVor {
                key: player.key.clone(),
                name: player.name.clone(),
                pos: player.pos,
                base_vor: player.vor,
                projected_points: player.projected_points,
                risk_adjustment,
                schedule_adjustment,
                scarcity_premium,
                enhanced_vor,
                overall_rank: 0,
                position_rank: 0,
                adp_diff: 0.0,
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.enhanced_vor
            .partial_cmp(&a.enhanced_vor)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });

    assign_ranks(&mut records);
    assign_adp_diffs(players, drafted, &mut records);

    debug!("enhanced VOR pass complete: {} ranked players", records.len());
    records
}

/// Assign dense overall and per-position ranks. `records` must already
/// be sorted descending by enhanced value.
fn assign_ranks(records: &mut [EnhancedVor]) {
    let mut overall_rank: u32 = 0;
    let mut last_value: Option<f64> = None;
    let mut position_state: HashMap<Position, (f64, u32)> = HashMap::new();

    for record in records.iter_mut() {
        if last_value != Some(record.enhanced_vor) {
            overall_rank += 1;
            last_value = Some(record.enhanced_vor);
        }
        record.overall_rank = overall_rank;

        let entry = position_state
            .entry(record.pos)
            .or_insert((f64::NAN, 0));
        if entry.0 != record.enhanced_vor {
            entry.1 += 1;
            entry.0 = record.enhanced_vor;
        }
        record.position_rank = entry.1;
    }
}

/// Assign ADP differentials: dense rank by standard ADP ascending within
/// the same undrafted set, minus the enhanced-value rank. Players with
/// no ADP figure keep a neutral 0.
fn assign_adp_diffs(
    players: &[Player],
    drafted: &HashSet<String>,
    records: &mut [EnhancedVor],
) {
    let mut by_adp: Vec<(&str, f64)> = players
        .iter()
        .filter(|p| !drafted.contains(&p.key) && p.adp_std > 0.0)
        .map(|p| (p.key.as_str(), p.adp_std))
        .collect();
    by_adp.sort_by(|a, b| {
        a.1.partial_cmp(&b.1)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.0.cmp(b.0))
    });

    let mut adp_ranks: HashMap<&str, u32> = HashMap::with_capacity(by_adp.len());
    let mut rank: u32 = 0;
    let mut last_adp: Option<f64> = None;
    for (key, adp) in by_adp {
        if last_adp != Some(adp) {
            rank += 1;
            last_adp = Some(adp);
        }
        adp_ranks.insert(key, rank);
    }

    for record in records.iter_mut() {
        record.adp_diff = match adp_ranks.get(record.key.as_str()) {
            Some(&adp_rank) => adp_rank as f64 - record.overall_rank as f64,
            None => 0.0,
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
