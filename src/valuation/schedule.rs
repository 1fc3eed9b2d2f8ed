// Schedule strength: per-week matchup ratings folded into a bounded
// season-level value adjustment and a normalized SOS figure.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::config::ScheduleSettings;
use crate::player::Position;

// ---------------------------------------------------------------------------
// Schedule data
// ---------------------------------------------------------------------------

/// Opponent defensive ranks for one game, each 1 (best unit in the
/// league) through 32 (worst).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DefenseRanks {
    pub overall: u32,
    pub rush_defense: u32,
    pub pass_rush: u32,
    pub secondary: u32,
}

/// One week on a team's schedule. `None` opponent = bye.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeekOpponent {
    pub week: u32,
    pub opponent: Option<DefenseRanks>,
}

/// One week of a position-rated schedule. `None` rating = bye.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WeekMatchup {
    pub week: u32,
    pub rating: Option<u8>,
}

/// Season schedules keyed by team abbreviation, supplied by the caller
/// as part of the evaluation snapshot.
pub type TeamSchedules = HashMap<String, Vec<WeekOpponent>>;

// ---------------------------------------------------------------------------
// Matchup rating
// ---------------------------------------------------------------------------

/// Scale factor mapping the weighted mean rating deviation onto the
/// schedule-score range: ratings deviate at most +/-2 from neutral, and
/// the score contract is +/-15, so 15/2 = 7.5. Re-derive if either
/// bound changes.
const SCORE_SCALE: f64 = 7.5;

/// Neutral matchup rating; deviations are measured against this.
const NEUTRAL_RATING: f64 = 3.0;

/// Rate one matchup from 1 (hardest) to 5 (easiest) for a position.
///
/// The relevant defensive unit depends on who is attacking it: RBs run
/// into the rush defense, WRs and TEs into the secondary, QBs into a
/// blend of pass rush and coverage, Ks against the overall unit. A DST
/// faces the opposing *offense*, so the overall rank inverts: a
/// bottom-ranked opponent is the easiest possible matchup.
pub fn matchup_rating(pos: Position, ranks: &DefenseRanks) -> u8 {
    let effective = match pos {
        Position::Rb => ranks.rush_defense as f64,
        Position::Wr | Position::Te => ranks.secondary as f64,
        Position::Qb => (ranks.pass_rush + ranks.secondary) as f64 / 2.0,
        Position::Dst => 33.0 - ranks.overall as f64,
        _ => ranks.overall as f64,
    };
    rating_from_rank(effective)
}

/// Bucket a defensive rank into a 1-5 matchup rating.
fn rating_from_rank(rank: f64) -> u8 {
    if rank <= 6.0 {
        1
    } else if rank <= 12.0 {
        2
    } else if rank <= 19.0 {
        3
    } else if rank <= 26.0 {
        4
    } else {
        5
    }
}

/// Rate a full season schedule for one position. Byes stay byes.
pub fn rate_schedule(pos: Position, schedule: &[WeekOpponent]) -> Vec<WeekMatchup> {
    schedule
        .iter()
        .map(|w| WeekMatchup {
            week: w.week,
            rating: w.opponent.as_ref().map(|ranks| matchup_rating(pos, ranks)),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Season scores
// ---------------------------------------------------------------------------

/// Season schedule score in [-15, +15].
///
/// Weighted mean of `(rating - 3)` over ratable weeks (bye entries and
/// the player's own bye week are skipped), scaled by `SCORE_SCALE`, then
/// shifted by the bye-week adjustment and clamped. With no ratable
/// weeks only the bye adjustment remains.
pub fn compute_schedule_score(
    matchups: &[WeekMatchup],
    bye_week: u32,
    settings: &ScheduleSettings,
) -> f64 {
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;

    for m in matchups {
        if m.week == bye_week {
            continue;
        }
        let Some(rating) = m.rating else {
            continue;
        };
        let weight = settings.week_weight(m.week);
        weighted_sum += (rating as f64 - NEUTRAL_RATING) * weight;
        total_weight += weight;
    }

    let base = if total_weight > 0.0 {
        weighted_sum / total_weight * SCORE_SCALE
    } else {
        0.0
    };

    (base + settings.bye.adjustment(bye_week)).clamp(-15.0, 15.0)
}

/// Normalized strength of schedule in [0, 1]: 0 = hardest possible
/// slate, 1 = easiest. An all-bye (or empty) schedule is neutral 0.5.
pub fn compute_sos(matchups: &[WeekMatchup]) -> f64 {
    let ratings: Vec<f64> = matchups
        .iter()
        .filter_map(|m| m.rating.map(|r| r as f64))
        .collect();
    if ratings.is_empty() {
        return 0.5;
    }
    let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
    ((avg - 1.0) / 4.0).clamp(0.0, 1.0)
}

/// Strength of schedule restricted to the fantasy-playoff weeks, on the
/// same scale as [`compute_sos`]. Championships are won in weeks 14-17;
/// a soft full-season slate with a brutal playoff stretch is a trap.
/// No ratable playoff weeks -> neutral 0.5.
pub fn compute_playoff_sos(matchups: &[WeekMatchup], settings: &ScheduleSettings) -> f64 {
    let ratings: Vec<f64> = matchups
        .iter()
        .filter(|m| m.week >= settings.playoff_week_start)
        .filter_map(|m| m.rating.map(|r| r as f64))
        .collect();
    if ratings.is_empty() {
        return 0.5;
    }
    let avg = ratings.iter().sum::<f64>() / ratings.len() as f64;
    ((avg - 1.0) / 4.0).clamp(0.0, 1.0)
}

/// Schedule adjustment for one player from the team schedule book.
/// Missing team entry degrades to a neutral 0.
pub fn schedule_adjustment_for(
    pos: Position,
    team: &str,
    bye_week: u32,
    schedules: &TeamSchedules,
    settings: &ScheduleSettings,
) -> f64 {
    match schedules.get(team) {
        Some(schedule) => {
            let rated = rate_schedule(pos, schedule);
            compute_schedule_score(&rated, bye_week, settings)
        }
        None => {
            debug!("no schedule entry for '{team}', neutral adjustment");
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
