// Engine settings: documented defaults, optional TOML overrides, validation.
//
// Every tunable in the valuation pipeline lives here as an explicit,
// immutable settings value that callers construct once and thread through
// call sites. There is no process-wide mutable default state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::player::Position;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("settings file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse settings file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },
}

// ---------------------------------------------------------------------------
// Position-keyed lookup table
// ---------------------------------------------------------------------------

/// A per-position numeric table with an explicit fallback.
///
/// Meta-slots (FLEX, SUPERFLEX, BENCH) and unknown positions resolve to
/// `fallback` rather than failing, so out-of-set input degrades to a
/// documented default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionTable {
    pub qb: f64,
    pub rb: f64,
    pub wr: f64,
    pub te: f64,
    pub k: f64,
    pub dst: f64,
    pub fallback: f64,
}

impl PositionTable {
    pub fn get(&self, pos: Position) -> f64 {
        match pos {
            Position::Qb => self.qb,
            Position::Rb => self.rb,
            Position::Wr => self.wr,
            Position::Te => self.te,
            Position::K => self.k,
            Position::Dst => self.dst,
            _ => self.fallback,
        }
    }
}

// ---------------------------------------------------------------------------
// Risk settings
// ---------------------------------------------------------------------------

/// Category weights for the injury score blend. Must sum to 1.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct InjuryWeights {
    pub historical: f64,
    pub age: f64,
    pub position: f64,
    pub status: f64,
}

impl Default for InjuryWeights {
    fn default() -> Self {
        InjuryWeights {
            historical: 0.5,
            age: 0.15,
            position: 0.2,
            status: 0.15,
        }
    }
}

impl InjuryWeights {
    pub fn sum(&self) -> f64 {
        self.historical + self.age + self.position + self.status
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    /// 0.0 = fully conservative (risk bites hard), 1.0 = fully aggressive
    /// (risk ignored entirely).
    pub risk_tolerance: f64,
    /// Games in a full regular season, for attendance-rate math.
    pub season_length: u32,
    /// Age at which decline risk starts accruing, per position.
    pub age_thresholds: PositionTable,
    /// Baseline injury proneness per position, 0-1 scale.
    pub position_risk: PositionTable,
    pub weights: InjuryWeights,
}

impl Default for RiskSettings {
    fn default() -> Self {
        RiskSettings {
            risk_tolerance: 0.5,
            season_length: 17,
            age_thresholds: PositionTable {
                qb: 35.0,
                rb: 27.0,
                wr: 30.0,
                te: 30.0,
                k: 38.0,
                dst: 99.0,
                fallback: 30.0,
            },
            position_risk: PositionTable {
                qb: 0.2,
                rb: 0.7,
                wr: 0.4,
                te: 0.5,
                k: 0.1,
                dst: 0.1,
                fallback: 0.3,
            },
            weights: InjuryWeights::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Schedule settings
// ---------------------------------------------------------------------------

/// Bye-week value adjustments. A bye landing on a fantasy-playoff week is
/// a real cost; an early-season bye is mildly convenient.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ByeAdjustments {
    pub late_critical_week: u32,
    pub late_critical_penalty: f64,
    pub late_week: u32,
    pub late_penalty: f64,
    pub early_start: u32,
    pub early_end: u32,
    pub early_bonus: f64,
}

impl Default for ByeAdjustments {
    fn default() -> Self {
        ByeAdjustments {
            late_critical_week: 14,
            late_critical_penalty: -10.0,
            late_week: 13,
            late_penalty: -5.0,
            early_start: 5,
            early_end: 7,
            early_bonus: 3.0,
        }
    }
}

impl ByeAdjustments {
    /// Value adjustment for a bye falling on the given week.
    pub fn adjustment(&self, week: u32) -> f64 {
        if week == self.late_critical_week {
            self.late_critical_penalty
        } else if week == self.late_week {
            self.late_penalty
        } else if (self.early_start..=self.early_end).contains(&week) {
            self.early_bonus
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSettings {
    /// Last week counted as "early season" (discounted weight).
    pub early_week_end: u32,
    /// First week of the fantasy playoffs (boosted weight).
    pub playoff_week_start: u32,
    pub early_weight: f64,
    pub playoff_weight: f64,
    pub base_weight: f64,
    pub bye: ByeAdjustments,
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        ScheduleSettings {
            early_week_end: 4,
            playoff_week_start: 14,
            early_weight: 0.8,
            playoff_weight: 1.5,
            base_weight: 1.0,
            bye: ByeAdjustments::default(),
        }
    }
}

impl ScheduleSettings {
    /// Weight applied to a week's matchup in the season score.
    pub fn week_weight(&self, week: u32) -> f64 {
        if week <= self.early_week_end {
            self.early_weight
        } else if week >= self.playoff_week_start {
            self.playoff_weight
        } else {
            self.base_weight
        }
    }
}

// ---------------------------------------------------------------------------
// Scarcity settings
// ---------------------------------------------------------------------------

/// Premium multiplier per severity level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SeverityMultipliers {
    pub none: f64,
    pub low: f64,
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for SeverityMultipliers {
    fn default() -> Self {
        SeverityMultipliers {
            none: 0.0,
            low: 1.5,
            medium: 3.0,
            high: 5.0,
            critical: 8.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScarcitySettings {
    /// Minimum VOR for a tier-1 (elite) player.
    pub tier1_threshold: f64,
    /// Minimum VOR for a tier-2 (starter) player.
    pub tier2_threshold: f64,
    pub multipliers: SeverityMultipliers,
    /// Position demand weighting on the premium. RB supply dries up
    /// fastest; K and DST are fungible.
    pub position_weights: PositionTable,
    /// Minimum tier-to-tier value drop that raises a cliff alert.
    pub dropoff_threshold: f64,
    /// A cliff with at most this many quality picks left is critical.
    pub cliff_critical_picks: usize,
}

impl Default for ScarcitySettings {
    fn default() -> Self {
        ScarcitySettings {
            tier1_threshold: 50.0,
            tier2_threshold: 25.0,
            multipliers: SeverityMultipliers::default(),
            position_weights: PositionTable {
                qb: 1.0,
                rb: 1.2,
                wr: 1.0,
                te: 1.0,
                k: 0.3,
                dst: 0.3,
                fallback: 1.0,
            },
            dropoff_threshold: 25.0,
            cliff_critical_picks: 3,
        }
    }
}

// ---------------------------------------------------------------------------
// Recommendation settings
// ---------------------------------------------------------------------------

/// Scarcity-premium thresholds for urgency classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UrgencyThresholds {
    pub must_draft: f64,
    pub high: f64,
    pub medium: f64,
}

impl Default for UrgencyThresholds {
    fn default() -> Self {
        UrgencyThresholds {
            must_draft: 30.0,
            high: 20.0,
            medium: 10.0,
        }
    }
}

/// ADP-differential thresholds for the value-vs-market label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValueThresholds {
    pub steal: f64,
    pub good_value: f64,
    pub fair: f64,
    pub reach: f64,
}

impl Default for ValueThresholds {
    fn default() -> Self {
        ValueThresholds {
            steal: 15.0,
            good_value: 5.0,
            fair: -5.0,
            reach: -15.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationSettings {
    /// Maximum number of recommendations returned.
    pub top_n: usize,
    pub urgency: UrgencyThresholds,
    pub value: ValueThresholds,
}

impl Default for RecommendationSettings {
    fn default() -> Self {
        RecommendationSettings {
            top_n: 5,
            urgency: UrgencyThresholds::default(),
            value: ValueThresholds::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// League format
// ---------------------------------------------------------------------------

/// Roster shape and league size, used to translate positional supply into
/// expected starter demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeagueFormat {
    pub num_teams: usize,
    /// Starting roster slots per team, keyed by position abbreviation
    /// ("QB", "RB", ..., "FLEX", "BENCH").
    pub roster: HashMap<String, usize>,
}

impl Default for LeagueFormat {
    fn default() -> Self {
        let mut roster = HashMap::new();
        roster.insert("QB".into(), 1);
        roster.insert("RB".into(), 2);
        roster.insert("WR".into(), 2);
        roster.insert("TE".into(), 1);
        roster.insert("FLEX".into(), 1);
        roster.insert("K".into(), 1);
        roster.insert("DST".into(), 1);
        roster.insert("BENCH".into(), 6);
        LeagueFormat {
            num_teams: 12,
            roster,
        }
    }
}

impl LeagueFormat {
    /// League-wide count of dedicated starters at a position. FLEX and
    /// bench slots are not attributed to any single position.
    pub fn expected_starters(&self, pos: Position) -> usize {
        self.roster.get(pos.display_str()).copied().unwrap_or(0) * self.num_teams
    }
}

// ---------------------------------------------------------------------------
// Top-level settings and loading
// ---------------------------------------------------------------------------

/// The complete, validated configuration surface of the engine. Every
/// section is optional in the TOML; omitted keys use the documented
/// defaults above.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub league: LeagueFormat,
    pub risk: RiskSettings,
    pub schedule: ScheduleSettings,
    pub scarcity: ScarcitySettings,
    pub recommendation: RecommendationSettings,
}

/// Load settings from a TOML file and validate them.
pub fn load_settings_from(path: &Path) -> Result<EngineSettings, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })?;
    let settings: EngineSettings =
        toml::from_str(&text).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;
    validate(&settings)?;
    Ok(settings)
}

/// Parse settings from a TOML string and validate them. Useful for
/// embedded or test configurations.
pub fn settings_from_toml(text: &str) -> Result<EngineSettings, ConfigError> {
    let settings: EngineSettings =
        toml::from_str(text).map_err(|e| ConfigError::ParseError {
            path: PathBuf::from("<inline>"),
            source: e,
        })?;
    validate(&settings)?;
    Ok(settings)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

pub fn validate(settings: &EngineSettings) -> Result<(), ConfigError> {
    if settings.league.num_teams == 0 {
        return Err(ConfigError::ValidationError {
            field: "league.num_teams".into(),
            message: "must be greater than 0".into(),
        });
    }

    let risk = &settings.risk;
    if !(0.0..=1.0).contains(&risk.risk_tolerance) {
        return Err(ConfigError::ValidationError {
            field: "risk.risk_tolerance".into(),
            message: format!(
                "must be between 0.0 and 1.0 inclusive, got {}",
                risk.risk_tolerance
            ),
        });
    }
    if risk.season_length == 0 {
        return Err(ConfigError::ValidationError {
            field: "risk.season_length".into(),
            message: "must be greater than 0".into(),
        });
    }
    let w = &risk.weights;
    let weight_fields: &[(&str, f64)] = &[
        ("risk.weights.historical", w.historical),
        ("risk.weights.age", w.age),
        ("risk.weights.position", w.position),
        ("risk.weights.status", w.status),
    ];
    for (name, val) in weight_fields {
        if !(0.0..=1.0).contains(val) {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be between 0.0 and 1.0, got {val}"),
            });
        }
    }
    if (w.sum() - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(ConfigError::ValidationError {
            field: "risk.weights".into(),
            message: format!("must sum to 1.0, got {}", w.sum()),
        });
    }

    let sched = &settings.schedule;
    let sched_weights: &[(&str, f64)] = &[
        ("schedule.early_weight", sched.early_weight),
        ("schedule.playoff_weight", sched.playoff_weight),
        ("schedule.base_weight", sched.base_weight),
    ];
    for (name, val) in sched_weights {
        if *val <= 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be > 0, got {val}"),
            });
        }
    }
    if sched.early_week_end >= sched.playoff_week_start {
        return Err(ConfigError::ValidationError {
            field: "schedule.early_week_end".into(),
            message: format!(
                "must be before playoff_week_start ({} >= {})",
                sched.early_week_end, sched.playoff_week_start
            ),
        });
    }

    let scarcity = &settings.scarcity;
    if scarcity.tier2_threshold <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "scarcity.tier2_threshold".into(),
            message: format!("must be > 0, got {}", scarcity.tier2_threshold),
        });
    }
    if scarcity.tier1_threshold <= scarcity.tier2_threshold {
        return Err(ConfigError::ValidationError {
            field: "scarcity.tier1_threshold".into(),
            message: format!(
                "must be greater than tier2_threshold ({} <= {})",
                scarcity.tier1_threshold, scarcity.tier2_threshold
            ),
        });
    }
    if scarcity.dropoff_threshold <= 0.0 {
        return Err(ConfigError::ValidationError {
            field: "scarcity.dropoff_threshold".into(),
            message: format!("must be > 0, got {}", scarcity.dropoff_threshold),
        });
    }
    let m = &scarcity.multipliers;
    let mult_fields: &[(&str, f64)] = &[
        ("scarcity.multipliers.none", m.none),
        ("scarcity.multipliers.low", m.low),
        ("scarcity.multipliers.medium", m.medium),
        ("scarcity.multipliers.high", m.high),
        ("scarcity.multipliers.critical", m.critical),
    ];
    for (name, val) in mult_fields {
        if *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be >= 0, got {val}"),
            });
        }
    }

    let rec = &settings.recommendation;
    if rec.top_n == 0 {
        return Err(ConfigError::ValidationError {
            field: "recommendation.top_n".into(),
            message: "must be greater than 0".into(),
        });
    }
    let u = &rec.urgency;
    if u.must_draft < u.high || u.high < u.medium {
        return Err(ConfigError::ValidationError {
            field: "recommendation.urgency".into(),
            message: format!(
                "thresholds must be ordered must_draft >= high >= medium, got {}/{}/{}",
                u.must_draft, u.high, u.medium
            ),
        });
    }
    let v = &rec.value;
    if v.steal < v.good_value || v.good_value < v.fair || v.fair < v.reach {
        return Err(ConfigError::ValidationError {
            field: "recommendation.value".into(),
            message: format!(
                "thresholds must be ordered steal >= good_value >= fair >= reach, got {}/{}/{}/{}",
                v.steal, v.good_value, v.fair, v.reach
            ),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
