// Core player data model shared across the valuation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

/// Football positions used for valuation and roster slot assignment.
///
/// `Flex`, `Superflex`, and `Bench` are roster meta-slots rather than
/// scoring positions; `Unknown` absorbs unrecognized input. All four
/// resolve to documented fallback values in position-keyed settings
/// lookups instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    K,
    Dst,
    Flex,
    Superflex,
    Bench,
    #[serde(other)]
    Unknown,
}

/// The scoring positions tracked by the scarcity and ranking passes,
/// in deterministic display order.
pub const SCORING_POSITIONS: &[Position] = &[
    Position::Qb,
    Position::Rb,
    Position::Wr,
    Position::Te,
    Position::K,
    Position::Dst,
];

impl Position {
    /// Parse a position string into a Position.
    ///
    /// Handles the common abbreviations across data providers:
    /// - "K"/"PK" -> K, "DST"/"DEF"/"D/ST" -> Dst
    /// - "FLEX"/"W/R/T" -> Flex, "SUPERFLEX"/"SFLX"/"OP" -> Superflex
    /// - "BENCH"/"BN"/"BE" -> Bench
    ///
    /// Anything unrecognized parses to `Unknown` rather than erroring.
    pub fn from_str_pos(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "QB" => Position::Qb,
            "RB" => Position::Rb,
            "WR" => Position::Wr,
            "TE" => Position::Te,
            "K" | "PK" => Position::K,
            "DST" | "DEF" | "D/ST" => Position::Dst,
            "FLEX" | "W/R/T" => Position::Flex,
            "SUPERFLEX" | "SFLX" | "OP" => Position::Superflex,
            "BENCH" | "BN" | "BE" => Position::Bench,
            _ => Position::Unknown,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::K => "K",
            Position::Dst => "DST",
            Position::Flex => "FLEX",
            Position::Superflex => "SUPERFLEX",
            Position::Bench => "BENCH",
            Position::Unknown => "?",
        }
    }

    /// Whether this is a concrete scoring position (not a meta-slot).
    pub fn is_scoring_position(&self) -> bool {
        matches!(
            self,
            Position::Qb
                | Position::Rb
                | Position::Wr
                | Position::Te
                | Position::K
                | Position::Dst
        )
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Health status
// ---------------------------------------------------------------------------

/// Current injury designation for a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Questionable,
    Doubtful,
    Out,
    #[serde(rename = "ir")]
    InjuredReserve,
}

impl HealthStatus {
    /// Parse a status string. Unknown strings fall back to `Healthy` so
    /// that missing or garbled report data never inflates a risk score.
    pub fn from_str_status(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "healthy" | "active" => HealthStatus::Healthy,
            "questionable" | "q" => HealthStatus::Questionable,
            "doubtful" | "d" => HealthStatus::Doubtful,
            "out" | "o" | "injured" => HealthStatus::Out,
            "ir" | "injured reserve" | "injured-reserve" => HealthStatus::InjuredReserve,
            _ => HealthStatus::Healthy,
        }
    }

    /// Fixed risk contribution for this status, on a 0-1 scale.
    pub fn risk_factor(&self) -> f64 {
        match self {
            HealthStatus::Healthy => 0.0,
            HealthStatus::Questionable => 0.3,
            HealthStatus::Doubtful => 0.5,
            HealthStatus::Out => 0.8,
            HealthStatus::InjuredReserve => 1.0,
        }
    }

    /// Return the display string for this status.
    pub fn display_str(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "healthy",
            HealthStatus::Questionable => "questionable",
            HealthStatus::Doubtful => "doubtful",
            HealthStatus::Out => "out",
            HealthStatus::InjuredReserve => "ir",
        }
    }
}

impl fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Player record
// ---------------------------------------------------------------------------

/// Risk inputs attached to a player when the ingestion layer has them.
///
/// `games_played` covers the last three seasons, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskData {
    #[serde(default)]
    pub age: Option<u8>,
    pub games_played: [u16; 3],
    #[serde(default)]
    pub status: HealthStatus,
    /// Weekly fantasy point totals from the most recent season, when
    /// available. Absent for rookies and thin data feeds.
    #[serde(default)]
    pub weekly_points: Option<Vec<f64>>,
}

/// Usage and efficiency stats carried through for presentation-layer
/// consumers. The valuation math does not read these.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvancedStats {
    #[serde(default)]
    pub target_share: Option<f64>,
    #[serde(default)]
    pub snap_pct: Option<f64>,
    #[serde(default)]
    pub red_zone_targets: Option<f64>,
    #[serde(default)]
    pub red_zone_carries: Option<f64>,
    #[serde(default)]
    pub air_yards: Option<f64>,
    #[serde(default)]
    pub yards_after_contact: Option<f64>,
}

/// A player in the draft pool. Immutable for the duration of a draft
/// cycle; the engine only ever reads these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Stable identity key from the ingestion layer.
    pub key: String,
    pub name: String,
    pub pos: Position,
    pub team: String,
    pub bye: u32,
    /// Average draft position in standard scoring. 0.0 = no market data.
    #[serde(default)]
    pub adp_std: f64,
    #[serde(default)]
    pub adp_half_ppr: f64,
    #[serde(default)]
    pub adp_ppr: f64,
    /// Season-total projected fantasy points.
    pub projected_points: f64,
    /// Base value over replacement, from the projection pipeline.
    pub vor: f64,
    #[serde(default)]
    pub advanced: Option<AdvancedStats>,
    #[serde(default)]
    pub risk: Option<RiskData>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("QB"), Position::Qb);
        assert_eq!(Position::from_str_pos("RB"), Position::Rb);
        assert_eq!(Position::from_str_pos("WR"), Position::Wr);
        assert_eq!(Position::from_str_pos("TE"), Position::Te);
        assert_eq!(Position::from_str_pos("K"), Position::K);
        assert_eq!(Position::from_str_pos("DST"), Position::Dst);
    }

    #[test]
    fn from_str_pos_aliases() {
        assert_eq!(Position::from_str_pos("PK"), Position::K);
        assert_eq!(Position::from_str_pos("DEF"), Position::Dst);
        assert_eq!(Position::from_str_pos("D/ST"), Position::Dst);
        assert_eq!(Position::from_str_pos("W/R/T"), Position::Flex);
        assert_eq!(Position::from_str_pos("OP"), Position::Superflex);
        assert_eq!(Position::from_str_pos("BN"), Position::Bench);
        assert_eq!(Position::from_str_pos("BE"), Position::Bench);
    }

    #[test]
    fn from_str_pos_case_insensitive() {
        assert_eq!(Position::from_str_pos("qb"), Position::Qb);
        assert_eq!(Position::from_str_pos("Rb"), Position::Rb);
        assert_eq!(Position::from_str_pos("dst"), Position::Dst);
        assert_eq!(Position::from_str_pos("flex"), Position::Flex);
    }

    #[test]
    fn from_str_pos_unknown_fallback() {
        assert_eq!(Position::from_str_pos("XX"), Position::Unknown);
        assert_eq!(Position::from_str_pos(""), Position::Unknown);
        assert_eq!(Position::from_str_pos("LB"), Position::Unknown);
    }

    #[test]
    fn display_str_roundtrip_scoring_positions() {
        for &pos in SCORING_POSITIONS {
            let s = pos.display_str();
            assert_eq!(Position::from_str_pos(s), pos, "roundtrip failed for {s}");
        }
    }

    #[test]
    fn is_scoring_position_correct() {
        for &pos in SCORING_POSITIONS {
            assert!(pos.is_scoring_position());
        }
        assert!(!Position::Flex.is_scoring_position());
        assert!(!Position::Superflex.is_scoring_position());
        assert!(!Position::Bench.is_scoring_position());
        assert!(!Position::Unknown.is_scoring_position());
    }

    #[test]
    fn status_parsing() {
        assert_eq!(HealthStatus::from_str_status("healthy"), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_str_status("Questionable"), HealthStatus::Questionable);
        assert_eq!(HealthStatus::from_str_status("doubtful"), HealthStatus::Doubtful);
        assert_eq!(HealthStatus::from_str_status("OUT"), HealthStatus::Out);
        assert_eq!(HealthStatus::from_str_status("injured"), HealthStatus::Out);
        assert_eq!(HealthStatus::from_str_status("IR"), HealthStatus::InjuredReserve);
        // Garbled input falls back to healthy, never inflating risk.
        assert_eq!(HealthStatus::from_str_status("???"), HealthStatus::Healthy);
    }

    #[test]
    fn status_display_roundtrip() {
        for status in [
            HealthStatus::Healthy,
            HealthStatus::Questionable,
            HealthStatus::Doubtful,
            HealthStatus::Out,
            HealthStatus::InjuredReserve,
        ] {
            assert_eq!(HealthStatus::from_str_status(status.display_str()), status);
        }
    }

    #[test]
    fn status_risk_factors() {
        assert_eq!(HealthStatus::Healthy.risk_factor(), 0.0);
        assert_eq!(HealthStatus::Questionable.risk_factor(), 0.3);
        assert_eq!(HealthStatus::Doubtful.risk_factor(), 0.5);
        assert_eq!(HealthStatus::Out.risk_factor(), 0.8);
        assert_eq!(HealthStatus::InjuredReserve.risk_factor(), 1.0);
    }

    #[test]
    fn position_serde_roundtrip() {
        let json = serde_json::to_string(&Position::Dst).unwrap();
        assert_eq!(json, "\"DST\"");
        let parsed: Position = serde_json::from_str("\"RB\"").unwrap();
        assert_eq!(parsed, Position::Rb);
        // Unrecognized strings deserialize to Unknown instead of erroring.
        let parsed: Position = serde_json::from_str("\"CORNERBACK\"").unwrap();
        assert_eq!(parsed, Position::Unknown);
    }

    #[test]
    fn player_deserializes_with_optional_blocks_absent() {
        let json = r#"{
            "key": "p1",
            "name": "Test Player",
            "pos": "RB",
            "team": "SF",
            "bye": 9,
            "projected_points": 280.0,
            "vor": 85.0
        }"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.pos, Position::Rb);
        assert!(player.risk.is_none());
        assert!(player.advanced.is_none());
        assert_eq!(player.adp_std, 0.0);
    }
}
