// Recommendation engine: turns ranked valuations into an ordered,
// capped list of draft suggestions with urgency, market labels, and
// human-readable justifications.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::RecommendationSettings;
use crate::player::{Player, Position};
use crate::valuation::enhanced::EnhancedVor;
use crate::valuation::scarcity::{alert_for_position, AlertSeverity, DropOffAlert};

// ---------------------------------------------------------------------------
// Urgency
// ---------------------------------------------------------------------------

/// How urgently a recommended player should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    MustDraft,
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Sort priority; lower is more urgent.
    pub fn priority(&self) -> u8 {
        match self {
            Urgency::MustDraft => 0,
            Urgency::High => 1,
            Urgency::Medium => 2,
            Urgency::Low => 3,
        }
    }

    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Urgency::MustDraft => "MUST-DRAFT",
            Urgency::High => "HIGH",
            Urgency::Medium => "MEDIUM",
            Urgency::Low => "LOW",
        }
    }
}

// ---------------------------------------------------------------------------
// Value vs. market
// ---------------------------------------------------------------------------

/// Where the player's price sits relative to the market consensus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValueIndicator {
    Steal,
    GoodValue,
    Fair,
    Reach,
    Avoid,
}

impl ValueIndicator {
    /// Return a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ValueIndicator::Steal => "STEAL",
            ValueIndicator::GoodValue => "GOOD VALUE",
            ValueIndicator::Fair => "FAIR",
            ValueIndicator::Reach => "REACH",
            ValueIndicator::Avoid => "AVOID",
        }
    }
}

// ---------------------------------------------------------------------------
// Recommendation
// ---------------------------------------------------------------------------

/// One ranked draft suggestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub value: EnhancedVor,
    pub urgency: Urgency,
    pub value_indicator: ValueIndicator,
    /// Ordered reasons supporting the suggestion.
    pub justifications: Vec<String>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Urgency from the scarcity premium, upgraded by an active drop-off
/// alert at the position (critical alert -> at least High, warning ->
/// at least Medium). The upgrade never downgrades.
fn classify_urgency(
    scarcity_premium: f64,
    alert: Option<&DropOffAlert>,
    settings: &RecommendationSettings,
) -> Urgency {
    let t = &settings.urgency;
    let mut urgency = if scarcity_premium >= t.must_draft {
        Urgency::MustDraft
    } else if scarcity_premium >= t.high {
        Urgency::High
    } else if scarcity_premium >= t.medium {
        Urgency::Medium
    } else {
        Urgency::Low
    };

    if let Some(alert) = alert {
        let floor = match alert.severity {
            AlertSeverity::Critical => Urgency::High,
            AlertSeverity::Warning => Urgency::Medium,
        };
        if floor.priority() < urgency.priority() {
            urgency = floor;
        }
    }

    urgency
}

/// Value-vs-market label from the ADP differential.
fn classify_value(adp_diff: f64, settings: &RecommendationSettings) -> ValueIndicator {
    let t = &settings.value;
    if adp_diff >= t.steal {
        ValueIndicator::Steal
    } else if adp_diff >= t.good_value {
        ValueIndicator::GoodValue
    } else if adp_diff >= t.fair {
        ValueIndicator::Fair
    } else if adp_diff >= t.reach {
        ValueIndicator::Reach
    } else {
        ValueIndicator::Avoid
    }
}

/// Minimum schedule adjustment worth calling out.
const FAVORABLE_SCHEDULE_CUTOFF: f64 = 3.0;

/// Minimum ADP differential worth calling out.
const ADP_VALUE_CUTOFF: f64 = 5.0;

fn build_justifications(
    record: &EnhancedVor,
    needed: bool,
    alert: Option<&DropOffAlert>,
) -> Vec<String> {
    let mut reasons = Vec::new();
    if needed {
        reasons.push(format!("Fills a starting need at {}", record.pos));
    }
    if record.adp_diff > ADP_VALUE_CUTOFF {
        reasons.push(format!(
            "Going {:.0} picks below market value",
            record.adp_diff
        ));
    }
    if record.scarcity_premium > 0.0 {
        reasons.push(format!(
            "{} scarcity adds +{:.1} value",
            record.pos, record.scarcity_premium
        ));
    }
    if record.schedule_adjustment > FAVORABLE_SCHEDULE_CUTOFF {
        reasons.push(format!(
            "Favorable schedule (+{:.1})",
            record.schedule_adjustment
        ));
    }
    if let Some(alert) = alert {
        reasons.push(format!(
            "{} tier cliff: {} quality picks left",
            alert.position, alert.picks_until_cliff
        ));
    }
    reasons
}

// ---------------------------------------------------------------------------
// Top recommendations
// ---------------------------------------------------------------------------

/// Build the ordered, capped recommendation list.
///
/// Candidates must appear in both the enhanced-value set and the
/// authoritative player set, and must not be drafted. Ordering: players
/// at needed positions first, then by urgency, then by enhanced value
/// descending (key breaks exact ties). At most `settings.top_n`
/// recommendations are returned; an empty result is a valid outcome
/// when every candidate is gone.
pub fn top_recommendations(
    enhanced: &[EnhancedVor],
    players: &[Player],
    drafted: &HashSet<String>,
    needed_positions: &HashSet<Position>,
    alerts: &[DropOffAlert],
    settings: &RecommendationSettings,
) -> Vec<Recommendation> {
    let known_keys: HashSet<&str> = players.iter().map(|p| p.key.as_str()).collect();

    let mut recommendations: Vec<(bool, Recommendation)> = enhanced
        .iter()
        .filter(|r| known_keys.contains(r.key.as_str()) && !drafted.contains(&r.key))
        .map(|record| {
            let alert = alert_for_position(alerts, record.pos);
            let needed = needed_positions.contains(&record.pos);
            let urgency = classify_urgency(record.scarcity_premium, alert, settings);
            let value_indicator = classify_value(record.adp_diff, settings);
            let justifications = build_justifications(record, needed, alert);
            (
                needed,
                Recommendation {
                    value: record.clone(),
                    urgency,
                    value_indicator,
                    justifications,
                },
            )
        })
        .collect();

    recommendations.sort_by(|(a_needed, a), (b_needed, b)| {
        b_needed
            .cmp(a_needed)
            .then_with(|| a.urgency.priority().cmp(&b.urgency.priority()))
            .then_with(|| {
                b.value
                    .enhanced_vor
                    .partial_cmp(&a.value.enhanced_vor)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.value.key.cmp(&b.value.key))
    });

    recommendations
        .into_iter()
        .take(settings.top_n)
        .map(|(_, rec)| rec)
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_record(key: &str, pos: Position, enhanced: f64) -> EnhancedVor {
        EnhancedVor {
            key: key.into(),
            name: key.into(),
            pos,
            base_vor: enhanced,
            projected_points: 200.0,
            risk_adjustment: 0.0,
            schedule_adjustment: 0.0,
            scarcity_premium: 0.0,
            enhanced_vor: enhanced,
            overall_rank: 1,
            position_rank: 1,
            adp_diff: 0.0,
        }
    }

    fn make_player(key: &str, pos: Position) -> Player {
        Player {
            key: key.into(),
            name: key.into(),
            pos,
            team: "TST".into(),
            bye: 9,
            adp_std: 0.0,
            adp_half_ppr: 0.0,
            adp_ppr: 0.0,
            projected_points: 200.0,
            vor: 50.0,
            advanced: None,
            risk: None,
        }
    }

    fn warning_alert(pos: Position) -> DropOffAlert {
        DropOffAlert {
            position: pos,
            severity: AlertSeverity::Warning,
            tier_avg: 70.0,
            next_tier_avg: 35.0,
            drop: 35.0,
            picks_until_cliff: 5,
        }
    }

    fn critical_alert(pos: Position) -> DropOffAlert {
        DropOffAlert {
            severity: AlertSeverity::Critical,
            picks_until_cliff: 2,
            ..warning_alert(pos)
        }
    }

    // ---- Urgency ----

    #[test]
    fn urgency_from_premium_thresholds() {
        let settings = RecommendationSettings::default();
        assert_eq!(classify_urgency(35.0, None, &settings), Urgency::MustDraft);
        assert_eq!(classify_urgency(30.0, None, &settings), Urgency::MustDraft);
        assert_eq!(classify_urgency(25.0, None, &settings), Urgency::High);
        assert_eq!(classify_urgency(15.0, None, &settings), Urgency::Medium);
        assert_eq!(classify_urgency(5.0, None, &settings), Urgency::Low);
        assert_eq!(classify_urgency(0.0, None, &settings), Urgency::Low);
    }

    #[test]
    fn critical_alert_upgrades_to_high() {
        let settings = RecommendationSettings::default();
        let alert = critical_alert(Position::Rb);
        assert_eq!(
            classify_urgency(5.0, Some(&alert), &settings),
            Urgency::High
        );
        // Never downgrades an already-urgent position.
        assert_eq!(
            classify_urgency(35.0, Some(&alert), &settings),
            Urgency::MustDraft
        );
    }

    #[test]
    fn warning_alert_upgrades_to_medium() {
        let settings = RecommendationSettings::default();
        let alert = warning_alert(Position::Te);
        assert_eq!(
            classify_urgency(2.0, Some(&alert), &settings),
            Urgency::Medium
        );
        assert_eq!(
            classify_urgency(25.0, Some(&alert), &settings),
            Urgency::High
        );
    }

    // ---- Value labels ----

    #[test]
    fn value_labels_from_adp_diff() {
        let settings = RecommendationSettings::default();
        assert_eq!(classify_value(20.0, &settings), ValueIndicator::Steal);
        assert_eq!(classify_value(15.0, &settings), ValueIndicator::Steal);
        assert_eq!(classify_value(8.0, &settings), ValueIndicator::GoodValue);
        assert_eq!(classify_value(0.0, &settings), ValueIndicator::Fair);
        assert_eq!(classify_value(-5.0, &settings), ValueIndicator::Fair);
        assert_eq!(classify_value(-10.0, &settings), ValueIndicator::Reach);
        assert_eq!(classify_value(-20.0, &settings), ValueIndicator::Avoid);
    }

    // ---- Filtering ----

    #[test]
    fn excludes_drafted_and_unknown_players() {
        let enhanced = vec![
            make_record("known", Position::Rb, 80.0),
            make_record("ghost", Position::Rb, 75.0),
            make_record("taken", Position::Rb, 70.0),
        ];
        let players = vec![make_player("known", Position::Rb), make_player("taken", Position::Rb)];
        let drafted: HashSet<String> = ["taken".to_string()].into_iter().collect();
        let recs = top_recommendations(
            &enhanced,
            &players,
            &drafted,
            &HashSet::new(),
            &[],
            &RecommendationSettings::default(),
        );
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].value.key, "known");
    }

    #[test]
    fn empty_candidates_is_valid_outcome() {
        let enhanced = vec![make_record("a", Position::Rb, 80.0)];
        let players = vec![make_player("a", Position::Rb)];
        let drafted: HashSet<String> = ["a".to_string()].into_iter().collect();
        let recs = top_recommendations(
            &enhanced,
            &players,
            &drafted,
            &HashSet::new(),
            &[],
            &RecommendationSettings::default(),
        );
        assert!(recs.is_empty());
    }

    // ---- Ordering ----

    #[test]
    fn needed_positions_sort_first() {
        let enhanced = vec![
            make_record("wr", Position::Wr, 90.0),
            make_record("rb", Position::Rb, 40.0),
        ];
        let players = vec![make_player("wr", Position::Wr), make_player("rb", Position::Rb)];
        let needed: HashSet<Position> = [Position::Rb].into_iter().collect();
        let recs = top_recommendations(
            &enhanced,
            &players,
            &HashSet::new(),
            &needed,
            &[],
            &RecommendationSettings::default(),
        );
        assert_eq!(recs[0].value.key, "rb");
        assert_eq!(recs[1].value.key, "wr");
    }

    #[test]
    fn urgency_breaks_ties_within_need_group() {
        let mut urgent = make_record("urgent", Position::Te, 40.0);
        urgent.scarcity_premium = 35.0;
        let calm = make_record("calm", Position::Wr, 90.0);
        let enhanced = vec![calm, urgent];
        let players = vec![make_player("urgent", Position::Te), make_player("calm", Position::Wr)];
        let recs = top_recommendations(
            &enhanced,
            &players,
            &HashSet::new(),
            &HashSet::new(),
            &[],
            &RecommendationSettings::default(),
        );
        // Must-draft urgency outranks a higher enhanced value.
        assert_eq!(recs[0].value.key, "urgent");
        assert_eq!(recs[0].urgency, Urgency::MustDraft);
        assert_eq!(recs[1].value.key, "calm");
    }

    #[test]
    fn enhanced_value_orders_within_same_urgency() {
        let enhanced = vec![
            make_record("second", Position::Wr, 60.0),
            make_record("first", Position::Wr, 85.0),
        ];
        let players = vec![make_player("second", Position::Wr), make_player("first", Position::Wr)];
        let recs = top_recommendations(
            &enhanced,
            &players,
            &HashSet::new(),
            &HashSet::new(),
            &[],
            &RecommendationSettings::default(),
        );
        assert_eq!(recs[0].value.key, "first");
        assert_eq!(recs[1].value.key, "second");
    }

    #[test]
    fn list_caps_at_top_n() {
        let enhanced: Vec<EnhancedVor> = (0..10)
            .map(|i| make_record(&format!("p{i}"), Position::Wr, 90.0 - i as f64))
            .collect();
        let players: Vec<Player> = (0..10)
            .map(|i| make_player(&format!("p{i}"), Position::Wr))
            .collect();
        let recs = top_recommendations(
            &enhanced,
            &players,
            &HashSet::new(),
            &HashSet::new(),
            &[],
            &RecommendationSettings::default(),
        );
        assert_eq!(recs.len(), 5);

        let wide = RecommendationSettings {
            top_n: 8,
            ..RecommendationSettings::default()
        };
        let recs = top_recommendations(
            &enhanced,
            &players,
            &HashSet::new(),
            &HashSet::new(),
            &[],
            &wide,
        );
        assert_eq!(recs.len(), 8);
    }

    // ---- Justifications ----

    #[test]
    fn justifications_cover_all_triggers_in_order() {
        let mut record = make_record("rb1", Position::Rb, 95.0);
        record.adp_diff = 12.0;
        record.scarcity_premium = 6.0;
        record.schedule_adjustment = 4.5;
        let alert = warning_alert(Position::Rb);
        let reasons = build_justifications(&record, true, Some(&alert));
        assert_eq!(reasons.len(), 5);
        assert!(reasons[0].contains("starting need at RB"));
        assert!(reasons[1].contains("below market value"));
        assert!(reasons[2].contains("scarcity"));
        assert!(reasons[3].contains("Favorable schedule"));
        assert!(reasons[4].contains("tier cliff"));
    }

    #[test]
    fn justifications_skip_inactive_triggers() {
        let mut record = make_record("wr1", Position::Wr, 60.0);
        record.adp_diff = 2.0; // below cutoff
        record.schedule_adjustment = 1.0; // below cutoff
        let reasons = build_justifications(&record, false, None);
        assert!(reasons.is_empty());
    }

    #[test]
    fn must_draft_and_low_scenarios() {
        let settings = RecommendationSettings::default();
        let mut hot = make_record("hot", Position::Rb, 80.0);
        hot.scarcity_premium = 35.0;
        let mut cold = make_record("cold", Position::Wr, 70.0);
        cold.scarcity_premium = 5.0;
        let players = vec![make_player("hot", Position::Rb), make_player("cold", Position::Wr)];
        let recs = top_recommendations(
            &[hot, cold],
            &players,
            &HashSet::new(),
            &HashSet::new(),
            &[],
            &settings,
        );
        let hot_rec = recs.iter().find(|r| r.value.key == "hot").unwrap();
        let cold_rec = recs.iter().find(|r| r.value.key == "cold").unwrap();
        assert_eq!(hot_rec.urgency, Urgency::MustDraft);
        assert_eq!(cold_rec.urgency, Urgency::Low);
    }

    #[test]
    fn steal_and_avoid_scenarios() {
        let settings = RecommendationSettings::default();
        let mut steal = make_record("steal", Position::Wr, 80.0);
        steal.adp_diff = 20.0;
        let mut avoid = make_record("avoid", Position::Wr, 70.0);
        avoid.adp_diff = -20.0;
        let players = vec![make_player("steal", Position::Wr), make_player("avoid", Position::Wr)];
        let recs = top_recommendations(
            &[steal, avoid],
            &players,
            &HashSet::new(),
            &HashSet::new(),
            &[],
            &settings,
        );
        let steal_rec = recs.iter().find(|r| r.value.key == "steal").unwrap();
        let avoid_rec = recs.iter().find(|r| r.value.key == "avoid").unwrap();
        assert_eq!(steal_rec.value_indicator, ValueIndicator::Steal);
        assert_eq!(avoid_rec.value_indicator, ValueIndicator::Avoid);
    }

    #[test]
    fn urgency_labels() {
        assert_eq!(Urgency::MustDraft.label(), "MUST-DRAFT");
        assert_eq!(Urgency::Low.label(), "LOW");
        assert_eq!(ValueIndicator::GoodValue.label(), "GOOD VALUE");
    }
}
