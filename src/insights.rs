//! Ordered insight rules.
//!
//! Rules run top to bottom over a single `SignalSet`. A terminal rule that
//! fires ends evaluation with only its own insight; every other firing rule
//! appends and evaluation carries on.

use crate::models::{Confidence, Insight, InsightKind, SignalSet};

pub struct Rule {
    pub name: &'static str,
    pub terminal: bool,
    pub applies: fn(&SignalSet) -> bool,
    pub insight: Insight,
}

pub static RULES: &[Rule] = &[
    Rule {
        name: "became_inactive",
        terminal: true,
        applies: |s: &SignalSet| s.was_active_before && !s.is_active,
        insight: Insight {
            kind: InsightKind::Warning,
            message: "Campaign became inactive during the selected period.",
            confidence: Confidence::High,
            based_on: &["postCount"],
            threshold: None,
        },
    },
    Rule {
        name: "activity_resumed",
        terminal: false,
        applies: |s: &SignalSet| !s.was_active_before && s.is_active,
        insight: Insight {
            kind: InsightKind::Positive,
            message: "Campaign activity resumed after a period of inactivity.",
            confidence: Confidence::High,
            based_on: &["postCount"],
            threshold: None,
        },
    },
    Rule {
        name: "no_activity",
        terminal: true,
        applies: |s: &SignalSet| !s.was_active_before && !s.is_active,
        insight: Insight {
            kind: InsightKind::Neutral,
            message: "No campaign activity detected in the current or previous period.",
            confidence: Confidence::High,
            based_on: &["postCount"],
            threshold: None,
        },
    },
    // The drop and growth rules cannot both hold for one value.
    Rule {
        name: "engagement_drop",
        terminal: false,
        applies: |s: &SignalSet| s.engagement_change_percent <= -20.0,
        insight: Insight {
            kind: InsightKind::Warning,
            message: "Engagement dropped significantly compared to the previous period.",
            confidence: Confidence::High,
            based_on: &["engagementChangePercent"],
            threshold: Some("-20%"),
        },
    },
    Rule {
        name: "engagement_growth",
        terminal: false,
        applies: |s: &SignalSet| s.engagement_change_percent >= 20.0,
        insight: Insight {
            kind: InsightKind::Positive,
            message: "Strong engagement growth observed in the selected period.",
            confidence: Confidence::High,
            based_on: &["engagementChangePercent"],
            threshold: Some("+20%"),
        },
    },
    Rule {
        name: "decline_despite_posting",
        terminal: false,
        applies: |s: &SignalSet| s.engagement_change_percent < 0.0 && s.post_count_change == 0,
        insight: Insight {
            kind: InsightKind::Warning,
            message: "Engagement declined despite consistent posting, indicating reduced content effectiveness.",
            confidence: Confidence::Medium,
            based_on: &["engagementChangePercent", "postCountChange"],
            threshold: None,
        },
    },
    Rule {
        name: "fewer_better_posts",
        terminal: false,
        applies: |s: &SignalSet| s.post_count_change < 0 && s.engagement_per_post_change_percent > 0.0,
        insight: Insight {
            kind: InsightKind::Positive,
            message: "Fewer posts are generating higher engagement per post, suggesting improved content quality.",
            confidence: Confidence::Medium,
            based_on: &["postCountChange", "engagementPerPostChangePercent"],
            threshold: None,
        },
    },
    Rule {
        name: "efficiency_up_volume_down",
        terminal: false,
        applies: |s: &SignalSet| s.engagement_rate_change > 0.0 && s.engagement_change_percent < 0.0,
        insight: Insight {
            kind: InsightKind::Neutral,
            message: "Campaign efficiency improved, but overall engagement volume declined.",
            confidence: Confidence::Low,
            based_on: &["engagementRateChange", "engagementChangePercent"],
            threshold: None,
        },
    },
    Rule {
        name: "stable",
        terminal: false,
        applies: |s: &SignalSet| s.engagement_change_percent.abs() < 5.0 && s.post_count_change.abs() <= 1,
        insight: Insight {
            kind: InsightKind::Neutral,
            message: "Campaign performance remained stable across periods.",
            confidence: Confidence::Medium,
            based_on: &["engagementChangePercent", "postCountChange"],
            threshold: Some("±5%"),
        },
    },
];

pub fn evaluate(signals: &SignalSet) -> Vec<Insight> {
    evaluate_rules(RULES, signals)
}

pub fn evaluate_rules(rules: &[Rule], signals: &SignalSet) -> Vec<Insight> {
    let mut insights = Vec::new();

    for rule in rules {
        if !(rule.applies)(signals) {
            continue;
        }
        if rule.terminal {
            return vec![rule.insight.clone()];
        }
        insights.push(rule.insight.clone());
    }

    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Snapshot;

    fn base_signals() -> SignalSet {
        let snapshot = Snapshot {
            engagement: 100,
            post_count: 2,
            engagement_rate: 2.0,
        };
        SignalSet {
            engagement_change_percent: 0.0,
            post_count_change: 0,
            engagement_per_post_change_percent: 0.0,
            engagement_rate_change: 0.0,
            current: snapshot,
            previous: snapshot,
            is_active: true,
            was_active_before: true,
        }
    }

    fn messages(insights: &[Insight]) -> Vec<&'static str> {
        insights.iter().map(|insight| insight.message).collect()
    }

    #[test]
    fn flags_significant_engagement_drop() {
        let signals = SignalSet {
            engagement_change_percent: -25.0,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert_eq!(insights[0].confidence, Confidence::High);
        assert!(insights[0].based_on.contains(&"engagementChangePercent"));
        // Post count held steady, so the content-effectiveness warning follows.
        assert_eq!(insights.len(), 2);
        assert!(insights[1].message.contains("despite consistent posting"));
    }

    #[test]
    fn inactivity_short_circuits() {
        let signals = SignalSet {
            is_active: false,
            was_active_before: true,
            engagement_change_percent: -100.0,
            post_count_change: -2,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Warning);
        assert!(insights[0].message.contains("inactive"));
    }

    #[test]
    fn no_activity_in_either_period_short_circuits() {
        let signals = SignalSet {
            is_active: false,
            was_active_before: false,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Neutral);
        assert!(insights[0].message.starts_with("No campaign activity"));
    }

    #[test]
    fn resumed_activity_falls_through() {
        let signals = SignalSet {
            is_active: true,
            was_active_before: false,
            engagement_change_percent: 100.0,
            post_count_change: 3,
            engagement_per_post_change_percent: 100.0,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(
            messages(&insights),
            vec![
                "Campaign activity resumed after a period of inactivity.",
                "Strong engagement growth observed in the selected period.",
            ]
        );
    }

    #[test]
    fn small_change_is_stable_only() {
        let signals = SignalSet {
            engagement_change_percent: 2.0,
            post_count_change: 0,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Neutral);
        assert!(insights[0].message.contains("stable"));
        assert_eq!(insights[0].threshold, Some("±5%"));
    }

    #[test]
    fn overlapping_rules_keep_table_order() {
        let signals = SignalSet {
            engagement_change_percent: -3.0,
            post_count_change: 0,
            engagement_rate_change: 0.5,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(
            messages(&insights),
            vec![
                "Engagement declined despite consistent posting, indicating reduced content effectiveness.",
                "Campaign efficiency improved, but overall engagement volume declined.",
                "Campaign performance remained stable across periods.",
            ]
        );
    }

    #[test]
    fn fewer_posts_with_better_per_post_engagement() {
        let signals = SignalSet {
            engagement_change_percent: 10.0,
            post_count_change: -2,
            engagement_per_post_change_percent: 65.0,
            ..base_signals()
        };
        let insights = evaluate(&signals);

        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].kind, InsightKind::Positive);
        assert!(insights[0].message.starts_with("Fewer posts"));
    }

    #[test]
    fn thresholds_are_inclusive() {
        let drop = SignalSet {
            engagement_change_percent: -20.0,
            post_count_change: 4,
            ..base_signals()
        };
        assert_eq!(evaluate(&drop)[0].threshold, Some("-20%"));

        let growth = SignalSet {
            engagement_change_percent: 20.0,
            post_count_change: 4,
            ..base_signals()
        };
        assert_eq!(evaluate(&growth)[0].threshold, Some("+20%"));
    }

    #[test]
    fn moderate_change_with_busy_posting_yields_nothing() {
        let signals = SignalSet {
            engagement_change_percent: 12.0,
            post_count_change: 3,
            ..base_signals()
        };
        assert!(evaluate(&signals).is_empty());
    }

    #[test]
    fn evaluation_is_repeatable() {
        let signals = SignalSet {
            engagement_change_percent: -30.0,
            post_count_change: -1,
            engagement_per_post_change_percent: 5.0,
            engagement_rate_change: 1.0,
            ..base_signals()
        };
        assert_eq!(evaluate(&signals), evaluate(&signals));
    }

    #[test]
    fn rule_table_is_in_evaluation_order() {
        let names: Vec<&str> = RULES.iter().map(|rule| rule.name).collect();
        assert_eq!(
            names,
            vec![
                "became_inactive",
                "activity_resumed",
                "no_activity",
                "engagement_drop",
                "engagement_growth",
                "decline_despite_posting",
                "fewer_better_posts",
                "efficiency_up_volume_down",
                "stable",
            ]
        );
        let terminal: Vec<&str> = RULES
            .iter()
            .filter(|rule| rule.terminal)
            .map(|rule| rule.name)
            .collect();
        assert_eq!(terminal, vec!["became_inactive", "no_activity"]);
    }
}
