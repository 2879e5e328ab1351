use std::cmp::Ordering;

use crate::metrics::round2;
use crate::models::{CampaignMetrics, Comparison, ComparisonResult, DateRange, Side};

pub const NOTE_A_EMPTY: &str = "Campaign A has no posts in selected range";
pub const NOTE_B_EMPTY: &str = "Campaign B has no posts in selected range";
pub const NOTE_BOTH_EMPTY: &str = "Both campaigns have no activity in selected range";

fn winner<T: PartialOrd>(a: T, b: T) -> Option<Side> {
    match a.partial_cmp(&b) {
        Some(Ordering::Greater) => Some(Side::CampaignA),
        Some(Ordering::Less) => Some(Side::CampaignB),
        _ => None,
    }
}

/// Difference of A's total engagement relative to B's.
pub fn engagement_diff_percent(a_total: u64, b_total: u64) -> Option<f64> {
    if a_total == 0 && b_total == 0 {
        return None;
    }
    if b_total == 0 {
        return Some(100.0);
    }
    let (a, b) = (a_total as f64, b_total as f64);
    Some(round2((a - b) / b * 100.0))
}

pub fn compare_metrics(
    campaign_a: CampaignMetrics,
    campaign_b: CampaignMetrics,
    range: DateRange,
) -> ComparisonResult {
    let mut notes = Vec::new();
    if campaign_a.post_count == 0 {
        notes.push(NOTE_A_EMPTY);
    }
    if campaign_b.post_count == 0 {
        notes.push(NOTE_B_EMPTY);
    }
    if campaign_a.post_count == 0 && campaign_b.post_count == 0 {
        notes.push(NOTE_BOTH_EMPTY);
    }

    let comparison = Comparison {
        winner_by_engagement: winner(campaign_a.total_engagement, campaign_b.total_engagement),
        winner_by_engagement_rate: winner(campaign_a.engagement_rate, campaign_b.engagement_rate),
        engagement_diff_percent: engagement_diff_percent(
            campaign_a.total_engagement,
            campaign_b.total_engagement,
        ),
        notes,
    };

    ComparisonResult {
        range,
        campaign_a,
        campaign_b,
        comparison,
    }
}
