use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::models::{BestPost, Campaign, CampaignMetrics, DateRange, PostEngagement};

/// Rounds to two decimals, half away from zero, on the exact value of the
/// float rather than on its shortest printed form.
pub fn round2(value: f64) -> f64 {
    match Decimal::from_f64_retain(value) {
        Some(decimal) => decimal
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
            .to_f64()
            .unwrap_or(value),
        None => value,
    }
}

pub fn engagement_rate(total_engagement: u64, budget: f64) -> f64 {
    if budget > 0.0 {
        round2(total_engagement as f64 / budget * 100.0)
    } else {
        0.0
    }
}

/// Reduces the posts that fall inside `range` to a single metrics snapshot.
///
/// Posts are visited in input order; on equal engagement the first post seen
/// stays the best post.
pub fn aggregate(
    campaign: &Campaign,
    posts: &[PostEngagement],
    range: &DateRange,
) -> CampaignMetrics {
    let mut post_count = 0usize;
    let mut total_engagement = 0u64;
    let mut best_post: Option<BestPost> = None;

    for post in posts.iter().filter(|post| range.contains(post.created_at)) {
        let engagement = post.engagement();
        post_count += 1;
        total_engagement += engagement;

        if best_post.map_or(true, |best| engagement > best.engagement) {
            best_post = Some(BestPost {
                post_id: post.id,
                engagement,
            });
        }
    }

    let engagement_rate = engagement_rate(total_engagement, campaign.budget);
    debug!(
        campaign_id = campaign.id,
        post_count, total_engagement, engagement_rate, "aggregated campaign metrics"
    );

    CampaignMetrics {
        campaign_id: campaign.id,
        name: campaign.name.clone(),
        budget: campaign.budget,
        post_count,
        total_engagement,
        engagement_rate,
        best_post,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, day, 12, 0, 0).unwrap()
    }

    fn post(id: i64, likes: u64, comments: u64, shares: u64, saves: u64, day: u32) -> PostEngagement {
        PostEngagement {
            id,
            likes,
            comments,
            shares,
            saves,
            created_at: at(day),
        }
    }

    fn campaign(budget: f64) -> Campaign {
        Campaign {
            id: 7,
            name: "Spring Launch".to_string(),
            budget,
        }
    }

    #[test]
    fn rounds_half_away_from_zero_on_exact_value() {
        assert_eq!(round2(0.125), 0.13);
        assert_eq!(round2(-0.125), -0.13);
        // 0.145 is stored slightly below the midpoint.
        assert_eq!(round2(0.145), 0.14);
        assert_eq!(round2(1234.5678), 1234.57);
        assert_eq!(round2(2.0), 2.0);
    }

    #[test]
    fn totals_sum_every_counter() {
        let posts = vec![post(1, 10, 2, 3, 5, 1), post(2, 1, 1, 1, 1, 2)];
        let metrics = aggregate(&campaign(1000.0), &posts, &DateRange::default());

        assert_eq!(metrics.post_count, 2);
        assert_eq!(metrics.total_engagement, 24);
        assert_eq!(metrics.engagement_rate, 2.4);
        assert_eq!(
            metrics.best_post,
            Some(BestPost {
                post_id: 1,
                engagement: 20
            })
        );
    }

    #[test]
    fn zero_budget_yields_zero_rate() {
        let posts = vec![post(1, 500, 20, 30, 40, 1)];
        let metrics = aggregate(&campaign(0.0), &posts, &DateRange::default());
        assert_eq!(metrics.total_engagement, 590);
        assert_eq!(metrics.engagement_rate, 0.0);
    }

    #[test]
    fn first_post_wins_engagement_tie() {
        let posts = vec![
            post(11, 5, 0, 0, 0, 1),
            post(12, 10, 0, 0, 0, 2),
            post(13, 0, 10, 0, 0, 3),
        ];
        let metrics = aggregate(&campaign(100.0), &posts, &DateRange::default());
        assert_eq!(metrics.best_post.map(|best| best.post_id), Some(12));
    }

    #[test]
    fn empty_post_set_has_no_best_post() {
        let metrics = aggregate(&campaign(100.0), &[], &DateRange::default());
        assert_eq!(metrics.post_count, 0);
        assert_eq!(metrics.total_engagement, 0);
        assert_eq!(metrics.engagement_rate, 0.0);
        assert!(metrics.best_post.is_none());
    }

    #[test]
    fn posts_outside_range_are_skipped() {
        let posts = vec![
            post(1, 100, 0, 0, 0, 1),
            post(2, 10, 0, 0, 0, 5),
            post(3, 20, 0, 0, 0, 9),
        ];
        let range = DateRange::new(Some(at(5)), Some(at(9)));
        let metrics = aggregate(&campaign(300.0), &posts, &range);

        assert_eq!(metrics.post_count, 2);
        assert_eq!(metrics.total_engagement, 30);
        assert_eq!(metrics.engagement_rate, 10.0);
        assert_eq!(metrics.best_post.map(|best| best.post_id), Some(3));
    }
}
