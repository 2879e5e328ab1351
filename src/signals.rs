use crate::metrics::round2;
use crate::models::{SignalSet, Snapshot};

/// Percent change that never divides by zero: 0 -> 0 is no change and
/// 0 -> anything else counts as a full +100%.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 && current == 0.0 {
        return 0.0;
    }
    if previous == 0.0 {
        return 100.0;
    }
    round2((current - previous) / previous * 100.0)
}

pub fn engagement_per_post(engagement: u64, post_count: usize) -> f64 {
    if post_count == 0 {
        0.0
    } else {
        engagement as f64 / post_count as f64
    }
}

pub fn diff(current: &Snapshot, previous: &Snapshot) -> SignalSet {
    let current_per_post = engagement_per_post(current.engagement, current.post_count);
    let previous_per_post = engagement_per_post(previous.engagement, previous.post_count);

    SignalSet {
        engagement_change_percent: percent_change(
            current.engagement as f64,
            previous.engagement as f64,
        ),
        post_count_change: current.post_count as i64 - previous.post_count as i64,
        engagement_per_post_change_percent: percent_change(current_per_post, previous_per_post),
        engagement_rate_change: round2(current.engagement_rate - previous.engagement_rate),
        current: *current,
        previous: *previous,
        is_active: current.post_count > 0,
        was_active_before: previous.post_count > 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(engagement: u64, post_count: usize, engagement_rate: f64) -> Snapshot {
        Snapshot {
            engagement,
            post_count,
            engagement_rate,
        }
    }

    #[test]
    fn computes_engagement_and_post_deltas() {
        let signals = diff(&snapshot(200, 4, 4.0), &snapshot(100, 4, 2.0));

        assert_eq!(signals.engagement_change_percent, 100.0);
        assert_eq!(signals.post_count_change, 0);
        assert_eq!(signals.engagement_rate_change, 2.0);
        assert_eq!(signals.engagement_per_post_change_percent, 100.0);
        assert!(signals.is_active);
        assert!(signals.was_active_before);
    }

    #[test]
    fn zero_previous_engagement_is_full_increase() {
        let signals = diff(&snapshot(100, 2, 2.0), &snapshot(0, 0, 0.0));

        assert_eq!(signals.engagement_change_percent, 100.0);
        assert_eq!(signals.engagement_per_post_change_percent, 100.0);
        assert!(!signals.was_active_before);
        assert!(signals.is_active);
    }

    #[test]
    fn zero_to_zero_is_no_change() {
        assert_eq!(percent_change(0.0, 0.0), 0.0);
        let signals = diff(&snapshot(0, 0, 0.0), &snapshot(0, 0, 0.0));
        assert_eq!(signals.engagement_change_percent, 0.0);
        assert!(!signals.is_active);
        assert!(!signals.was_active_before);
    }

    #[test]
    fn decline_is_negative_and_rounded() {
        assert_eq!(percent_change(2.0, 3.0), -33.33);
        assert_eq!(percent_change(50.0, 100.0), -50.0);
    }

    #[test]
    fn per_post_change_uses_unrounded_ratios() {
        // 100 over 3 posts against 100 over 4 posts.
        let signals = diff(&snapshot(100, 3, 1.0), &snapshot(100, 4, 1.0));
        assert_eq!(signals.post_count_change, -1);
        assert_eq!(signals.engagement_change_percent, 0.0);
        assert_eq!(signals.engagement_per_post_change_percent, 33.33);
    }

    #[test]
    fn rate_change_is_rounded() {
        let signals = diff(&snapshot(10, 1, 0.3), &snapshot(10, 1, 0.1));
        assert_eq!(signals.engagement_rate_change, 0.2);
    }
}
