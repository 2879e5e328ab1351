use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    pub budget: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignSummary {
    pub id: i64,
    pub name: String,
    pub budget: f64,
    pub created_at: DateTime<Utc>,
    pub post_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostEngagement {
    pub id: i64,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub saves: u64,
    pub created_at: DateTime<Utc>,
}

impl PostEngagement {
    /// Unweighted engagement contribution of a single post.
    pub fn engagement(&self) -> u64 {
        self.likes + self.comments + self.shares + self.saves
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestPost {
    pub post_id: i64,
    pub engagement: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignMetrics {
    pub campaign_id: i64,
    pub name: String,
    pub budget: f64,
    pub post_count: usize,
    pub total_engagement: u64,
    pub engagement_rate: f64,
    pub best_post: Option<BestPost>,
}

impl CampaignMetrics {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            engagement: self.total_engagement,
            post_count: self.post_count,
            engagement_rate: self.engagement_rate,
        }
    }
}

/// Inclusive time window. Either bound may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| at >= from) && self.to.map_or(true, |to| at <= to)
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        match (self.from, self.to) {
            (Some(from), Some(to)) if from > to => Err(EngineError::InvalidRange),
            _ => Ok(()),
        }
    }

    /// The window of equal length ending where this one starts. Only defined
    /// when both bounds are set.
    pub fn previous_window(&self) -> Option<DateRange> {
        let (from, to) = (self.from?, self.to?);
        let duration = to - from;
        Some(DateRange {
            from: Some(from - duration),
            to: Some(from),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub engagement: u64,
    pub post_count: usize,
    pub engagement_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalSet {
    pub engagement_change_percent: f64,
    pub post_count_change: i64,
    pub engagement_per_post_change_percent: f64,
    pub engagement_rate_change: f64,
    pub current: Snapshot,
    pub previous: Snapshot,
    pub is_active: bool,
    pub was_active_before: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Warning,
    Neutral,
}

impl InsightKind {
    pub fn label(self) -> &'static str {
        match self {
            InsightKind::Positive => "positive",
            InsightKind::Warning => "warning",
            InsightKind::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub message: &'static str,
    pub confidence: Confidence,
    pub based_on: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightReport {
    pub range: DateRange,
    pub analytics: CampaignMetrics,
    pub previous: Option<CampaignMetrics>,
    pub signals: Option<SignalSet>,
    pub insights: Vec<Insight>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    #[serde(rename = "campaignA")]
    CampaignA,
    #[serde(rename = "campaignB")]
    CampaignB,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub winner_by_engagement: Option<Side>,
    pub winner_by_engagement_rate: Option<Side>,
    pub engagement_diff_percent: Option<f64>,
    pub notes: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub range: DateRange,
    pub campaign_a: CampaignMetrics,
    pub campaign_b: CampaignMetrics,
    pub comparison: Comparison,
}
