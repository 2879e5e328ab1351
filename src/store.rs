use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::compare::compare_metrics;
use crate::error::EngineError;
use crate::insights::evaluate;
use crate::metrics::aggregate;
use crate::models::{
    Campaign, CampaignMetrics, CampaignSummary, ComparisonResult, DateRange, InsightReport,
    PostEngagement,
};
use crate::signals::diff;

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn find_campaign(&self, id: i64) -> Result<Option<Campaign>>;

    /// Posts of a campaign inside `range` in insertion (id) order. The order
    /// decides which post wins a best-post tie.
    async fn find_posts(&self, campaign_id: i64, range: &DateRange) -> Result<Vec<PostEngagement>>;

    /// All campaigns with their post counts, newest first.
    async fn list_campaigns(&self) -> Result<Vec<CampaignSummary>>;
}

/// Looks the campaign up, turning absence into `NotFound`.
pub async fn require_campaign<S>(store: &S, campaign_id: i64) -> Result<Campaign, EngineError>
where
    S: CampaignStore + ?Sized,
{
    match store.find_campaign(campaign_id).await? {
        Some(campaign) => Ok(campaign),
        None => {
            warn!(campaign_id, "campaign not found");
            Err(EngineError::NotFound(campaign_id))
        }
    }
}

pub async fn analyze_campaign<S>(
    store: &S,
    campaign_id: i64,
    range: &DateRange,
) -> Result<CampaignMetrics, EngineError>
where
    S: CampaignStore + ?Sized,
{
    let campaign = require_campaign(store, campaign_id).await?;
    let posts = store.find_posts(campaign_id, range).await?;
    debug!(campaign_id, fetched = posts.len(), "fetched campaign posts");

    Ok(aggregate(&campaign, &posts, range))
}

/// Metrics for `range` plus insights against the preceding window of the same
/// length. Insights are only produced when both bounds are set.
pub async fn insight_report<S>(
    store: &S,
    campaign_id: i64,
    range: &DateRange,
) -> Result<InsightReport, EngineError>
where
    S: CampaignStore + ?Sized,
{
    range.validate()?;
    let analytics = analyze_campaign(store, campaign_id, range).await?;

    let Some(previous_range) = range.previous_window() else {
        return Ok(InsightReport {
            range: *range,
            analytics,
            previous: None,
            signals: None,
            insights: Vec::new(),
        });
    };

    let previous = analyze_campaign(store, campaign_id, &previous_range).await?;
    let signals = diff(&analytics.snapshot(), &previous.snapshot());
    let insights = evaluate(&signals);
    debug!(campaign_id, fired = insights.len(), "evaluated insight rules");

    Ok(InsightReport {
        range: *range,
        analytics,
        previous: Some(previous),
        signals: Some(signals),
        insights,
    })
}

pub async fn compare_campaigns<S>(
    store: &S,
    campaign_a: i64,
    campaign_b: i64,
    range: &DateRange,
) -> Result<ComparisonResult, EngineError>
where
    S: CampaignStore + ?Sized,
{
    if campaign_a <= 0 || campaign_b <= 0 {
        return Err(EngineError::InvalidComparison(
            "campaign ids must be positive".to_string(),
        ));
    }
    if campaign_a == campaign_b {
        return Err(EngineError::InvalidComparison(
            "cannot compare the same campaign".to_string(),
        ));
    }
    range.validate()?;

    let (metrics_a, metrics_b) = tokio::try_join!(
        analyze_campaign(store, campaign_a, range),
        analyze_campaign(store, campaign_b, range),
    )?;

    Ok(compare_metrics(metrics_a, metrics_b, *range))
}
