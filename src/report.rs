use std::fmt::Write;

use crate::models::{
    CampaignMetrics, CampaignSummary, ComparisonResult, DateRange, InsightReport, Side,
};

fn range_label(range: &DateRange) -> String {
    match (range.from, range.to) {
        (Some(from), Some(to)) => format!("{} to {}", from.format("%Y-%m-%d %H:%M"), to.format("%Y-%m-%d %H:%M")),
        (Some(from), None) => format!("since {}", from.format("%Y-%m-%d %H:%M")),
        (None, Some(to)) => format!("until {}", to.format("%Y-%m-%d %H:%M")),
        (None, None) => "all time".to_string(),
    }
}

fn side_label(side: Option<Side>, a: &CampaignMetrics, b: &CampaignMetrics) -> String {
    match side {
        Some(Side::CampaignA) => format!("Campaign A ({})", a.name),
        Some(Side::CampaignB) => format!("Campaign B ({})", b.name),
        None => "tie".to_string(),
    }
}

fn write_metrics(output: &mut String, metrics: &CampaignMetrics) {
    let _ = writeln!(output, "- Posts: {}", metrics.post_count);
    let _ = writeln!(output, "- Total engagement: {}", metrics.total_engagement);
    let _ = writeln!(
        output,
        "- Engagement rate: {:.2}% of budget {:.2}",
        metrics.engagement_rate, metrics.budget
    );
    match metrics.best_post {
        Some(best) => {
            let _ = writeln!(
                output,
                "- Best post: #{} with {} engagements",
                best.post_id, best.engagement
            );
        }
        None => {
            let _ = writeln!(output, "- Best post: none");
        }
    }
}

pub fn build_campaign_list(campaigns: &[CampaignSummary]) -> String {
    let mut output = String::new();

    if campaigns.is_empty() {
        let _ = writeln!(output, "No campaigns yet.");
        return output;
    }

    for campaign in campaigns {
        let _ = writeln!(
            output,
            "- #{} {} (budget {:.2}, {} posts, created {})",
            campaign.id,
            campaign.name,
            campaign.budget,
            campaign.post_count,
            campaign.created_at.format("%Y-%m-%d")
        );
    }

    output
}

pub fn build_insight_report(report: &InsightReport) -> String {
    let mut output = String::new();
    let analytics = &report.analytics;

    let _ = writeln!(output, "# Campaign Insight Report: {}", analytics.name);
    let _ = writeln!(output, "Window: {}", range_label(&report.range));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Current Period");
    write_metrics(&mut output, analytics);

    if let Some(previous) = &report.previous {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Previous Period");
        write_metrics(&mut output, previous);
    }

    if let Some(signals) = &report.signals {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Signals");
        let _ = writeln!(output, "| Signal | Change |");
        let _ = writeln!(output, "|---|---|");
        let _ = writeln!(output, "| Engagement | {:+.2}% |", signals.engagement_change_percent);
        let _ = writeln!(output, "| Posts | {:+} |", signals.post_count_change);
        let _ = writeln!(
            output,
            "| Engagement per post | {:+.2}% |",
            signals.engagement_per_post_change_percent
        );
        let _ = writeln!(output, "| Engagement rate | {:+.2} pts |", signals.engagement_rate_change);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");

    if report.signals.is_none() {
        let _ = writeln!(output, "Insights need both a start and an end date.");
    } else if report.insights.is_empty() {
        let _ = writeln!(output, "No notable changes between periods.");
    } else {
        for insight in report.insights.iter() {
            let _ = writeln!(output, "- [{}] {}", insight.kind.label(), insight.message);
        }
    }

    output
}

pub fn build_comparison_report(result: &ComparisonResult) -> String {
    let mut output = String::new();
    let (a, b) = (&result.campaign_a, &result.campaign_b);
    let comparison = &result.comparison;

    let _ = writeln!(output, "# Campaign Comparison");
    let _ = writeln!(output, "Window: {}", range_label(&result.range));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Campaign A: {}", a.name);
    write_metrics(&mut output, a);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Campaign B: {}", b.name);
    write_metrics(&mut output, b);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Verdict");
    let _ = writeln!(
        output,
        "- Winner by engagement: {}",
        side_label(comparison.winner_by_engagement, a, b)
    );
    let _ = writeln!(
        output,
        "- Winner by engagement rate: {}",
        side_label(comparison.winner_by_engagement_rate, a, b)
    );
    match comparison.engagement_diff_percent {
        Some(diff) => {
            let _ = writeln!(output, "- Engagement difference (A vs B): {:+.2}%", diff);
        }
        None => {
            let _ = writeln!(output, "- Engagement difference (A vs B): n/a");
        }
    }

    if !comparison.notes.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Notes");
        for note in comparison.notes.iter() {
            let _ = writeln!(output, "- {}", note);
        }
    }

    output
}
