use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use campaign_insights::config::Config;
use campaign_insights::db::{self, NewCampaign, NewPost, PgStore};
use campaign_insights::models::DateRange;
use campaign_insights::report;
use campaign_insights::store::{self, CampaignStore};

#[derive(Parser)]
#[command(name = "campaign-insights")]
#[command(about = "Campaign engagement analytics and insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Window {
    /// Start of the window, YYYY-MM-DD or RFC 3339 (inclusive)
    #[arg(long, value_parser = parse_timestamp)]
    from: Option<DateTime<Utc>>,
    /// End of the window, YYYY-MM-DD or RFC 3339 (inclusive)
    #[arg(long, value_parser = parse_timestamp)]
    to: Option<DateTime<Utc>>,
}

impl Window {
    fn range(&self) -> DateRange {
        DateRange::new(self.from, self.to)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    InitDb,
    /// Load demo campaigns and posts
    Seed,
    /// Import posts from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
    /// Create a campaign
    CreateCampaign {
        #[arg(long)]
        name: String,
        #[arg(long)]
        budget: f64,
    },
    /// Add a post to an existing campaign
    AddPost {
        #[arg(long)]
        campaign: i64,
        #[arg(long)]
        platform: String,
        #[arg(long)]
        content: String,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        likes: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        comments: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        shares: i64,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        saves: i64,
        /// When the post went out, YYYY-MM-DD or RFC 3339 (defaults to now)
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,
    },
    /// List campaigns with their post counts
    List,
    /// Aggregate engagement metrics for one campaign
    Analytics {
        #[arg(long)]
        campaign: i64,
        #[command(flatten)]
        window: Window,
        #[arg(long)]
        json: bool,
    },
    /// Compare a window against the preceding one and print insights
    Insights {
        #[arg(long)]
        campaign: i64,
        #[command(flatten)]
        window: Window,
        #[arg(long)]
        json: bool,
    },
    /// Compare two campaigns over the same window
    Compare {
        #[arg(long)]
        campaign_a: i64,
        #[arg(long)]
        campaign_b: i64,
        #[command(flatten)]
        window: Window,
        #[arg(long)]
        json: bool,
    },
    /// Generate a markdown insight report
    Report {
        #[arg(long)]
        campaign: i64,
        #[arg(long, value_parser = parse_timestamp)]
        from: DateTime<Utc>,
        #[arg(long, value_parser = parse_timestamp)]
        to: DateTime<Utc>,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }
    DateTime::parse_from_rfc3339(value)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|_| format!("invalid date `{value}`, expected YYYY-MM-DD or RFC 3339"))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pg = PgStore::connect(&config).await?;

    match cli.command {
        Commands::InitDb => {
            db::init_db(pg.pool()).await?;
            println!("Schema ready.");
        }
        Commands::Seed => {
            db::seed(pg.pool()).await?;
            println!("Seed data inserted.");
        }
        Commands::Import { csv } => {
            let inserted = db::import_posts_csv(pg.pool(), &csv).await?;
            println!("Inserted {inserted} posts from {}.", csv.display());
        }
        Commands::CreateCampaign { name, budget } => {
            let campaign = db::create_campaign(pg.pool(), &NewCampaign { name, budget }).await?;
            println!("Created campaign #{} {}.", campaign.id, campaign.name);
        }
        Commands::AddPost {
            campaign,
            platform,
            content,
            likes,
            comments,
            shares,
            saves,
            at,
        } => {
            let post = NewPost {
                platform,
                content,
                likes,
                comments,
                shares,
                saves,
                created_at: at.unwrap_or_else(Utc::now),
                source_key: None,
            };
            let post_id = db::insert_post_for(&pg, campaign, &post).await?;
            println!("Added post #{post_id} to campaign #{campaign}.");
        }
        Commands::List => {
            let campaigns = pg.list_campaigns().await?;
            print!("{}", report::build_campaign_list(&campaigns));
        }
        Commands::Analytics {
            campaign,
            window,
            json,
        } => {
            let range = window.range();
            range.validate()?;
            let metrics = store::analyze_campaign(&pg, campaign, &range).await?;

            if json {
                return print_json(&metrics);
            }
            println!(
                "{}: {} posts, {} engagements, rate {:.2}%",
                metrics.name, metrics.post_count, metrics.total_engagement, metrics.engagement_rate
            );
            if let Some(best) = metrics.best_post {
                println!("Best post #{} with {} engagements", best.post_id, best.engagement);
            }
        }
        Commands::Insights {
            campaign,
            window,
            json,
        } => {
            let report = store::insight_report(&pg, campaign, &window.range()).await?;

            if json {
                return print_json(&report);
            }
            if report.signals.is_none() {
                println!("Pass both --from and --to to compare against the previous period.");
                return Ok(());
            }
            if report.insights.is_empty() {
                println!("No notable changes between periods.");
            }
            for insight in report.insights.iter() {
                println!("[{}] {}", insight.kind.label(), insight.message);
            }
        }
        Commands::Compare {
            campaign_a,
            campaign_b,
            window,
            json,
        } => {
            let result =
                store::compare_campaigns(&pg, campaign_a, campaign_b, &window.range()).await?;

            if json {
                return print_json(&result);
            }
            print!("{}", report::build_comparison_report(&result));
        }
        Commands::Report {
            campaign,
            from,
            to,
            out,
        } => {
            let range = DateRange::new(Some(from), Some(to));
            let insight_report = store::insight_report(&pg, campaign, &range).await?;
            std::fs::write(&out, report::build_insight_report(&insight_report))
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!(campaign, insights = insight_report.insights.len(), "report generated");
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
