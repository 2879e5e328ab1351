use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::error::EngineError;
use crate::models::{Campaign, CampaignSummary, DateRange, PostEngagement};
use crate::store::{require_campaign, CampaignStore};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("failed to connect to Postgres")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn counter(row: &PgRow, column: &str) -> anyhow::Result<u64> {
    let value: i32 = row.try_get(column)?;
    u64::try_from(value).with_context(|| format!("negative {column} count: {value}"))
}

/// Builds the post query for a campaign. `$1` is the campaign id; the range
/// bounds that are present follow as `$2` and `$3` in from/to order.
pub fn posts_query(range: &DateRange) -> String {
    let mut query = String::from(
        "SELECT id, likes, comments, shares, saves, created_at \
         FROM campaign_insights.posts \
         WHERE campaign_id = $1",
    );
    let mut index = 1;
    if range.from.is_some() {
        index += 1;
        query.push_str(&format!(" AND created_at >= ${index}"));
    }
    if range.to.is_some() {
        index += 1;
        query.push_str(&format!(" AND created_at <= ${index}"));
    }
    query.push_str(" ORDER BY id");
    query
}

#[async_trait]
impl CampaignStore for PgStore {
    async fn find_campaign(&self, id: i64) -> anyhow::Result<Option<Campaign>> {
        let row = sqlx::query(
            "SELECT id, name, budget FROM campaign_insights.campaigns WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Campaign {
            id: row.get("id"),
            name: row.get("name"),
            budget: row.get("budget"),
        }))
    }

    async fn find_posts(
        &self,
        campaign_id: i64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<PostEngagement>> {
        let query = posts_query(range);
        let mut rows = sqlx::query(&query).bind(campaign_id);
        if let Some(from) = range.from {
            rows = rows.bind(from);
        }
        if let Some(to) = range.to {
            rows = rows.bind(to);
        }

        let records = rows.fetch_all(&self.pool).await?;
        let mut posts = Vec::with_capacity(records.len());

        for row in records {
            posts.push(PostEngagement {
                id: row.get("id"),
                likes: counter(&row, "likes")?,
                comments: counter(&row, "comments")?,
                shares: counter(&row, "shares")?,
                saves: counter(&row, "saves")?,
                created_at: row.get("created_at"),
            });
        }

        Ok(posts)
    }

    async fn list_campaigns(&self) -> anyhow::Result<Vec<CampaignSummary>> {
        let records = sqlx::query(
            r#"
            SELECT c.id, c.name, c.budget, c.created_at, COUNT(p.id) AS post_count
            FROM campaign_insights.campaigns c
            LEFT JOIN campaign_insights.posts p ON p.campaign_id = c.id
            GROUP BY c.id
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records
            .into_iter()
            .map(|row| CampaignSummary {
                id: row.get("id"),
                name: row.get("name"),
                budget: row.get("budget"),
                created_at: row.get("created_at"),
                post_count: row.get("post_count"),
            })
            .collect())
    }
}

pub async fn init_db(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

fn invalid(message: impl Into<String>) -> EngineError {
    EngineError::Validation(message.into())
}

/// A campaign as accepted for creation: a non-empty name and a budget above
/// zero.
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub name: String,
    pub budget: f64,
}

impl NewCampaign {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.name.trim().is_empty() {
            return Err(invalid("campaign name is required"));
        }
        if !(self.budget.is_finite() && self.budget > 0.0) {
            return Err(invalid("budget must be greater than 0"));
        }
        Ok(())
    }
}

/// A post as accepted for insertion. Counters may be zero; platform and
/// content must be non-empty.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub platform: String,
    pub content: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub saves: i64,
    pub created_at: DateTime<Utc>,
    pub source_key: Option<String>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), EngineError> {
        for (field, value) in [
            ("likes", self.likes),
            ("comments", self.comments),
            ("shares", self.shares),
            ("saves", self.saves),
        ] {
            if value < 0 {
                return Err(invalid(format!("{field} must be 0 or greater")));
            }
            if value > i64::from(i32::MAX) {
                return Err(invalid(format!("{field} is too large")));
            }
        }
        if self.platform.trim().is_empty() {
            return Err(invalid("platform is required"));
        }
        if self.content.trim().is_empty() {
            return Err(invalid("content is required"));
        }
        Ok(())
    }
}

/// One CSV line: the owning campaign followed by the post itself.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ImportRow {
    pub campaign_name: String,
    pub budget: f64,
    pub platform: String,
    pub content: String,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub saves: i64,
    pub created_at: DateTime<Utc>,
    pub source_key: Option<String>,
}

impl ImportRow {
    pub fn into_parts(self) -> Result<(NewCampaign, NewPost), EngineError> {
        let campaign = NewCampaign {
            name: self.campaign_name,
            budget: self.budget,
        };
        let post = NewPost {
            platform: self.platform,
            content: self.content,
            likes: self.likes,
            comments: self.comments,
            shares: self.shares,
            saves: self.saves,
            created_at: self.created_at,
            source_key: self.source_key,
        };
        campaign.validate()?;
        post.validate()?;
        Ok((campaign, post))
    }
}

pub async fn create_campaign(pool: &PgPool, campaign: &NewCampaign) -> Result<Campaign, EngineError> {
    campaign.validate()?;

    let row = sqlx::query(
        r#"
        INSERT INTO campaign_insights.campaigns (name, budget)
        VALUES ($1, $2)
        RETURNING id, name, budget
        "#,
    )
    .bind(campaign.name.trim())
    .bind(campaign.budget)
    .fetch_one(pool)
    .await
    .with_context(|| format!("failed to create campaign {}", campaign.name.trim()))?;

    info!(campaign_id = row.get::<i64, _>("id"), "created campaign");
    Ok(Campaign {
        id: row.get("id"),
        name: row.get("name"),
        budget: row.get("budget"),
    })
}

async fn upsert_campaign(pool: &PgPool, campaign: &NewCampaign) -> anyhow::Result<i64> {
    let id: i64 = sqlx::query(
        r#"
        INSERT INTO campaign_insights.campaigns (name, budget)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET budget = EXCLUDED.budget
        RETURNING id
        "#,
    )
    .bind(campaign.name.trim())
    .bind(campaign.budget)
    .fetch_one(pool)
    .await?
    .get("id");
    Ok(id)
}

/// Inserts the post, returning its id, or `None` when its source key was
/// already present.
async fn insert_post(pool: &PgPool, campaign_id: i64, post: &NewPost) -> anyhow::Result<Option<i64>> {
    let source_key = post
        .source_key
        .clone()
        .unwrap_or_else(|| format!("import-{}", Uuid::new_v4()));

    let row = sqlx::query(
        r#"
        INSERT INTO campaign_insights.posts
        (campaign_id, platform, content, likes, comments, shares, saves, created_at, source_key)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        ON CONFLICT (source_key) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(campaign_id)
    .bind(&post.platform)
    .bind(&post.content)
    .bind(post.likes as i32)
    .bind(post.comments as i32)
    .bind(post.shares as i32)
    .bind(post.saves as i32)
    .bind(post.created_at)
    .bind(source_key)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| row.get("id")))
}

/// Adds a post to an existing campaign by id.
pub async fn insert_post_for(
    store: &PgStore,
    campaign_id: i64,
    post: &NewPost,
) -> Result<i64, EngineError> {
    post.validate()?;
    require_campaign(store, campaign_id).await?;

    let post_id = insert_post(store.pool(), campaign_id, post)
        .await?
        .ok_or_else(|| invalid("a post with this source key already exists"))?;
    info!(campaign_id, post_id, "added post");
    Ok(post_id)
}

pub async fn seed(pool: &PgPool) -> anyhow::Result<()> {
    let day = |d: u32| {
        Utc.with_ymd_and_hms(2026, 2, d, 15, 0, 0)
            .single()
            .context("invalid seed date")
    };

    let posts = vec![
        ("Spring Launch", 1200.0, "instagram", "Teaser reel", [140, 22, 18, 30], 2, "seed-001"),
        ("Spring Launch", 1200.0, "tiktok", "Behind the scenes", [210, 35, 40, 12], 5, "seed-002"),
        ("Spring Launch", 1200.0, "instagram", "Launch day carousel", [320, 48, 27, 61], 9, "seed-003"),
        ("Spring Launch", 1200.0, "linkedin", "Founder note", [95, 14, 9, 4], 12, "seed-004"),
        ("Loyalty Push", 800.0, "instagram", "Member perks", [80, 10, 6, 15], 3, "seed-005"),
        ("Loyalty Push", 800.0, "email", "Points reminder", [40, 3, 1, 2], 10, "seed-006"),
    ];

    for (name, budget, platform, content, [likes, comments, shares, saves], d, source_key) in posts {
        let row = ImportRow {
            campaign_name: name.to_string(),
            budget,
            platform: platform.to_string(),
            content: content.to_string(),
            likes,
            comments,
            shares,
            saves,
            created_at: day(d)?,
            source_key: Some(source_key.to_string()),
        };
        let (campaign, post) = row.into_parts()?;
        let campaign_id = upsert_campaign(pool, &campaign).await?;
        insert_post(pool, campaign_id, &post).await?;
    }

    info!("seeded demo campaigns");
    Ok(())
}

pub async fn import_posts_csv(pool: &PgPool, csv_path: &std::path::Path) -> anyhow::Result<usize> {
    let mut reader = csv::Reader::from_path(csv_path)?;
    let mut inserted = 0usize;

    for (line, result) in reader.deserialize::<ImportRow>().enumerate() {
        let (campaign, post) = result?
            .into_parts()
            .with_context(|| format!("row {} of {}", line + 1, csv_path.display()))?;

        let campaign_id = upsert_campaign(pool, &campaign).await?;
        if insert_post(pool, campaign_id, &post).await?.is_some() {
            inserted += 1;
        }
    }

    Ok(inserted)
}
