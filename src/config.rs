use anyhow::Context;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set to a Postgres instance")?;

        let max_connections = match std::env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("invalid DATABASE_MAX_CONNECTIONS: {value}"))?,
            Err(_) => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            max_connections,
        })
    }
}
