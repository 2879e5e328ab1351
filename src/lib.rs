pub mod compare;
pub mod config;
pub mod db;
pub mod error;
pub mod insights;
pub mod metrics;
pub mod models;
pub mod report;
pub mod signals;
pub mod store;

pub use error::EngineError;
