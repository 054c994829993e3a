pub mod analytics;
pub mod ingestion;
