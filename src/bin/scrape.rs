use anyhow::Result;
use gigmatch::{
    config::{PathsConfig, ScrapeConfig},
    crawler::scrape_projects,
    dataset::{RawRecord, write_raw_dataset},
};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = ScrapeConfig::from_env()?;
    let paths = PathsConfig::from_env();

    let projects = scrape_projects(&config)?;
    let rows: Vec<RawRecord> = projects.into_iter().map(RawRecord::from).collect();
    write_raw_dataset(paths.raw_csv(), &rows)?;

    info!("Saved raw data to: {} ({} rows)", paths.raw_csv().display(), rows.len());
    Ok(())
}
