use anyhow::Result;
use gigmatch::{
    cleaner::clean,
    config::PathsConfig,
    dataset::{read_raw_dataset, write_clean_dataset},
};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let paths = PathsConfig::from_env();

    let raw = read_raw_dataset(paths.raw_csv())?;
    let cleaned = clean(&raw)?;
    write_clean_dataset(paths.clean_csv(), &cleaned)?;

    info!(
        "Saved cleaned data to: {} ({} rows)",
        paths.clean_csv().display(),
        cleaned.len()
    );
    Ok(())
}
