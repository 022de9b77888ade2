use anyhow::{Context, Result};
use gigmatch::{
    config::{MatchConfig, PathsConfig},
    cv::{build_profile_text, extract_cv_text},
    dataset::read_clean_dataset,
    matcher::TfidfMatcher,
};
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // the CV path is the only input not taken from the environment
    let cv_path = std::env::args_os()
        .nth(1)
        .context("usage: match_cv <cv.pdf|cv.docx>")?;

    let config = MatchConfig::from_env()?;
    let paths = PathsConfig::from_env();

    let projects = read_clean_dataset(paths.clean_csv()).with_context(|| {
        format!(
            "missing {}; run `scrape` then `clean` first",
            paths.clean_csv().display()
        )
    })?;
    let profile = build_profile_text(&extract_cv_text(&cv_path)?);

    let mut matcher = TfidfMatcher::default();
    matcher.fit(&projects);
    let results = config.filter().apply(matcher.rank(&profile, config.top_k())?);

    if results.is_empty() {
        println!("No results match your filters.");
        return Ok(());
    }

    info!(matched = results.len(), "ranked projects");
    println!("{:>5}  {:<50}  {:<20}  {:<14}  {:>4}  url", "score", "title", "category", "budget", "bids");
    for r in &results {
        let title: String = r.title.chars().take(50).collect();
        let category: String = r.category.chars().take(20).collect();
        let budget: String = r.budget.chars().take(14).collect();
        println!(
            "{:>5.3}  {:<50}  {:<20}  {:<14}  {:>4}  {}",
            r.score, title, category, budget, r.bids_count, r.url
        );
    }
    Ok(())
}
