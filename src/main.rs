use gigmatch::config::{MatchConfig, PathsConfig, ScrapeConfig};

fn main() {
    let scrape = ScrapeConfig::from_env().expect("Failed to load scrape configuration");
    let matching = MatchConfig::from_env().expect("Failed to load match configuration");
    println!("scrape: {:?}", scrape);
    println!("paths: {:?}", PathsConfig::from_env());
    println!("match: {:?}", matching);
}
