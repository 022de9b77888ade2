#![no_main]

use libfuzzer_sys::fuzz_target;
use url::Url;

use gigmatch::cleaner::normalize_skills;
use gigmatch::crawler::{SelectorSet, parse_cards};
use gigmatch::dataset::RawSkills;

fuzz_target!(|data: &[u8]| {
    // Convert raw bytes to string, handling invalid UTF-8 gracefully
    let html = String::from_utf8_lossy(data).to_string();
    let page_url = Url::parse("https://www.freelancer.com/jobs/python/").unwrap();
    let selectors = SelectorSet::freelancer();

    // Card parsing and field extraction should never panic regardless of input
    for card in parse_cards(&html, &page_url, &selectors) {
        let _ = card.field(&selectors.title);
        let _ = card.field(&selectors.url);
        let _ = card.field_list(&selectors.skills);
    }
    let _ = normalize_skills(Some(&RawSkills::Text(html)));
});
