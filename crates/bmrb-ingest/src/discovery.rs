//! BMRB entry discovery from a search-results page
//!
//! The query grid links each hit to its summary page
//! (`.../summary/index.php?bmrbId=4020`); the numeric id is taken from those
//! hyperlinks.

use crate::client::BmrbClient;
use bmrb_common::types::RecordId;
use bmrb_common::{BmrbError, Result};
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Substring every entry summary link contains
pub const SUMMARY_LINK_MARKER: &str = "summary/index.php?bmrbId=";

/// Extract up to `limit` entry ids from search-results HTML
///
/// Ids are deduplicated and returned in ascending numeric order before the
/// limit is applied.
pub fn parse_search_results(html: &str, limit: usize) -> Result<Vec<RecordId>> {
    let document = Html::parse_document(html);
    let link_selector = Selector::parse("a[href]")
        .map_err(|e| BmrbError::parse(format!("Invalid link selector: {:?}", e)))?;
    let id_pattern = Regex::new(r"bmrbId=([0-9]+)")?;

    let mut ids = BTreeSet::new();

    for element in document.select(&link_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if !href.contains(SUMMARY_LINK_MARKER) {
            continue;
        }

        if let Some(captures) = id_pattern.captures(href) {
            let id = RecordId::new(&captures[1])?;
            debug!(bmrb_id = %id, href = %href, "Found entry link");
            ids.insert(id);
        }
    }

    Ok(ids.into_iter().take(limit).collect())
}

/// Fetch `search_url` and return the first `limit` entry ids
pub async fn discover(client: &BmrbClient, search_url: &str, limit: usize) -> Result<Vec<RecordId>> {
    info!(url = %search_url, limit, "Discovering BMRB entries");

    let html = client.fetch_text(search_url).await?;
    let ids = parse_search_results(&html, limit)?;

    info!(
        count = ids.len(),
        ids = ?ids.iter().map(RecordId::as_str).collect::<Vec<_>>(),
        "Found BMRB IDs"
    );

    Ok(ids)
}
