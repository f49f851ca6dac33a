//! Source descriptors and scraped-row normalization

pub mod coerce;
pub mod html;

use chrono::Utc;
use log::debug;

use crate::types::{GmpRecord, Reliability};

/// How a source's payload is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Server-rendered page; premiums live in a `<table>`
    HtmlTable,
    /// JSON API passed through unparsed
    JsonApi,
}

/// One upstream endpoint.
#[derive(Debug, Clone)]
pub struct SourceDescriptor {
    pub url: String,
    pub kind: SourceKind,
}

impl SourceDescriptor {
    pub fn html(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: SourceKind::HtmlTable,
        }
    }

    pub fn json(url: &str) -> Self {
        Self {
            url: url.to_string(),
            kind: SourceKind::JsonApi,
        }
    }
}

/// The public GMP aggregator pages scraped each cycle, in merge order.
/// Later sources overwrite earlier ones for the same identifier.
pub fn default_gmp_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::html("https://www.investorgain.com/ipo-gmp/"),
        SourceDescriptor::html("https://www.ipowatch.in/ipo-gmp/"),
        SourceDescriptor::html("https://www.bluesalt.in/ipo-gmp-live-tracking/"),
        SourceDescriptor::html("https://marketexpress.in/ipo-gmp/"),
    ]
}

/// Exchange JSON endpoints consulted for IPO calendar data.
pub fn default_ipo_api_sources() -> Vec<SourceDescriptor> {
    vec![
        SourceDescriptor::json("https://www.nseindia.com/api/ipo-calendar"),
        SourceDescriptor::json("https://www.bseindia.com/corporates/List_Scrips.aspx?page=1&expandable=4"),
    ]
}

/// Normalize one source page into GMP records.
///
/// Per-row contract: at least 3 cells; cell 0 is the identifier (trimmed,
/// uppercased), cell 1 the premium, cell 2 the percentage. Rows with an
/// empty identifier or a premium of exactly 0 are discarded.
///
/// NOTE: dropping zero-premium rows means a genuine GMP of 0 can never
/// arrive via HTML sources, even though 0 is a valid value in the sample
/// and store-backed listings. This reproduces upstream source behavior and
/// is flagged as a data-model inconsistency in DESIGN.md; do not "fix" it
/// here without a product decision.
pub fn extract_gmp_records(page: &str, source_url: &str) -> Vec<GmpRecord> {
    let observed_at = Utc::now();
    html::table_rows(page)
        .into_iter()
        .filter_map(|cells| {
            if cells.len() < 3 {
                return None;
            }
            let identifier = cells[0].trim().to_uppercase();
            let gmp = coerce::parse_premium(&cells[1]);
            let gmp_percent = coerce::parse_percent(&cells[2]);
            if identifier.is_empty() || gmp == 0 {
                debug!("skipping row {:?} from {}", cells[0], source_url);
                return None;
            }
            Some(GmpRecord {
                identifier,
                gmp,
                gmp_percent,
                source_url: source_url.to_string(),
                observed_at,
                reliability: Reliability::Medium,
            })
        })
        .collect()
}
