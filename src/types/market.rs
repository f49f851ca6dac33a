//! Market data types for IPO listings and grey market premiums

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of an IPO listing.
///
/// Serialized with the labels the upstream JSON feeds use
/// ("Active" rather than "Open").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IpoStatus {
    Upcoming,
    #[serde(rename = "Active", alias = "Open")]
    Open,
    Closed,
    Listed,
}

impl IpoStatus {
    /// Parse a status filter from a query parameter, case-insensitive.
    /// Unrecognized values return `None`, which callers treat as "no filter".
    pub fn parse_filter(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upcoming" => Some(Self::Upcoming),
            "open" | "active" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            "listed" => Some(Self::Listed),
            _ => None,
        }
    }
}

/// Placeholder source-confidence tag.
///
/// Always `Medium` today; no signal feeds it. Kept on the record so the
/// wire shape is stable if scoring ever lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reliability {
    Low,
    Medium,
    High,
}

/// One instrument's grey market premium at a point in time.
///
/// At most one record per identifier survives aggregation; a later fetch
/// from any source overwrites an earlier one (last-write-wins).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmpRecord {
    /// Normalized uppercase company/symbol string (aggregation key)
    pub identifier: String,
    /// Premium in rupees; may be negative. Zero is representable here but
    /// never produced by the HTML path, which drops zero-premium rows.
    pub gmp: i64,
    pub gmp_percent: f64,
    /// Source that produced this value
    pub source_url: String,
    pub observed_at: DateTime<Utc>,
    pub reliability: Reliability,
}

/// One IPO's static/semi-static attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IpoListing {
    pub company_name: String,
    /// Unique where present; some feeds omit it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default)]
    pub sector: String,
    pub issue_price: f64,
    #[serde(default)]
    pub price_range_min: f64,
    #[serde(default)]
    pub price_range_max: f64,
    #[serde(default)]
    pub gmp: i64,
    #[serde(default)]
    pub gmp_percent: f64,
    /// Demand multiple (shares bid / shares offered)
    #[serde(default)]
    pub subscription: f64,
    pub status: IpoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allotment_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_date: Option<NaiveDate>,
}

/// Listed-company quote for the mainboard segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainboardStock {
    pub company_name: String,
    pub symbol: String,
    pub last_price: f64,
    pub change_percent: f64,
    pub volume: u64,
    #[serde(default)]
    pub pe_ratio: f64,
}

/// Per-listing GMP projection served by `GET /api/gmp`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GmpView {
    pub company_name: String,
    pub issue_price: f64,
    pub current_price: f64,
    pub gmp: i64,
    pub gmp_percent: f64,
    pub subscription: f64,
    pub expected_price: f64,
}

impl GmpView {
    /// Derive the view from a listing: current and expected price are both
    /// issue price plus premium.
    pub fn from_listing(ipo: &IpoListing) -> Self {
        let projected = ipo.issue_price + ipo.gmp as f64;
        Self {
            company_name: ipo.company_name.clone(),
            issue_price: ipo.issue_price,
            current_price: projected,
            gmp: ipo.gmp,
            gmp_percent: ipo.gmp_percent,
            subscription: ipo.subscription,
            expected_price: projected,
        }
    }
}

/// Aggregate counts and averages served by `GET /api/stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketStats {
    pub total_ipos: usize,
    pub active_ipos: usize,
    pub average_gmp: f64,
    pub average_subscription: f64,
    pub last_updated: DateTime<Utc>,
}

/// Free-text search result sets.
///
/// `sme` is reserved for an SME-board listing type that is never populated
/// anywhere in the pipeline; it is serialized as an empty array to keep the
/// wire contract of the original API.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchResults {
    pub ipos: Vec<IpoListing>,
    pub mainboard: Vec<MainboardStock>,
    pub sme: Vec<IpoListing>,
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== IpoStatus::parse_filter ==========

    #[test]
    fn test_parse_filter_known_values() {
        assert_eq!(IpoStatus::parse_filter("upcoming"), Some(IpoStatus::Upcoming));
        assert_eq!(IpoStatus::parse_filter("open"), Some(IpoStatus::Open));
        assert_eq!(IpoStatus::parse_filter("active"), Some(IpoStatus::Open));
        assert_eq!(IpoStatus::parse_filter("closed"), Some(IpoStatus::Closed));
        assert_eq!(IpoStatus::parse_filter("listed"), Some(IpoStatus::Listed));
    }

    #[test]
    fn test_parse_filter_case_insensitive() {
        assert_eq!(IpoStatus::parse_filter("LISTED"), Some(IpoStatus::Listed));
        assert_eq!(IpoStatus::parse_filter(" Active "), Some(IpoStatus::Open));
    }

    #[test]
    fn test_parse_filter_unknown_is_none() {
        assert_eq!(IpoStatus::parse_filter("pending"), None);
        assert_eq!(IpoStatus::parse_filter(""), None);
    }

    // ========== serde wire shape ==========

    #[test]
    fn test_status_serializes_as_active() {
        let json = serde_json::to_string(&IpoStatus::Open).unwrap();
        assert_eq!(json, "\"Active\"");
    }

    #[test]
    fn test_status_deserializes_open_alias() {
        let status: IpoStatus = serde_json::from_str("\"Open\"").unwrap();
        assert_eq!(status, IpoStatus::Open);
    }

    #[test]
    fn test_listing_round_trips_camel_case() {
        let raw = r#"{
            "companyName": "Dhara Rail Projects",
            "symbol": "DRP-NSE",
            "sector": "Infrastructure",
            "issuePrice": 126,
            "priceRangeMin": 100,
            "priceRangeMax": 152,
            "gmp": 23,
            "gmpPercent": 18.25,
            "subscription": 83.81,
            "status": "Active",
            "openDate": "2025-12-23",
            "closeDate": "2025-12-26"
        }"#;
        let listing: IpoListing = serde_json::from_str(raw).unwrap();
        assert_eq!(listing.company_name, "Dhara Rail Projects");
        assert_eq!(listing.symbol.as_deref(), Some("DRP-NSE"));
        assert_eq!(listing.status, IpoStatus::Open);
        assert_eq!(listing.gmp, 23);
        assert!(listing.allotment_date.is_none());

        let out = serde_json::to_value(&listing).unwrap();
        assert_eq!(out["companyName"], "Dhara Rail Projects");
        assert_eq!(out["gmpPercent"], 18.25);
        assert_eq!(out["status"], "Active");
    }

    #[test]
    fn test_listing_symbol_is_optional() {
        let raw = r#"{"companyName": "No Symbol Co", "issuePrice": 10, "status": "Upcoming"}"#;
        let listing: IpoListing = serde_json::from_str(raw).unwrap();
        assert!(listing.symbol.is_none());
        let out = serde_json::to_value(&listing).unwrap();
        assert!(out.get("symbol").is_none());
    }

    // ========== GmpView::from_listing ==========

    #[test]
    fn test_gmp_view_projects_issue_plus_premium() {
        let listing: IpoListing = serde_json::from_str(
            r#"{"companyName": "ETF", "issuePrice": 174, "gmp": 135, "gmpPercent": 77.59,
                "subscription": 5.35, "status": "Listed"}"#,
        )
        .unwrap();
        let view = GmpView::from_listing(&listing);
        assert_eq!(view.current_price, 309.0);
        assert_eq!(view.expected_price, 309.0);
        assert_eq!(view.gmp, 135);
    }

    #[test]
    fn test_gmp_view_handles_negative_premium() {
        let listing: IpoListing = serde_json::from_str(
            r#"{"companyName": "DISC", "issuePrice": 100, "gmp": -8, "status": "Closed"}"#,
        )
        .unwrap();
        let view = GmpView::from_listing(&listing);
        assert_eq!(view.current_price, 92.0);
    }
}
