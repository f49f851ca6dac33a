//! Built-in sample data
//!
//! The last-resort data set served when neither scraping nor the store has
//! produced anything. Mirrors the fixture set of the original deployment,
//! including the zero-GMP "Nanta Tech" entry (zero premiums are valid in
//! this path even though the HTML scrape path drops them).

use chrono::NaiveDate;

use crate::types::{IpoListing, IpoStatus, MainboardStock};

fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[allow(clippy::too_many_arguments)]
fn listing(
    company_name: &str,
    symbol: &str,
    sector: &str,
    issue_price: f64,
    range: (f64, f64),
    gmp: i64,
    gmp_percent: f64,
    subscription: f64,
    status: IpoStatus,
    dates: [Option<NaiveDate>; 4],
) -> IpoListing {
    IpoListing {
        company_name: company_name.to_string(),
        symbol: Some(symbol.to_string()),
        sector: sector.to_string(),
        issue_price,
        price_range_min: range.0,
        price_range_max: range.1,
        gmp,
        gmp_percent,
        subscription,
        status,
        open_date: dates[0],
        close_date: dates[1],
        allotment_date: dates[2],
        listing_date: dates[3],
    }
}

/// The fixed fallback IPO set.
pub fn ipo_listings() -> Vec<IpoListing> {
    vec![
        listing(
            "E to F Transportation Infrastructure",
            "ETF-NSE",
            "Infrastructure",
            174.0,
            (160.0, 190.0),
            135,
            77.59,
            5.35,
            IpoStatus::Listed,
            [
                date(2025, 12, 26),
                date(2025, 12, 30),
                date(2026, 1, 2),
                date(2026, 1, 7),
            ],
        ),
        listing(
            "Dhara Rail Projects",
            "DRP-NSE",
            "Infrastructure",
            126.0,
            (100.0, 152.0),
            23,
            18.25,
            83.81,
            IpoStatus::Open,
            [
                date(2025, 12, 23),
                date(2025, 12, 26),
                date(2025, 12, 29),
                date(2026, 1, 3),
            ],
        ),
        listing(
            "Bai Kakaji Polymers",
            "BKP-BSE",
            "Manufacturing",
            186.0,
            (160.0, 210.0),
            3,
            1.61,
            4.6,
            IpoStatus::Closed,
            [
                date(2025, 12, 23),
                date(2025, 12, 26),
                date(2025, 12, 29),
                date(2026, 1, 2),
            ],
        ),
        listing(
            "Apollo Techno Industries",
            "ATI-BSE",
            "Technology",
            130.0,
            (115.0, 145.0),
            12,
            9.23,
            38.52,
            IpoStatus::Open,
            [
                date(2025, 12, 23),
                date(2025, 12, 26),
                date(2025, 12, 29),
                date(2026, 1, 3),
            ],
        ),
        listing(
            "Nanta Tech",
            "NT-BSE",
            "Technology",
            220.0,
            (200.0, 240.0),
            0,
            0.0,
            4.91,
            IpoStatus::Upcoming,
            [
                date(2025, 12, 23),
                date(2025, 12, 26),
                date(2025, 12, 29),
                date(2026, 1, 3),
            ],
        ),
    ]
}

/// The fixed fallback mainboard quote set.
pub fn mainboard_stocks() -> Vec<MainboardStock> {
    vec![
        MainboardStock {
            company_name: "Meridian Steel Works".to_string(),
            symbol: "MSW".to_string(),
            last_price: 842.5,
            change_percent: 1.34,
            volume: 1_240_500,
            pe_ratio: 18.2,
        },
        MainboardStock {
            company_name: "Coral Pharma".to_string(),
            symbol: "CRLP".to_string(),
            last_price: 312.1,
            change_percent: -0.58,
            volume: 684_200,
            pe_ratio: 27.9,
        },
        MainboardStock {
            company_name: "Trident Cables".to_string(),
            symbol: "TRDC".to_string(),
            last_price: 77.4,
            change_percent: 2.05,
            volume: 2_310_800,
            pe_ratio: 11.6,
        },
    ]
}
