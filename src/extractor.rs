//! Domain extraction from hosts-format blocklists.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// Set of unique domain names. Ordered only so output is reproducible.
pub type DomainSet = BTreeSet<String>;

/// Address every appended entry is routed to.
pub const NULL_ROUTE: &str = "0.0.0.0";

/// A null-route entry at line start: `0.0.0.0 <domain>` or `127.0.0.1 <domain>`.
/// Separators are restricted to spaces and tabs so a match never spans lines.
static NULL_ROUTE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:0\.0\.0\.0|127\.0\.0\.1)[ \t]+(\S+)")
        .expect("null-route pattern is valid")
});

/// Extract the blocked domains from raw blocklist text.
///
/// Comments, blank lines and any other format are ignored; empty input
/// yields an empty set.
pub fn extract(text: &str) -> DomainSet {
    NULL_ROUTE_LINE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Format a domain as a hosts-file blocking line (without newline).
pub fn format_entry(domain: &str) -> String {
    format!("{} {}", NULL_ROUTE, domain)
}
