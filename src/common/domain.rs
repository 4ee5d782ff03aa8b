use std::sync::LazyLock;

use regex::Regex;

static DOMAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([a-zA-Z0-9.-]+)").expect("valid domain regex"));

/// Extract the domain following the first `@` in `s`.
///
/// Only `[A-Za-z0-9.-]` characters are taken, so a trailing `>` or `;` ends
/// the domain. No case folding or trailing-dot stripping is applied: the
/// result is compared byte-for-byte downstream.
pub fn extract_domain(s: &str) -> Option<&str> {
    DOMAIN_RE
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// DNS name holding the DKIM key for `selector` at `domain`.
pub fn dkim_record_name(selector: &str, domain: &str) -> String {
    format!("{}._domainkey.{}", selector, domain)
}
