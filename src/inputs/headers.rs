use std::sync::LazyLock;

use regex::Regex;

use super::AssemblyError;

// Display text may be empty; the address must be in angle brackets.
static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)From:\s*[^<]*<([^>]+)>").expect("valid From regex"));
static TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)To:\s*[^<]*<([^>]+)>").expect("valid To regex"));

/// Addresses taken from the first `From:` and `To:` headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderAddresses {
    pub from: String,
    pub to: String,
}

/// Join `header_lines` with `\n` and pull out the From and To addresses.
pub fn extract_header_addresses<S: AsRef<str>>(
    header_lines: &[S],
) -> Result<HeaderAddresses, AssemblyError> {
    let headers = header_lines
        .iter()
        .map(|line| line.as_ref())
        .collect::<Vec<_>>()
        .join("\n");

    let from = first_capture(&FROM_RE, &headers);
    let to = first_capture(&TO_RE, &headers);
    match (from, to) {
        (Some(from), Some(to)) => Ok(HeaderAddresses { from, to }),
        _ => Err(AssemblyError::MalformedHeaders(
            "From or To fields are missing in email headers".to_string(),
        )),
    }
}

fn first_capture(re: &Regex, haystack: &str) -> Option<String> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
