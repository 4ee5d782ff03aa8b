/// Parse tag=value pairs from a DKIM key record string.
/// Handles folded values (CRLF+WSP) and whitespace around tags/values.
pub fn parse_tag_list(input: &str) -> Vec<(String, String)> {
    let unfolded = unfold(input);

    let mut tags = Vec::new();
    for part in unfolded.split(';') {
        let trimmed = part.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some((name, value)) = trimmed.split_once('=') {
            tags.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    tags
}

/// Unfold: remove CRLF followed by whitespace.
fn unfold(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' && chars.peek() == Some(&'\n') {
            let mut rest = chars.clone();
            rest.next();
            if matches!(rest.peek(), Some(' ') | Some('\t')) {
                chars = rest;
                continue;
            }
        }
        result.push(c);
    }
    result
}

/// Normalize a TXT value as returned in DoH JSON.
///
/// Multi-string records arrive as `"part one" "part two"`; the parts are
/// concatenated, then every remaining quote character is dropped.
pub fn normalize_txt(data: &str) -> String {
    data.replace("\" \"", "").replace('"', "")
}

/// Extract the base64 `p=` payload from a DKIM key record.
///
/// Returns `None` when the tag is absent or empty. Whitespace inside the
/// value is removed; it is not significant in base64.
pub fn extract_public_key(record: &str) -> Option<String> {
    let tags = parse_tag_list(record);
    let (_, value) = tags.iter().find(|(name, _)| name == "p")?;
    let cleaned: String = value.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_simple_p() {
        assert_eq!(
            extract_public_key("v=DKIM1; p=ABCD1234").as_deref(),
            Some("ABCD1234")
        );
    }

    #[test]
    fn extract_p_between_tags() {
        assert_eq!(
            extract_public_key("v=DKIM1; k=rsa; p=MIGf+/== ; t=y").as_deref(),
            Some("MIGf+/==")
        );
    }

    #[test]
    fn extract_p_without_trailing_semicolon_trims() {
        assert_eq!(extract_public_key("k=rsa;p=  QUJD  ").as_deref(), Some("QUJD"));
    }

    #[test]
    fn version_only_has_no_key() {
        assert_eq!(extract_public_key("v=DKIM1"), None);
    }

    #[test]
    fn empty_p_has_no_key() {
        // Revoked key
        assert_eq!(extract_public_key("v=DKIM1; p="), None);
    }

    #[test]
    fn similar_tag_name_is_not_p() {
        assert_eq!(extract_public_key("v=DKIM1; hp=XYZ"), None);
    }

    #[test]
    fn first_p_tag_wins() {
        assert_eq!(extract_public_key("p=FIRST; p=SECOND").as_deref(), Some("FIRST"));
    }

    #[test]
    fn folded_value_is_unfolded() {
        assert_eq!(
            extract_public_key("v=DKIM1; p=ABCD\r\n EFGH").as_deref(),
            Some("ABCDEFGH")
        );
    }

    #[test]
    fn normalize_strips_enclosing_quotes() {
        assert_eq!(normalize_txt("\"v=DKIM1; p=ABCD\""), "v=DKIM1; p=ABCD");
    }

    #[test]
    fn normalize_joins_multi_string_records() {
        assert_eq!(
            normalize_txt("\"v=DKIM1; k=rsa; p=MIIBIj\" \"ANBgkq\""),
            "v=DKIM1; k=rsa; p=MIIBIjANBgkq"
        );
    }

    #[test]
    fn normalize_unquoted_is_unchanged() {
        assert_eq!(normalize_txt("v=DKIM1; p=ABCD"), "v=DKIM1; p=ABCD");
    }

    #[test]
    fn parse_tag_list_skips_empty_and_valueless_parts() {
        let tags = parse_tag_list(" v=DKIM1 ;; junk ; p=AB ");
        assert_eq!(
            tags,
            vec![
                ("v".to_string(), "DKIM1".to_string()),
                ("p".to_string(), "AB".to_string()),
            ]
        );
    }
}
