//! DKIM public key resolution: DoH primary, DoH secondary, then the key archive.

pub mod archive;
pub mod doh;
pub mod record;
mod resolver;

pub use resolver::KeyResolver;

use std::fmt;

use base64::Engine;
use serde::Serialize;
use thiserror::Error;

/// Where a resolved key came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    DohPrimary,
    DohSecondary,
    Archive,
}

impl KeySource {
    /// Sources in the order they are tried.
    pub const ORDER: [KeySource; 3] = [
        KeySource::DohPrimary,
        KeySource::DohSecondary,
        KeySource::Archive,
    ];

    /// The last source may surface a hard failure; earlier ones only fall through.
    pub fn is_terminal(&self) -> bool {
        matches!(self, KeySource::Archive)
    }
}

impl fmt::Display for KeySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeySource::DohPrimary => write!(f, "primary DoH"),
            KeySource::DohSecondary => write!(f, "secondary DoH"),
            KeySource::Archive => write!(f, "key archive"),
        }
    }
}

/// Result of asking a single source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Raw TXT value, possibly still quoted.
    Found(String),
    /// The source answered but had no record.
    NoAnswer,
    /// The source could not be reached or replied with garbage.
    Failed(String),
}

/// A resolved DKIM key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DkimKeyRecord {
    pub selector: String,
    pub domain: String,
    pub public_key_base64: String,
    pub source: KeySource,
}

impl DkimKeyRecord {
    /// Raw key bytes (SubjectPublicKeyInfo for RSA).
    pub fn decoded_key(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(&self.public_key_base64)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("no DKIM key found for {selector}._domainkey.{domain}")]
    ResolutionExhausted { selector: String, domain: String },
    #[error("no p= field found in DKIM record for {selector}._domainkey.{domain}: {record}")]
    MalformedRecord {
        selector: String,
        domain: String,
        record: String,
    },
    #[error("{key_source} unavailable for {domain}: {detail}")]
    SourceUnavailable {
        key_source: KeySource,
        domain: String,
        detail: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_ends_with_only_terminal_source() {
        let terminal: Vec<_> = KeySource::ORDER.iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![&KeySource::Archive]);
        assert_eq!(KeySource::ORDER[2], KeySource::Archive);
    }

    #[test]
    fn decoded_key_bytes() {
        let record = DkimKeyRecord {
            selector: "s1".into(),
            domain: "example.com".into(),
            public_key_base64: "AQID".into(),
            source: KeySource::DohPrimary,
        };
        assert_eq!(record.decoded_key().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = DkimKeyRecord {
            selector: "s1".into(),
            domain: "example.com".into(),
            public_key_base64: "AQID".into(),
            source: KeySource::Archive,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["publicKeyBase64"], "AQID");
        assert_eq!(value["source"], "archive");
    }

    #[test]
    fn error_messages_carry_context() {
        let err = ResolveError::ResolutionExhausted {
            selector: "s1".into(),
            domain: "example.com".into(),
        };
        assert_eq!(err.to_string(), "no DKIM key found for s1._domainkey.example.com");
    }
}
