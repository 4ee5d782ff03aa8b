//! Verifier circuit input assembly.
//!
//! The external input generator does the DKIM and SHA work and hands back
//! header lines, body bytes and key material. This module checks the
//! required keywords against the body, compares header domains with the
//! signing domain and merges the results into one record for the circuit.

mod address;
mod assemble;
mod body;
mod generator;
mod headers;

pub use address::address_to_decimal;
pub use assemble::{assemble, InputAssembler};
pub use body::{locate_keywords, DecodedBody, KeywordMatch};
pub use generator::{EmailInputGenerator, GeneratorError, GeneratorOptions};
pub use headers::{extract_header_addresses, HeaderAddresses};

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Output of the external email verification input generator.
///
/// Numeric arrays are carried as decimal strings, as the circuit tooling
/// expects them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailVerifierInputs {
    pub email_header: Vec<String>,
    pub email_header_length: String,
    pub pubkey: Vec<String>,
    pub signature: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_body: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_body_length: Option<String>,
    #[serde(
        rename = "precomputedSHA",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub precomputed_sha: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_hash_index: Option<String>,
}

/// Final record handed to the prover as external inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierCircuitInputs {
    #[serde(flatten)]
    pub generated: EmailVerifierInputs,
    /// Keyword byte offsets in input order, joined with `,`.
    pub keyword_index: String,
    pub from_domain_match: bool,
    pub to_domain_match: bool,
    /// Decimal form of the hex address.
    pub address: String,
}

impl VerifierCircuitInputs {
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write the record as pretty-printed JSON, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<(), crate::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("input generator failed: {0}")]
    Generator(String),
    #[error("generator output has no email body")]
    MissingBody,
    #[error("email body element {position} is not a byte value: {value:?}")]
    MalformedBody { position: usize, value: String },
    #[error("required keyword not found in email body: {0}")]
    MissingKeyword(String),
    #[error("keyword passed presence check but has no offset: {0}")]
    KeywordOffsetLost(String),
    #[error("{0}")]
    MalformedHeaders(String),
    #[error("no domain found in {field}: {value:?}")]
    MissingDomain { field: &'static str, value: String },
    #[error("invalid address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn sample_generated() -> EmailVerifierInputs {
        EmailVerifierInputs {
            email_header: vec!["From: a@b.c".into()],
            email_header_length: "64".into(),
            pubkey: vec!["1".into(), "2".into()],
            signature: vec!["3".into(), "4".into()],
            email_body: Some(vec!["104".into(), "105".into()]),
            email_body_length: Some("2".into()),
            precomputed_sha: Some(vec!["0".into()]),
            body_hash_index: Some("10".into()),
        }
    }

    #[test]
    fn generated_inputs_use_generator_field_names() {
        let json = serde_json::to_value(sample_generated()).unwrap();
        assert!(json.get("emailHeader").is_some());
        assert!(json.get("emailHeaderLength").is_some());
        assert!(json.get("precomputedSHA").is_some());
        assert!(json.get("bodyHashIndex").is_some());
    }

    #[test]
    fn optional_generator_fields_may_be_absent() {
        let json = r#"{
            "emailHeader": ["70"],
            "emailHeaderLength": "64",
            "pubkey": ["1"],
            "signature": ["2"]
        }"#;
        let parsed: EmailVerifierInputs = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.email_body, None);
        assert_eq!(parsed.precomputed_sha, None);

        let back = serde_json::to_value(&parsed).unwrap();
        assert!(back.get("emailBody").is_none());
    }

    #[test]
    fn circuit_inputs_flatten_passthrough_fields() {
        let inputs = VerifierCircuitInputs {
            generated: sample_generated(),
            keyword_index: "0,5".into(),
            from_domain_match: true,
            to_domain_match: false,
            address: "1".into(),
        };
        let json = serde_json::to_value(&inputs).unwrap();
        assert_eq!(json["keywordIndex"], "0,5");
        assert_eq!(json["fromDomainMatch"], true);
        assert_eq!(json["toDomainMatch"], false);
        assert_eq!(json["address"], "1");
        assert_eq!(json["emailHeaderLength"], "64");
        assert!(json.get("generated").is_none());
    }

    #[test]
    fn write_json_round_trips_through_file() {
        let inputs = VerifierCircuitInputs {
            generated: sample_generated(),
            keyword_index: "3".into(),
            from_domain_match: true,
            to_domain_match: true,
            address: "42".into(),
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inputs.json");
        inputs.write_json(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"keywordIndex\": \"3\""));
        let read: VerifierCircuitInputs = serde_json::from_str(&text).unwrap();
        assert_eq!(read, inputs);
    }
}
