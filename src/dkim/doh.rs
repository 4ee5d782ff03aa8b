use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::common::http::HttpClient;

use super::SourceOutcome;

/// DNS record type code for TXT.
pub const TXT_RECORD_TYPE: u16 = 16;

/// JSON body of a DNS-over-HTTPS answer (`application/dns-json`).
#[derive(Debug, Clone, Deserialize)]
pub struct DohResponse {
    #[serde(rename = "Status")]
    pub status: u32,
    #[serde(rename = "Answer", default)]
    pub answer: Vec<DohAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DohAnswer {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: u16,
    #[serde(rename = "TTL", default)]
    pub ttl: u32,
    pub data: String,
}

impl DohResponse {
    /// Data of the first TXT answer, if the query succeeded.
    pub fn first_txt(&self) -> Option<&DohAnswer> {
        if self.status != 0 {
            return None;
        }
        self.answer
            .iter()
            .find(|ans| ans.record_type == TXT_RECORD_TYPE)
    }
}

/// Query one DoH provider for the TXT record at `name`.
///
/// Never errors: a bad status or undecodable body is `Failed`, a negative
/// or empty answer is `NoAnswer`.
pub async fn query_txt<C: HttpClient>(client: &C, endpoint: &Url, name: &str) -> SourceOutcome {
    let mut url = endpoint.clone();
    url.query_pairs_mut()
        .append_pair("name", name)
        .append_pair("type", &TXT_RECORD_TYPE.to_string());

    let response = match client.get(&url, &[("accept", "application/dns-json")]).await {
        Ok(r) => r,
        Err(e) => return SourceOutcome::Failed(e.to_string()),
    };
    if !response.is_success() {
        return SourceOutcome::Failed(format!("HTTP status {}", response.status));
    }

    let doh: DohResponse = match response.json() {
        Ok(d) => d,
        Err(e) => return SourceOutcome::Failed(e.to_string()),
    };

    match doh.first_txt() {
        Some(answer) => {
            debug!(name = %answer.name, ttl = answer.ttl, "DoH TXT answer");
            SourceOutcome::Found(answer.data.clone())
        }
        None => {
            debug!(status = doh.status, answers = doh.answer.len(), "DoH returned no TXT answer");
            SourceOutcome::NoAnswer
        }
    }
}
