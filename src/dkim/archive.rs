use serde::Deserialize;
use tracing::debug;
use url::Url;

use crate::common::http::HttpClient;

use super::SourceOutcome;

/// One entry of the key archive's `?domain=` listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveRecord {
    pub selector: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Look up `selector` among the archived keys of `domain`.
///
/// The archive is queried by bare domain; the selector is matched here.
pub async fn query_key<C: HttpClient>(
    client: &C,
    endpoint: &Url,
    domain: &str,
    selector: &str,
) -> SourceOutcome {
    let mut url = endpoint.clone();
    url.query_pairs_mut().append_pair("domain", domain);

    let response = match client.get(&url, &[]).await {
        Ok(r) => r,
        Err(e) => return SourceOutcome::Failed(e.to_string()),
    };
    if !response.is_success() {
        return SourceOutcome::Failed(format!(
            "archive call failed with status={}",
            response.status
        ));
    }

    let records: Vec<ArchiveRecord> = match response.json() {
        Ok(r) => r,
        Err(e) => return SourceOutcome::Failed(e.to_string()),
    };
    debug!(domain, records = records.len(), "archive listing received");

    match records.into_iter().find(|r| r.selector == selector) {
        Some(record) => SourceOutcome::Found(record.value.unwrap_or_default()),
        None => SourceOutcome::NoAnswer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::http::{HttpError, MockHttpClient};
    use serde_json::json;

    const ENDPOINT: &str = "https://archive.test/api/key";

    fn endpoint() -> Url {
        Url::parse(ENDPOINT).unwrap()
    }

    #[tokio::test]
    async fn queries_by_bare_domain() {
        let client = MockHttpClient::new();
        client.add_json(ENDPOINT, 200, &json!([]));

        query_key(&client, &endpoint(), "example.com", "s1").await;

        let requests = client.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].query("domain").as_deref(), Some("example.com"));
        assert_eq!(requests[0].query("name"), None);
    }

    #[tokio::test]
    async fn selects_record_by_selector() {
        let client = MockHttpClient::new();
        client.add_json(
            ENDPOINT,
            200,
            &json!([
                {"selector": "old", "value": "v=DKIM1; p=OLD", "firstSeenAt": "2022-01-01"},
                {"selector": "s1", "value": "v=DKIM1; p=WANTED", "lastSeenAt": "2024-01-01"}
            ]),
        );

        let outcome = query_key(&client, &endpoint(), "example.com", "s1").await;
        assert_eq!(outcome, SourceOutcome::Found("v=DKIM1; p=WANTED".to_string()));
    }

    #[tokio::test]
    async fn selector_miss_is_no_answer() {
        let client = MockHttpClient::new();
        client.add_json(
            ENDPOINT,
            200,
            &json!([{"selector": "other", "value": "v=DKIM1; p=X"}]),
        );
        let outcome = query_key(&client, &endpoint(), "example.com", "s1").await;
        assert_eq!(outcome, SourceOutcome::NoAnswer);
    }

    #[tokio::test]
    async fn selector_match_is_case_sensitive() {
        let client = MockHttpClient::new();
        client.add_json(ENDPOINT, 200, &json!([{"selector": "S1", "value": "p=X"}]));
        let outcome = query_key(&client, &endpoint(), "example.com", "s1").await;
        assert_eq!(outcome, SourceOutcome::NoAnswer);
    }

    #[tokio::test]
    async fn http_failure_is_failed() {
        let client = MockHttpClient::new();
        client.add_response(ENDPOINT, 500, "");
        let outcome = query_key(&client, &endpoint(), "example.com", "s1").await;
        assert_eq!(
            outcome,
            SourceOutcome::Failed("archive call failed with status=500".to_string())
        );
    }

    #[tokio::test]
    async fn transport_failure_is_failed() {
        let client = MockHttpClient::new();
        client.set_error(ENDPOINT, HttpError::Timeout);
        let outcome = query_key(&client, &endpoint(), "example.com", "s1").await;
        assert_eq!(outcome, SourceOutcome::Failed("timeout".to_string()));
    }
}
