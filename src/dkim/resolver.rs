use tracing::{debug, info, warn};

use crate::common::domain::dkim_record_name;
use crate::common::http::{HttpClient, HttpError, ReqwestClient};
use crate::config::ResolverConfig;

use super::record::{extract_public_key, normalize_txt};
use super::{archive, doh, DkimKeyRecord, KeySource, ResolveError, SourceOutcome};

/// Resolves DKIM public keys through an ordered chain of sources.
///
/// Each source gets exactly one bounded attempt. DoH failures fall through to
/// the next source; the archive is last, so its failures are returned.
pub struct KeyResolver<C: HttpClient> {
    client: C,
    config: ResolverConfig,
}

impl KeyResolver<ReqwestClient> {
    pub fn from_config(config: ResolverConfig) -> Result<Self, HttpError> {
        let client = ReqwestClient::new(config.attempt_timeout)?;
        Ok(Self::with_config(client, config))
    }
}

impl<C: HttpClient> KeyResolver<C> {
    pub fn new(client: C) -> Self {
        Self::with_config(client, ResolverConfig::default())
    }

    pub fn with_config(client: C, config: ResolverConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve the base64 `p=` payload for `selector` at `domain`.
    pub async fn resolve_public_key(
        &self,
        selector: &str,
        domain: &str,
    ) -> Result<String, ResolveError> {
        self.resolve(selector, domain)
            .await
            .map(|record| record.public_key_base64)
    }

    /// Resolve the key record, stopping at the first source with an answer.
    pub async fn resolve(&self, selector: &str, domain: &str) -> Result<DkimKeyRecord, ResolveError> {
        let name = dkim_record_name(selector, domain);

        for source in KeySource::ORDER {
            if source == KeySource::Archive {
                warn!(%name, "DNS over HTTPS failed, falling back to key archive");
            }
            match self.attempt(source, &name, selector, domain).await {
                SourceOutcome::Found(raw) => {
                    return self.finish(source, selector, domain, &raw);
                }
                SourceOutcome::NoAnswer => {
                    debug!(%name, %source, "no record");
                }
                SourceOutcome::Failed(detail) if source.is_terminal() => {
                    return Err(ResolveError::SourceUnavailable {
                        key_source: source,
                        domain: domain.to_string(),
                        detail,
                    });
                }
                SourceOutcome::Failed(detail) => {
                    warn!(%name, %source, %detail, "source failed");
                }
            }
        }

        Err(ResolveError::ResolutionExhausted {
            selector: selector.to_string(),
            domain: domain.to_string(),
        })
    }

    async fn attempt(
        &self,
        source: KeySource,
        name: &str,
        selector: &str,
        domain: &str,
    ) -> SourceOutcome {
        let timeout = self.config.attempt_timeout;
        let query = async {
            match source {
                KeySource::DohPrimary => {
                    doh::query_txt(&self.client, &self.config.primary_doh, name).await
                }
                KeySource::DohSecondary => {
                    doh::query_txt(&self.client, &self.config.secondary_doh, name).await
                }
                KeySource::Archive => {
                    archive::query_key(&self.client, &self.config.archive, domain, selector).await
                }
            }
        };
        match tokio::time::timeout(timeout, query).await {
            Ok(outcome) => outcome,
            Err(_) => SourceOutcome::Failed(format!("timed out after {:?}", timeout)),
        }
    }

    fn finish(
        &self,
        source: KeySource,
        selector: &str,
        domain: &str,
        raw: &str,
    ) -> Result<DkimKeyRecord, ResolveError> {
        let txt = normalize_txt(raw);
        let public_key = extract_public_key(&txt).ok_or_else(|| ResolveError::MalformedRecord {
            selector: selector.to_string(),
            domain: domain.to_string(),
            record: txt.clone(),
        })?;
        info!(selector, domain, %source, "resolved DKIM public key");
        Ok(DkimKeyRecord {
            selector: selector.to_string(),
            domain: domain.to_string(),
            public_key_base64: public_key,
            source,
        })
    }
}
