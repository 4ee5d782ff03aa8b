use std::time::Duration;

use url::Url;

pub const GOOGLE_DOH: &str = "https://dns.google/resolve";
pub const CLOUDFLARE_DOH: &str = "https://cloudflare-dns.com/dns-query";
pub const KEY_ARCHIVE: &str = "https://archive.prove.email/api/key";

/// Marker the input generator anchors SHA precomputation on.
pub const STRING_PRESELECTOR: &str = "email contains keywords @";

/// Endpoints and limits for [`crate::dkim::KeyResolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    pub primary_doh: Url,
    pub secondary_doh: Url,
    pub archive: Url,
    /// Upper bound on a single source attempt.
    pub attempt_timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            primary_doh: Url::parse(GOOGLE_DOH).expect("static URL"),
            secondary_doh: Url::parse(CLOUDFLARE_DOH).expect("static URL"),
            archive: Url::parse(KEY_ARCHIVE).expect("static URL"),
            attempt_timeout: Duration::from_secs(8),
        }
    }
}

impl ResolverConfig {
    pub fn with_primary_doh(mut self, url: Url) -> Self {
        self.primary_doh = url;
        self
    }

    pub fn with_secondary_doh(mut self, url: Url) -> Self {
        self.secondary_doh = url;
        self
    }

    pub fn with_archive(mut self, url: Url) -> Self {
        self.archive = url;
        self
    }

    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }
}

/// Settings for [`crate::inputs::InputAssembler`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblerConfig {
    pub sha_precompute_selector: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            sha_precompute_selector: STRING_PRESELECTOR.to_string(),
        }
    }
}
