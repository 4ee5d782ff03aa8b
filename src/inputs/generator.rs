use std::future::Future;

use serde::Serialize;

use super::EmailVerifierInputs;

pub type GeneratorError = Box<dyn std::error::Error + Send + Sync>;

/// Options forwarded to the input generator unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub sha_precompute_selector: String,
}

/// The external email verification input generator.
///
/// Implementations parse the DKIM signature, fetch or embed the key and
/// precompute the body SHA up to the selector.
pub trait EmailInputGenerator: Send + Sync {
    fn generate(
        &self,
        email: &[u8],
        options: &GeneratorOptions,
    ) -> impl Future<Output = Result<EmailVerifierInputs, GeneratorError>> + Send;
}
