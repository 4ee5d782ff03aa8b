use tracing::debug;

use crate::common::domain::extract_domain;
use crate::config::AssemblerConfig;

use super::address::address_to_decimal;
use super::body::{locate_keywords, DecodedBody};
use super::generator::{EmailInputGenerator, GeneratorOptions};
use super::headers::extract_header_addresses;
use super::{AssemblyError, EmailVerifierInputs, VerifierCircuitInputs};

/// Builds verifier circuit inputs from a raw email via an input generator.
pub struct InputAssembler<G: EmailInputGenerator> {
    generator: G,
    config: AssemblerConfig,
}

impl<G: EmailInputGenerator> InputAssembler<G> {
    pub fn new(generator: G) -> Self {
        Self::with_config(generator, AssemblerConfig::default())
    }

    pub fn with_config(generator: G, config: AssemblerConfig) -> Self {
        Self { generator, config }
    }

    /// Generate base inputs for `email`, then check keywords and domains.
    pub async fn generate_verifier_circuit_inputs<S: AsRef<str>>(
        &self,
        email: &[u8],
        address: &str,
        keywords: &[S],
    ) -> Result<VerifierCircuitInputs, AssemblyError> {
        let options = GeneratorOptions {
            sha_precompute_selector: self.config.sha_precompute_selector.clone(),
        };
        let generated = self
            .generator
            .generate(email, &options)
            .await
            .map_err(|e| AssemblyError::Generator(e.to_string()))?;
        assemble(generated, address, keywords)
    }
}

/// Assemble circuit inputs from already generated base inputs.
///
/// The signing domain is read from the joined `pubkey` elements using the
/// same `@domain` extraction as the address headers.
pub fn assemble<S: AsRef<str>>(
    generated: EmailVerifierInputs,
    address: &str,
    keywords: &[S],
) -> Result<VerifierCircuitInputs, AssemblyError> {
    let body_elements = generated
        .email_body
        .as_deref()
        .ok_or(AssemblyError::MissingBody)?;
    let body = DecodedBody::from_elements(body_elements)?;

    let matches = locate_keywords(&body, keywords)?;
    let keyword_index = matches
        .iter()
        .map(|m| m.byte_index.to_string())
        .collect::<Vec<_>>()
        .join(",");
    debug!(%keyword_index, body_len = body.len(), "located keywords");

    let addrs = extract_header_addresses(generated.email_header.as_slice())?;
    let from_domain = domain_of("From", &addrs.from)?;
    let to_domain = domain_of("To", &addrs.to)?;
    let key_material = generated.pubkey.concat();
    let dkim_domain = domain_of("pubkey", &key_material)?;

    let from_domain_match = from_domain == dkim_domain;
    let to_domain_match = to_domain == dkim_domain;
    debug!(
        from_domain,
        to_domain, dkim_domain, from_domain_match, to_domain_match, "compared header domains"
    );

    let address = address_to_decimal(address)?;

    Ok(VerifierCircuitInputs {
        generated,
        keyword_index,
        from_domain_match,
        to_domain_match,
        address,
    })
}

fn domain_of<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AssemblyError> {
    extract_domain(value).ok_or_else(|| AssemblyError::MissingDomain {
        field,
        value: value.to_string(),
    })
}
