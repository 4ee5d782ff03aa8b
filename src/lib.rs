//! DKIM key resolution and verifier circuit input assembly for email proofs.
//!
//! [`dkim::KeyResolver`] finds a DKIM public key through DNS-over-HTTPS with
//! a fallback to the key archive. [`inputs::InputAssembler`] turns generated
//! email inputs into the record the verifier circuit consumes. The two are
//! independent and share no state.
//!
//! HTTP goes through the [`common::http::HttpClient`] trait; swap in
//! [`common::http::MockHttpClient`] for tests.

pub mod common;
pub mod config;
pub mod dkim;
pub mod inputs;

use thiserror::Error;

pub use config::{AssemblerConfig, ResolverConfig};
pub use dkim::{DkimKeyRecord, KeyResolver, KeySource, ResolveError};
pub use inputs::{AssemblyError, EmailVerifierInputs, InputAssembler, VerifierCircuitInputs};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
