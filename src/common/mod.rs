//! Common infrastructure shared across key resolution and input assembly.

pub mod domain;
pub mod http;
