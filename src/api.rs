//! Vendor wire protocols.
//!
//! Each submodule speaks one vendor dialect and implements the capability
//! traits for it. Adapters in [`crate::providers`] decide which vendor uses
//! which dialect.

pub mod anthropic;
pub mod gemini;
pub mod openai;
