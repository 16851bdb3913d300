//! # polyai - provider-agnostic AI capabilities
//!
//! One contract over many AI vendors, each exposing the subset of
//! capabilities it supports: chat, embedding, image generation, speech
//! synthesis, transcription, moderation and reranking.
//!
//! ## Architecture
//!
//! 1. **Capabilities** ([`capabilities`]) are one trait per kind of AI operation.
//! 2. **Providers** ([`providers`]) are vendor adapters. An [`AiProvider`] binds
//!    a model id to a capability client without any network I/O.
//! 3. The **registry** ([`registry`]) resolves a provider id to a live adapter,
//!    falling back to a generic OpenAI-compatible adapter for unknown ids.
//! 4. **Invocation functions** ([`generate`]) give every capability one uniform
//!    call surface.
//!
//! Errors are never retried or swallowed; every vendor failure reaches the
//! caller as a [`ClientError`].
//!
//! ## Example
//! ```no_run
//! use polyai::generate::{generate_text, GenerateTextOptions};
//! use polyai::model::Message;
//! use polyai::{ProviderRegistry, ProviderSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = ProviderRegistry::with_builtins();
//!     let provider = registry.get("openai", ProviderSettings::from_env("openai")?);
//!
//!     let model = provider
//!         .language_model("gpt-4o-mini")
//!         .ok_or("chat not supported")?;
//!
//!     let result = generate_text(GenerateTextOptions::new(
//!         model.as_ref(),
//!         vec![Message::user("Hello!")],
//!     ))
//!     .await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod capabilities;
pub mod client;
pub mod generate;
pub mod http;
pub mod model;
pub mod options;
pub mod providers;
pub mod registry;
pub mod sse;

pub use capabilities::{
    AiProvider, EmbeddingModel, ImageModel, LanguageModel, ModerationModel, RerankModel,
    SpeechModel, TranscriptionModel,
};
pub use client::ClientError;
pub use options::ProviderSettings;
pub use providers::Vendor;
pub use registry::{ProviderInfo, ProviderRegistry};
