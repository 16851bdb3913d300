//! Vendor-agnostic request and result types, one submodule per capability.

use serde::{Deserialize, Serialize};

pub mod embedding;
pub mod image;
pub mod language;
pub mod moderation;
pub mod rerank;
pub mod speech;
pub mod transcription;

pub use embedding::{EmbedParams, EmbedResult};
pub use image::{GeneratedImage, ImageGenerateParams, ImageGenerateResult, ImageResponseFormat};
pub use language::{
    FinishReason, GenerateTextParams, GenerateTextResult, Message, Role, TextStream,
    TextStreamPart,
};
pub use moderation::{ModerationParams, ModerationResult, ModerationVerdict};
pub use rerank::{RerankHit, RerankParams, RerankResult};
pub use speech::{SpeechParams, SpeechResult};
pub use transcription::{TranscriptSegment, TranscriptionParams, TranscriptionResult};

/// Token accounting reported by the vendor, when it reports any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

impl Usage {
    pub fn total_tokens(&self) -> Option<u32> {
        match (self.prompt_tokens, self.completion_tokens) {
            (None, None) => None,
            (p, c) => Some(p.unwrap_or(0) + c.unwrap_or(0)),
        }
    }
}
