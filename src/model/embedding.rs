use serde::{Deserialize, Serialize};

use super::Usage;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedParams {
    pub values: Vec<String>,
    /// Output dimensionality, for models that can truncate.
    pub dimensions: Option<u32>,
}

/// One vector per input value, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbedResult {
    pub embeddings: Vec<Vec<f32>>,
    pub usage: Usage,
}
