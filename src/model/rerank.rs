use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use super::Usage;

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RerankParams {
    pub query: String,
    pub documents: Vec<String>,
    pub top_n: Option<u32>,
    pub return_documents: Option<bool>,
}

/// A scored document. `index` points into the request's `documents`.
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankHit {
    pub index: usize,
    pub relevance_score: f64,
    pub document: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub results: Vec<RerankHit>,
    pub usage: Option<Usage>,
}
