use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of chunks retrieved per question.
pub const RETRIEVAL_K: usize = 5;
/// Minimum cosine similarity for a chunk to count as a hit.
pub const RETRIEVAL_THRESHOLD: f32 = 0.7;

/// Bounded, independently embeddable unit of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeChunk {
    pub id: String,
    pub document: String,
    pub chunk_index: usize,
    pub text: String,
    pub char_count: usize,
}

/// Pointer from a generated answer back to the source text supporting it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub document_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    pub excerpt: String,
    pub relevance_score: f32,
}

/// Incoming question, optionally with follow-up context from the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaRequest {
    pub question: String,
    #[serde(default)]
    pub context: Option<String>,
}

/// Answer with citations, confidence, and processing latency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QaResponse {
    pub answer: String,
    pub confidence_score: f32,
    pub citations: Vec<Citation>,
    pub source_documents: Vec<String>,
    pub processing_time_ms: u64,
    pub answered_at: DateTime<Utc>,
}

/// Raw similarity-search request against the knowledge base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchRequest {
    pub query: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default)]
    pub filter_documents: Option<Vec<String>>,
}

fn default_k() -> usize {
    RETRIEVAL_K
}

fn default_threshold() -> f32 {
    RETRIEVAL_THRESHOLD
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorSearchResult {
    pub chunk_id: String,
    pub document_name: String,
    pub text: String,
    pub similarity_score: f32,
}

/// Catalog entry for one indexed source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseDocument {
    pub name: String,
    pub title: String,
    pub content_length: usize,
    pub chunk_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeBaseStats {
    pub total_documents: usize,
    pub total_chunks: usize,
    pub average_chunk_size: f32,
}

/// Aggregate view of the assistant's query history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantMetrics {
    pub total_queries: u64,
    pub average_response_time_ms: f64,
    pub average_confidence_score: f32,
    pub citation_rate: f32,
}
