//! Retrieval-augmented HSA question answering.
//!
//! Knowledge-base documents are split into overlapping chunks, embedded, and
//! held in an in-memory vector index. Questions are answered strictly from
//! the retrieved chunks, with citations back to the source documents and a
//! confidence estimate; questions with no relevant content receive a fixed
//! fallback instead of a speculative answer.

pub mod chunker;
pub mod domain;
pub mod index;
pub mod providers;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use chunker::DocumentChunker;
pub use domain::{
    AssistantMetrics, Citation, KnowledgeBaseDocument, KnowledgeBaseStats, KnowledgeChunk,
    QaRequest, QaResponse, VectorSearchRequest, VectorSearchResult, RETRIEVAL_K,
    RETRIEVAL_THRESHOLD,
};
pub use index::{cosine_similarity, ScoredChunk, VectorIndex};
pub use providers::{
    AnswerGenerator, EmbeddingProvider, OpenAiProvider, ProviderError, EMBEDDING_MODEL,
    RESPONSE_MODEL,
};
pub use router::assistant_router;
pub use service::{AssistantError, HsaAssistantService, FALLBACK_ANSWER, MAX_EXCERPT_CHARS};
