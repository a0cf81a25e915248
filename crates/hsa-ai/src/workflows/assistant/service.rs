use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Instant;

use chrono::Utc;
use tracing::info;

use super::chunker::DocumentChunker;
use super::domain::{
    AssistantMetrics, Citation, KnowledgeBaseDocument, KnowledgeBaseStats, QaRequest, QaResponse,
    VectorSearchRequest, VectorSearchResult, RETRIEVAL_K, RETRIEVAL_THRESHOLD,
};
use super::index::{ScoredChunk, VectorIndex};
use super::providers::{AnswerGenerator, EmbeddingProvider, ProviderError};

/// Maximum excerpt length carried by a citation.
pub const MAX_EXCERPT_CHARS: usize = 500;

/// Returned when retrieval produces no hits; the assistant never answers
/// from outside the knowledge base.
pub const FALLBACK_ANSWER: &str = "I don't have information about that in my HSA knowledge base. \
    Please rephrase your question or ask about HSA eligibility, contribution limits, qualified \
    expenses, or account management.";

const SYSTEM_PROMPT: &str = "You are an expert HSA (Health Savings Account) advisor. Answer \
questions based ONLY on the provided context from official HSA documentation.

IMPORTANT REQUIREMENTS:
1. Base your answer exclusively on the provided context
2. Include specific citations in your response by referencing the source documents
3. If the context doesn't contain sufficient information to answer the question, clearly state this
4. Provide accurate, helpful information about HSA rules, limits, and eligibility
5. Use clear, professional language appropriate for applicants and administrators
6. When mentioning specific numbers, dates, or limits, cite the source document

Format your response to be informative and well-structured with proper citations.";

/// Error raised by the assistant pipeline. Infrastructure failures surface
/// as typed errors; an unanswerable question is not an error (it yields the
/// zero-confidence fallback response).
#[derive(Debug, thiserror::Error)]
pub enum AssistantError {
    #[error("knowledge base error: {0}")]
    KnowledgeBase(String),
    #[error("embedding generation failed: {0}")]
    Embedding(#[source] ProviderError),
    #[error("response generation failed: {0}")]
    Generation(#[source] ProviderError),
    #[error("knowledge base io error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Default)]
struct QueryStats {
    query_count: u64,
    total_response_time_ms: u64,
    confidence_scores: Vec<f32>,
}

/// Retrieval-augmented Q&A over the HSA knowledge base: embeds the question,
/// retrieves the most similar chunks, and generates an answer with citations
/// and a confidence estimate.
pub struct HsaAssistantService<E, G> {
    embeddings: Arc<E>,
    generator: Arc<G>,
    chunker: DocumentChunker,
    index: RwLock<VectorIndex>,
    catalog: RwLock<BTreeMap<String, KnowledgeBaseDocument>>,
    queries: Mutex<QueryStats>,
}

impl<E, G> HsaAssistantService<E, G>
where
    E: EmbeddingProvider,
    G: AnswerGenerator,
{
    pub fn new(embeddings: Arc<E>, generator: Arc<G>) -> Self {
        Self::with_chunker(embeddings, generator, DocumentChunker::default())
    }

    pub fn with_chunker(embeddings: Arc<E>, generator: Arc<G>, chunker: DocumentChunker) -> Self {
        Self {
            embeddings,
            generator,
            chunker,
            index: RwLock::new(VectorIndex::new()),
            catalog: RwLock::new(BTreeMap::new()),
            queries: Mutex::new(QueryStats::default()),
        }
    }

    /// Chunk and embed every `.txt` document under `dir`, then swap the new
    /// index in wholesale so concurrent searches never see a partial build.
    pub async fn build_knowledge_base(
        &self,
        dir: &Path,
    ) -> Result<KnowledgeBaseStats, AssistantError> {
        if !dir.is_dir() {
            return Err(AssistantError::KnowledgeBase(format!(
                "knowledge base path does not exist: {}",
                dir.display()
            )));
        }

        let mut documents: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "txt"))
            .collect();
        documents.sort();

        if documents.is_empty() {
            return Err(AssistantError::KnowledgeBase(format!(
                "no .txt documents found in {}",
                dir.display()
            )));
        }

        let mut index = VectorIndex::new();
        let mut catalog = BTreeMap::new();

        for path in &documents {
            let content = fs::read_to_string(path)?;
            let name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            let chunks = self.chunker.chunk(&content, &name);
            for chunk in &chunks {
                let embedding = self
                    .embeddings
                    .embed(&chunk.text)
                    .await
                    .map_err(AssistantError::Embedding)?;
                index.store(chunk.clone(), embedding);
            }

            info!(document = %name, chunks = chunks.len(), "indexed knowledge base document");

            catalog.insert(
                name.clone(),
                KnowledgeBaseDocument {
                    title: name.trim_end_matches(".txt").replace('_', " "),
                    name,
                    content_length: content.chars().count(),
                    chunk_count: chunks.len(),
                },
            );
        }

        *self.index.write().expect("index lock poisoned") = index;
        *self.catalog.write().expect("catalog lock poisoned") = catalog;

        let stats = self.knowledge_base_stats();
        info!(
            documents = stats.total_documents,
            chunks = stats.total_chunks,
            "knowledge base built"
        );
        Ok(stats)
    }

    /// Answer a question from retrieved knowledge-base content only. Zero
    /// retrieval hits yield the fixed fallback with confidence 0.0.
    pub async fn answer(&self, request: &QaRequest) -> Result<QaResponse, AssistantError> {
        let started = Instant::now();

        let query_embedding = self
            .embeddings
            .embed(&request.question)
            .await
            .map_err(AssistantError::Embedding)?;

        let hits = {
            let index = self.index.read().expect("index lock poisoned");
            index.search(&query_embedding, RETRIEVAL_K, RETRIEVAL_THRESHOLD)
        };

        if hits.is_empty() {
            return Ok(QaResponse {
                answer: FALLBACK_ANSWER.to_string(),
                confidence_score: 0.0,
                citations: Vec::new(),
                source_documents: Vec::new(),
                processing_time_ms: started.elapsed().as_millis() as u64,
                answered_at: Utc::now(),
            });
        }

        let mut citations = Vec::new();
        let mut source_documents: Vec<String> = Vec::new();
        for hit in &hits {
            if !source_documents.contains(&hit.chunk.document) {
                source_documents.push(hit.chunk.document.clone());
            }
            citations.push(Citation {
                document_name: hit.chunk.document.clone(),
                page_number: None,
                excerpt: excerpt_for(&hit.chunk.text, &request.question),
                relevance_score: hit.similarity,
            });
        }

        let answer = self
            .generator
            .generate(
                SYSTEM_PROMPT,
                &user_prompt(&request.question, &hits, request.context.as_deref()),
            )
            .await
            .map_err(AssistantError::Generation)?;

        let confidence_score = confidence_for(&hits, &answer);
        let processing_time_ms = started.elapsed().as_millis() as u64;

        {
            let mut stats = self.queries.lock().expect("query stats mutex poisoned");
            stats.query_count += 1;
            stats.total_response_time_ms += processing_time_ms;
            stats.confidence_scores.push(confidence_score);
        }

        info!(
            confidence = format!("{confidence_score:.2}"),
            hits = hits.len(),
            elapsed_ms = processing_time_ms,
            "question answered"
        );

        Ok(QaResponse {
            answer,
            confidence_score,
            citations,
            source_documents,
            processing_time_ms,
            answered_at: Utc::now(),
        })
    }

    /// Raw similarity search, optionally filtered to specific documents.
    pub async fn vector_search(
        &self,
        request: &VectorSearchRequest,
    ) -> Result<Vec<VectorSearchResult>, AssistantError> {
        let embedding = self
            .embeddings
            .embed(&request.query)
            .await
            .map_err(AssistantError::Embedding)?;

        let hits = {
            let index = self.index.read().expect("index lock poisoned");
            index.search(&embedding, request.k, request.threshold)
        };

        Ok(hits
            .into_iter()
            .filter(|hit| match &request.filter_documents {
                Some(filter) => filter.contains(&hit.chunk.document),
                None => true,
            })
            .map(|hit| VectorSearchResult {
                chunk_id: hit.chunk.id,
                document_name: hit.chunk.document,
                text: hit.chunk.text,
                similarity_score: hit.similarity,
            })
            .collect())
    }

    pub fn knowledge_base_stats(&self) -> KnowledgeBaseStats {
        let catalog = self.catalog.read().expect("catalog lock poisoned");
        let index = self.index.read().expect("index lock poisoned");

        let total_chunks = index.len();
        let average_chunk_size = if total_chunks > 0 {
            let total_chars: usize = index.chunks().map(|chunk| chunk.char_count).sum();
            total_chars as f32 / total_chunks as f32
        } else {
            0.0
        };

        KnowledgeBaseStats {
            total_documents: catalog.len(),
            total_chunks,
            average_chunk_size,
        }
    }

    pub fn metrics(&self) -> AssistantMetrics {
        let stats = self.queries.lock().expect("query stats mutex poisoned");

        let average_response_time_ms = if stats.query_count > 0 {
            stats.total_response_time_ms as f64 / stats.query_count as f64
        } else {
            0.0
        };
        let average_confidence_score = if stats.confidence_scores.is_empty() {
            0.0
        } else {
            stats.confidence_scores.iter().sum::<f32>() / stats.confidence_scores.len() as f32
        };
        // Citations correlate with confidence; treat confident answers as cited.
        let citation_rate = if stats.confidence_scores.is_empty() {
            0.0
        } else {
            stats
                .confidence_scores
                .iter()
                .filter(|confidence| **confidence > 0.5)
                .count() as f32
                / stats.confidence_scores.len() as f32
        };

        AssistantMetrics {
            total_queries: stats.query_count,
            average_response_time_ms,
            average_confidence_score,
            citation_rate,
        }
    }
}

/// Picks the sentence with the most question-keyword overlap, skipping very
/// short sentences, and truncates to [`MAX_EXCERPT_CHARS`]. Falls back to the
/// chunk's leading text when no sentence scores.
pub(crate) fn excerpt_for(text: &str, question: &str) -> String {
    let question_words: BTreeSet<String> = question
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mut best_sentence = "";
    let mut best_matches = 0usize;

    for sentence in text.split('.') {
        let sentence = sentence.trim();
        if sentence.chars().count() < 20 {
            continue;
        }

        let sentence_words: BTreeSet<String> = sentence
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        let matches = question_words.intersection(&sentence_words).count();

        if matches > best_matches {
            best_matches = matches;
            best_sentence = sentence;
        }
    }

    if !best_sentence.is_empty() {
        if best_sentence.chars().count() < MAX_EXCERPT_CHARS {
            format!("{best_sentence}.")
        } else {
            format!("{}...", head_chars(best_sentence, MAX_EXCERPT_CHARS - 3))
        }
    } else if text.chars().count() > MAX_EXCERPT_CHARS {
        format!("{}...", head_chars(text, MAX_EXCERPT_CHARS - 3))
    } else {
        text.to_string()
    }
}

/// Rewards strong retrieval similarity, three or more corroborating chunks,
/// and sufficiently detailed answers; clamped to [0, 1].
pub(crate) fn confidence_for(hits: &[ScoredChunk], answer: &str) -> f32 {
    if hits.is_empty() {
        return 0.0;
    }

    let avg_similarity = hits.iter().map(|hit| hit.similarity).sum::<f32>() / hits.len() as f32;
    let corroboration = (hits.len() as f32 / 3.0).min(1.0);
    let length_factor = (answer.chars().count() as f32 / 200.0).min(1.0);

    (avg_similarity * 0.6 + corroboration * 0.2 + length_factor * 0.2).min(1.0)
}

fn user_prompt(question: &str, hits: &[ScoredChunk], user_context: Option<&str>) -> String {
    let context_text = hits
        .iter()
        .map(|hit| format!("Source: {}\nContent: {}", hit.chunk.document, hit.chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n");

    let additional = match user_context {
        Some(context) => format!("Additional context: {context}\n\n"),
        None => String::new(),
    };

    format!(
        "Context from HSA documentation:\n{context_text}\n\n{additional}Question: {question}\n\n\
        Please provide a comprehensive answer based on the context above, including proper \
        citations to the source documents."
    )
}

fn head_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}
