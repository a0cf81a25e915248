use std::fs;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::workflows::assistant::providers::{AnswerGenerator, EmbeddingProvider, ProviderError};
use crate::workflows::assistant::service::HsaAssistantService;

pub(super) const CONTRIBUTION_DOC: &str = "For 2024, the annual HSA contribution limit is \
$4,150 for self-only coverage and $8,300 for family coverage. Account holders age 55 or \
older may make an additional catch-up contribution of $1,000 per year.";

pub(super) const ELIGIBILITY_DOC: &str = "To be eligible for an HSA you must be covered \
under a qualifying high-deductible health plan and have no other disqualifying coverage. \
Medicare enrollment ends HSA eligibility going forward.";

pub(super) const CANNED_ANSWER: &str = "According to the HSA documentation, the 2024 \
contribution limit is $4,150 for self-only coverage and $8,300 for family coverage \
(contribution_limits.txt). Account holders who are 55 or older may contribute an extra \
$1,000 per year as a catch-up contribution. These limits are adjusted annually by the IRS.";

/// Deterministic embeddings keyed on topic words, so retrieval behaves
/// predictably: matching topics are parallel, unrelated text is orthogonal.
pub(super) struct StubEmbeddings;

#[async_trait]
impl EmbeddingProvider for StubEmbeddings {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let lowered = text.to_lowercase();
        if lowered.contains("contribution") {
            Ok(vec![1.0, 0.0, 0.0, 0.0])
        } else if lowered.contains("eligib") {
            Ok(vec![0.0, 1.0, 0.0, 0.0])
        } else {
            Ok(vec![0.0, 0.0, 0.0, 1.0])
        }
    }
}

pub(super) struct StubGenerator;

#[async_trait]
impl AnswerGenerator for StubGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, ProviderError> {
        Ok(CANNED_ANSWER.to_string())
    }
}

pub(super) struct FailingEmbeddings;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddings {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            message: "embedding backend down".to_string(),
        })
    }
}

pub(super) struct FailingGenerator;

#[async_trait]
impl AnswerGenerator for FailingGenerator {
    async fn generate(
        &self,
        _system_prompt: &str,
        _user_prompt: &str,
    ) -> Result<String, ProviderError> {
        Err(ProviderError::Api {
            status: 500,
            message: "chat backend down".to_string(),
        })
    }
}

pub(super) fn stub_service() -> HsaAssistantService<StubEmbeddings, StubGenerator> {
    HsaAssistantService::new(Arc::new(StubEmbeddings), Arc::new(StubGenerator))
}

static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Fresh directory under the system temp dir, unique per test invocation.
pub(super) fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "hsa_kb_{}_{}",
        std::process::id(),
        DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
    ));
    fs::create_dir_all(&dir).expect("scratch dir creates");
    dir
}

pub(super) fn knowledge_base_dir(documents: &[(&str, &str)]) -> PathBuf {
    let dir = scratch_dir();
    for (name, content) in documents {
        fs::write(dir.join(name), content).expect("document writes");
    }
    dir
}
