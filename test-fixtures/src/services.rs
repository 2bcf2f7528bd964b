//! In-memory doubles for the embedding, LLM, answer-generator and community
//! collaborators.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use strand_core::errors::{EmbeddingError, LlmError, StrandResult};
use strand_core::models::{AnswerRequest, SeedCandidate, TenantId};
use strand_core::traits::{
    Completion, CompletionRequest, IAnswerGenerator, ICommunityProvider, IEmbeddingService,
    ILlmService, LlmTask,
};

use crate::lock;
use crate::text::tokens;

pub const EMBEDDING_DIMS: usize = 1024;

/// Bag-of-words embedding: each token is hashed into one dimension, then the
/// vector is L2-normalized. Texts sharing no token have cosine 0 up to
/// hash collisions.
pub fn hash_embedding(text: &str, dims: usize) -> Vec<f32> {
    let dims = dims.max(1);
    let mut vector = vec![0.0f32; dims];
    for token in tokens(text) {
        let hash = blake3::hash(token.as_bytes());
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        let slot = (u64::from_le_bytes(prefix) % dims as u64) as usize;
        vector[slot] += 1.0;
    }
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut vector {
            *x /= norm;
        }
    }
    vector
}

/// Deterministic embedder that records every text it embeds.
pub struct HashEmbedder {
    dims: usize,
    texts: Mutex<Vec<String>>,
    failing: AtomicBool,
    latency_ms: AtomicU64,
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl HashEmbedder {
    pub fn new() -> Self {
        Self {
            dims: EMBEDDING_DIMS,
            texts: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
            latency_ms: AtomicU64::new(0),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        lock(&self.texts).len()
    }

    pub fn embedded_texts(&self) -> Vec<String> {
        lock(&self.texts).clone()
    }

    /// Whether `text` was embedded, case-insensitively.
    pub fn was_embedded(&self, text: &str) -> bool {
        lock(&self.texts)
            .iter()
            .any(|t| t.eq_ignore_ascii_case(text))
    }
}

#[async_trait]
impl IEmbeddingService for HashEmbedder {
    async fn embed(&self, text: &str) -> StrandResult<Vec<f32>> {
        lock(&self.texts).push(text.to_string());
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: "hash".to_string(),
            }
            .into());
        }
        Ok(hash_embedding(text, self.dims))
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn name(&self) -> &str {
        "hash"
    }
}

#[derive(Debug, Default)]
struct Script {
    queued: VecDeque<String>,
    repeat: Option<String>,
    failing: bool,
    latency: Duration,
}

/// LLM double answering each [`LlmTask`] from a script. Unscripted tasks
/// fail with `LlmError::Unavailable`.
#[derive(Default)]
pub struct ScriptedLlm {
    scripts: Mutex<HashMap<LlmTask, Script>>,
    calls: DashMap<LlmTask, usize>,
    prompts: Mutex<Vec<(LlmTask, String)>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every `task` request with `text` once the queue is drained.
    pub fn respond(&self, task: LlmTask, text: &str) {
        lock(&self.scripts).entry(task).or_default().repeat = Some(text.to_string());
    }

    /// Answer the next `task` request with `text`.
    pub fn respond_once(&self, task: LlmTask, text: &str) {
        lock(&self.scripts)
            .entry(task)
            .or_default()
            .queued
            .push_back(text.to_string());
    }

    pub fn fail(&self, task: LlmTask) {
        lock(&self.scripts).entry(task).or_default().failing = true;
    }

    pub fn delay(&self, task: LlmTask, latency: Duration) {
        lock(&self.scripts).entry(task).or_default().latency = latency;
    }

    pub fn calls(&self, task: LlmTask) -> usize {
        self.calls.get(&task).map(|c| *c).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| *c.value()).sum()
    }

    pub fn prompts(&self, task: LlmTask) -> Vec<String> {
        lock(&self.prompts)
            .iter()
            .filter(|(t, _)| *t == task)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

#[async_trait]
impl ILlmService for ScriptedLlm {
    async fn complete(&self, request: &CompletionRequest) -> StrandResult<Completion> {
        *self.calls.entry(request.task).or_default() += 1;
        lock(&self.prompts).push((request.task, request.prompt.clone()));

        let (latency, reply) = {
            let mut scripts = lock(&self.scripts);
            match scripts.get_mut(&request.task) {
                None => (Duration::ZERO, None),
                Some(script) if script.failing => (
                    script.latency,
                    Some(Err(LlmError::CompletionFailed {
                        reason: format!("scripted {} failure", request.task),
                    })),
                ),
                Some(script) => {
                    let text = script.queued.pop_front().or_else(|| script.repeat.clone());
                    (script.latency, text.map(Ok))
                }
            }
        };

        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        match reply {
            Some(Ok(text)) => Ok(Completion { text }),
            Some(Err(e)) => Err(e.into()),
            None => Err(LlmError::Unavailable {
                provider: format!("scripted ({} not scripted)", request.task),
            }
            .into()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Answer generator that records every request it receives.
#[derive(Default)]
pub struct RecordingAnswerGenerator {
    requests: Mutex<Vec<AnswerRequest>>,
    failing: AtomicBool,
}

impl RecordingAnswerGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }

    pub fn requests(&self) -> Vec<AnswerRequest> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl IAnswerGenerator for RecordingAnswerGenerator {
    async fn generate(&self, request: &AnswerRequest) -> StrandResult<String> {
        lock(&self.requests).push(request.clone());
        if self.failing.load(Ordering::SeqCst) {
            return Err(LlmError::CompletionFailed {
                reason: "generator offline".to_string(),
            }
            .into());
        }
        Ok(format!(
            "answer to '{}' from {} passages",
            request.query,
            request.evidence.len()
        ))
    }
}

/// Community provider serving fixed candidates per tenant.
#[derive(Default)]
pub struct StaticCommunityProvider {
    seeds: DashMap<TenantId, Vec<SeedCandidate>>,
    calls: AtomicUsize,
}

impl StaticCommunityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `candidates` for requests made on behalf of `tenant`. The
    /// candidates' own tenant ids are returned untouched.
    pub fn with_seeds(self, tenant: &TenantId, candidates: Vec<SeedCandidate>) -> Self {
        self.seeds.insert(tenant.clone(), candidates);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ICommunityProvider for StaticCommunityProvider {
    async fn thematic_seeds(
        &self,
        tenant: &TenantId,
        _query: &str,
        limit: usize,
    ) -> StrandResult<Vec<SeedCandidate>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .seeds
            .get(tenant)
            .map(|s| s.iter().take(limit).cloned().collect())
            .unwrap_or_default())
    }
}
