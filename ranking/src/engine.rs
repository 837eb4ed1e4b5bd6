//! Ranking engine implementation.

use std::sync::Arc;
use std::time::Duration;

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use recomatch_embeddings::{Embedding, EmbeddingProvider, EmbeddingRequest, cosine_similarity};
use recomatch_store::CandidateRecord;

use crate::config::RankingConfig;
use crate::error::{RankingError, Result};
use crate::query::TaskQuery;

/// A candidate together with its similarity score for one run.
///
/// Scores carry cosine-similarity semantics and are bounded in [-1.0, 1.0].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredCandidate {
    /// The ranked candidate.
    pub candidate: CandidateRecord,

    /// Similarity against the query embedding.
    pub score: f32,
}

/// Ranks candidate profiles against a task query.
///
/// The engine owns a thread-safe handle to the embedding provider and fans
/// embedding work out across a bounded pool of tokio tasks. Candidates are
/// independent: each task receives only its own text plus read-only shared
/// references to the provider and the query embedding.
pub struct RankingEngine {
    /// Embedding provider, shared by all worker tasks.
    provider: Arc<dyn EmbeddingProvider>,

    /// Configuration.
    config: RankingConfig,
}

impl RankingEngine {
    /// Create a new ranking engine.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, config: RankingConfig) -> Self {
        Self { provider, config }
    }

    /// The engine's configuration.
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Rank `candidates` against `query` and return the top `k` matches,
    /// descending by score.
    ///
    /// Returns exactly `min(k, surviving candidates)` entries. Ties are
    /// broken by candidate-source order (the earlier candidate wins the
    /// earlier rank), so identical inputs always produce identical output.
    ///
    /// A candidate whose embedding fails or times out is excluded with a
    /// warning; only a query-embedding failure aborts the run.
    pub async fn rank(
        &self,
        query: &TaskQuery,
        candidates: &[CandidateRecord],
        k: usize,
    ) -> Result<Vec<ScoredCandidate>> {
        if k == 0 || candidates.is_empty() {
            return Ok(Vec::new());
        }

        info!(
            "Ranking {} candidates with provider {}",
            candidates.len(),
            self.provider.name()
        );

        // One query embedding, computed before fan-out and shared read-only
        // by every worker task.
        let query_embedding = Arc::new(self.embed_query(query).await?);

        let scored = self.score_candidates(candidates, &query_embedding).await?;

        Ok(select_top_k(scored, candidates, k))
    }

    async fn embed_query(&self, query: &TaskQuery) -> Result<Embedding> {
        let request = self.request_for(query.embedding_text());
        let response = self
            .provider
            .embed(request)
            .await
            .map_err(RankingError::QueryEmbedding)?;

        debug!(
            "Query embedded with {} dimensions",
            response.embedding.len()
        );
        Ok(response.embedding)
    }

    /// Embed and score every candidate concurrently. Returns the surviving
    /// `(source index, score)` pairs.
    async fn score_candidates(
        &self,
        candidates: &[CandidateRecord],
        query_embedding: &Arc<Embedding>,
    ) -> Result<Vec<(usize, f32)>> {
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let task_timeout = Duration::from_secs(self.config.task_timeout_secs);

        let mut handles = Vec::with_capacity(candidates.len());

        for (index, candidate) in candidates.iter().enumerate() {
            let provider = Arc::clone(&self.provider);
            let semaphore = Arc::clone(&semaphore);
            let query_embedding = Arc::clone(query_embedding);
            let request = self.request_for(candidate.embedding_text());
            let name = candidate.name.clone();

            handles.push(tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return None;
                };

                let response = match timeout(task_timeout, provider.embed(request)).await {
                    Ok(Ok(response)) => response,
                    Ok(Err(err)) => {
                        warn!("Excluding candidate {name}: embedding failed: {err}");
                        return None;
                    }
                    Err(_) => {
                        warn!(
                            "Excluding candidate {name}: embedding timed out after {}s",
                            task_timeout.as_secs()
                        );
                        return None;
                    }
                };

                match cosine_similarity(&query_embedding, &response.embedding) {
                    Ok(score) => Some((index, score)),
                    Err(err) => {
                        warn!("Excluding candidate {name}: {err}");
                        None
                    }
                }
            }));
        }

        // Join point: block until every per-candidate task has finished.
        // Handles are awaited in spawn order, so the collected pairs keep
        // candidate-source order regardless of completion order.
        let mut scored = Vec::with_capacity(handles.len());
        for handle in handles {
            if let Some(pair) = handle.await? {
                scored.push(pair);
            }
        }

        if scored.len() < candidates.len() {
            warn!(
                "{} of {} candidates excluded from this run",
                candidates.len() - scored.len(),
                candidates.len()
            );
        }

        Ok(scored)
    }

    fn request_for(&self, text: String) -> EmbeddingRequest {
        let mut request = EmbeddingRequest::new(text);
        if let Some(model) = &self.config.embedding.model {
            request = request.with_model(model.clone());
        }
        request
    }
}

/// Select the `k` highest-scoring candidates, descending by score with
/// source order as the tie-break.
fn select_top_k(
    mut scored: Vec<(usize, f32)>,
    candidates: &[CandidateRecord],
    k: usize,
) -> Vec<ScoredCandidate> {
    scored.sort_by(|a, b| {
        OrderedFloat(b.1)
            .cmp(&OrderedFloat(a.1))
            .then_with(|| a.0.cmp(&b.0))
    });

    scored
        .into_iter()
        .take(k)
        .map(|(index, score)| ScoredCandidate {
            candidate: candidates[index].clone(),
            score,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    use recomatch_embeddings::{EmbeddingError, EmbeddingResponse};

    /// Provider that serves pre-computed vectors keyed by exact input text
    /// and fails for anything unknown. Optionally stalls forever on one
    /// exact input, to exercise the per-candidate timeout.
    struct StubProvider {
        vectors: HashMap<String, Embedding>,
        stall_on: Option<String>,
    }

    impl StubProvider {
        fn new(vectors: Vec<(String, Embedding)>) -> Arc<Self> {
            Self::with_stall(vectors, None)
        }

        fn with_stall(vectors: Vec<(String, Embedding)>, stall_on: Option<String>) -> Arc<Self> {
            Arc::new(Self {
                vectors: vectors.into_iter().collect(),
                stall_on,
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn default_model(&self) -> &str {
            "stub"
        }

        fn default_dimension(&self) -> usize {
            2
        }

        async fn embed(
            &self,
            request: EmbeddingRequest,
        ) -> recomatch_embeddings::Result<EmbeddingResponse> {
            if self.stall_on.as_deref() == Some(request.text.as_str()) {
                std::future::pending::<()>().await;
            }

            let embedding = self
                .vectors
                .get(&request.text)
                .cloned()
                .ok_or_else(|| EmbeddingError::ApiRequest(format!("no vector: {}", request.text)))?;

            let dimension = embedding.len();
            Ok(EmbeddingResponse {
                embedding,
                model: "stub".to_string(),
                dimension,
                tokens_used: None,
            })
        }

        fn is_available(&self) -> bool {
            true
        }
    }

    fn candidate(i: usize) -> CandidateRecord {
        CandidateRecord {
            name: format!("candidate-{i}"),
            email: format!("c{i}@example.com"),
            job: "Engineer".to_string(),
            skills: format!("skills-{i}"),
            expertise: format!("expertise-{i}"),
            curriculum: format!("CV {i}"),
            curriculum_normalized: format!("cv-{i}"),
        }
    }

    fn query() -> TaskQuery {
        TaskQuery::new("q-skills", "q-expertise", "q-description")
    }

    /// Unit vector whose cosine similarity with [1, 0] is exactly `s`.
    fn vector_with_similarity(s: f32) -> Embedding {
        vec![s, (1.0 - s * s).sqrt()]
    }

    /// Stub setup: query maps to [1, 0], candidate `i` maps to a unit
    /// vector with the requested similarity.
    fn stub_for(similarities: &[f32]) -> (Arc<StubProvider>, Vec<CandidateRecord>) {
        let candidates: Vec<CandidateRecord> = (0..similarities.len()).map(candidate).collect();

        let mut vectors = vec![(query().embedding_text(), vec![1.0, 0.0])];
        for (c, s) in candidates.iter().zip(similarities) {
            vectors.push((c.embedding_text(), vector_with_similarity(*s)));
        }

        (StubProvider::new(vectors), candidates)
    }

    fn engine(provider: Arc<StubProvider>) -> RankingEngine {
        RankingEngine::new(provider, RankingConfig::default())
    }

    #[tokio::test]
    async fn test_rank_selects_top_k_descending() {
        let (provider, candidates) = stub_for(&[0.9, 0.1, 0.95, -0.2, 0.5]);
        let engine = engine(provider);

        let ranked = engine.rank(&query(), &candidates, 3).await.unwrap();

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].candidate.name, "candidate-2");
        assert_eq!(ranked[1].candidate.name, "candidate-0");
        assert_eq!(ranked[2].candidate.name, "candidate-4");
        assert!((ranked[0].score - 0.95).abs() < 1e-5);
        assert!((ranked[1].score - 0.9).abs() < 1e-5);
        assert!((ranked[2].score - 0.5).abs() < 1e-5);
    }

    #[tokio::test]
    async fn test_rank_empty_candidates() {
        let (provider, _) = stub_for(&[]);
        let engine = engine(provider);

        let ranked = engine.rank(&query(), &[], 3).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_rank_k_zero() {
        let (provider, candidates) = stub_for(&[0.9, 0.1]);
        let engine = engine(provider);

        let ranked = engine.rank(&query(), &candidates, 0).await.unwrap();
        assert!(ranked.is_empty());
    }

    #[tokio::test]
    async fn test_rank_fills_short_when_k_exceeds_pool() {
        let (provider, candidates) = stub_for(&[0.9, 0.1]);
        let engine = engine(provider);

        let ranked = engine.rank(&query(), &candidates, 5).await.unwrap();
        assert_eq!(ranked.len(), 2);
    }

    #[tokio::test]
    async fn test_rank_ties_broken_by_source_order() {
        let (provider, candidates) = stub_for(&[0.5, 0.8, 0.8, 0.5]);
        let engine = engine(provider);

        let ranked = engine.rank(&query(), &candidates, 4).await.unwrap();

        let names: Vec<&str> = ranked.iter().map(|r| r.candidate.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["candidate-1", "candidate-2", "candidate-0", "candidate-3"]
        );
    }

    #[tokio::test]
    async fn test_rank_is_deterministic() {
        let (provider, candidates) = stub_for(&[0.3, 0.7, 0.7, 0.1, 0.9]);
        let engine = engine(provider);

        let first = engine.rank(&query(), &candidates, 5).await.unwrap();
        let second = engine.rank(&query(), &candidates, 5).await.unwrap();

        let names = |ranked: &[ScoredCandidate]| {
            ranked
                .iter()
                .map(|r| r.candidate.name.clone())
                .collect::<Vec<_>>()
        };
        let scores =
            |ranked: &[ScoredCandidate]| ranked.iter().map(|r| r.score).collect::<Vec<_>>();

        assert_eq!(names(&first), names(&second));
        assert_eq!(scores(&first), scores(&second));
    }

    #[tokio::test]
    async fn test_failed_candidate_does_not_abort_run() {
        let (provider, mut candidates) = stub_for(&[0.9, 0.1, 0.5]);
        // Candidate 1's text no longer matches any stub vector, so its
        // embedding call fails.
        candidates[1].skills = "unknown".to_string();
        let engine = engine(provider);

        let ranked = engine.rank(&query(), &candidates, 3).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate.name, "candidate-0");
        assert_eq!(ranked[1].candidate.name, "candidate-2");
    }

    #[tokio::test(start_paused = true)]
    async fn test_timed_out_candidate_is_excluded() {
        let candidates: Vec<CandidateRecord> = (0..3).map(candidate).collect();

        let mut vectors = vec![(query().embedding_text(), vec![1.0, 0.0])];
        for (c, s) in candidates.iter().zip([0.9f32, 0.1, 0.5]) {
            vectors.push((c.embedding_text(), vector_with_similarity(s)));
        }

        // Candidate 1's embed call never resolves; the timeout must cut it
        // loose without stalling the run.
        let stalled = candidates[1].embedding_text();
        let provider = StubProvider::with_stall(vectors, Some(stalled));

        let config = RankingConfig::default().with_task_timeout_secs(1);
        let engine = RankingEngine::new(provider, config);

        let ranked = engine.rank(&query(), &candidates, 3).await.unwrap();

        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].candidate.name, "candidate-0");
        assert_eq!(ranked[1].candidate.name, "candidate-2");
    }

    #[tokio::test]
    async fn test_query_embedding_failure_is_fatal() {
        let candidates = vec![candidate(0)];
        // No vector registered for the query text.
        let provider = StubProvider::new(vec![(
            candidates[0].embedding_text(),
            vec![1.0, 0.0],
        )]);
        let engine = engine(provider);

        let result = engine.rank(&query(), &candidates, 3).await;
        assert!(matches!(result, Err(RankingError::QueryEmbedding(_))));
    }

    #[tokio::test]
    async fn test_rank_respects_concurrency_bound_of_one() {
        let (provider, candidates) = stub_for(&[0.2, 0.9, 0.4]);
        let config = RankingConfig::default().with_max_concurrency(1);
        let engine = RankingEngine::new(provider, config);

        let ranked = engine.rank(&query(), &candidates, 3).await.unwrap();
        assert_eq!(ranked[0].candidate.name, "candidate-1");
    }
}
