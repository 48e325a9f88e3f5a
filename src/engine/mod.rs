//! Match engine: single-query matching and whole-pool grouping.
//!
//! Both flows are request-scoped. The engine only holds the injected embedder,
//! oracle and settings, so one instance can serve concurrent requests.

mod error;


pub use error::{MatchError, MatchStage};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::{
    DEFAULT_EMBED_TIMEOUT_SECS, DEFAULT_ORACLE_TIMEOUT_SECS, DEFAULT_QUESTION_FIELD,
    DEFAULT_TOP_K,
};
use crate::embedding::Embedder;
use crate::index::IndexError;
use crate::oracle::{
    Oracle, grouping_prompt, match_prompt, parse_group_verdict, parse_match_verdict,
};
use crate::pool::{PoolSource, Question};
use crate::shortlist::{EmbedTarget, PoolPosition, ShortlistBuilder, ShortlistError};
use crate::text;

/// Tunables for a [`MatchEngine`].
#[derive(Debug, Clone)]
pub struct MatchSettings {
    pub shortlist_k: usize,
    /// Record field holding each question's text.
    pub question_field: String,
    pub embed_timeout: Duration,
    pub oracle_timeout: Duration,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            shortlist_k: DEFAULT_TOP_K,
            question_field: DEFAULT_QUESTION_FIELD.to_string(),
            embed_timeout: Duration::from_secs(DEFAULT_EMBED_TIMEOUT_SECS),
            oracle_timeout: Duration::from_secs(DEFAULT_ORACLE_TIMEOUT_SECS),
        }
    }
}

/// A pool question the oracle confirmed as a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub position: usize,
    pub similarity: f32,
    pub question: Question,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchResult {
    pub matches: Vec<Match>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty()
    }

    pub fn questions(&self) -> Vec<Question> {
        self.matches.iter().map(|m| m.question.clone()).collect()
    }
}

/// Disjoint groups of two or more pool positions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupResult {
    pub groups: Vec<Vec<PoolPosition>>,
    questions: Vec<Vec<Question>>,
}

impl GroupResult {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Groups resolved to the original records.
    pub fn question_groups(&self) -> &[Vec<Question>] {
        &self.questions
    }
}

/// Embedding shortlist plus oracle verdicts over a request's pool.
#[derive(Debug)]
pub struct MatchEngine<E, O> {
    embedder: Arc<E>,
    oracle: Arc<O>,
    settings: MatchSettings,
}

impl<E: Embedder, O: Oracle> MatchEngine<E, O> {
    pub fn new(embedder: Arc<E>, oracle: Arc<O>, settings: MatchSettings) -> Self {
        Self {
            embedder,
            oracle,
            settings,
        }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn embedder(&self) -> &E {
        &self.embedder
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Fetches a pool, treating an empty one as [`MatchError::EmptyPool`].
    pub async fn fetch_pool<S: PoolSource>(
        &self,
        source: &S,
        locator: &str,
    ) -> Result<Vec<Question>, MatchError> {
        debug!(stage = %MatchStage::Fetching, "Fetching question pool");
        let pool = source.fetch(locator).await?;
        if pool.is_empty() {
            return Err(MatchError::EmptyPool);
        }
        Ok(pool)
    }

    /// Finds pool questions that mean the same as `query`.
    pub async fn match_question(
        &self,
        pool: &[Question],
        query: &str,
    ) -> Result<MatchResult, MatchError> {
        if pool.is_empty() {
            return Err(MatchError::EmptyPool);
        }

        debug!(stage = %MatchStage::Normalizing, pool_size = pool.len(), "Normalizing query");
        let query_text = text::normalize(Some(query));
        if query_text.is_empty() {
            return Err(MatchError::InvalidInput {
                reason: "question text is empty".to_string(),
            });
        }

        let raw_texts = self.pool_texts(pool);

        debug!(
            stage = %MatchStage::EmbeddingPool,
            k = self.settings.shortlist_k,
            "Building shortlist"
        );
        let shortlist = ShortlistBuilder::new(
            self.embedder.as_ref(),
            self.settings.shortlist_k,
            self.settings.embed_timeout,
        )
        .build(&raw_texts, query)
        .await
        .map_err(|e| self.shortlist_error(e))?;

        debug!(
            stage = %MatchStage::Prompting,
            shortlist_len = shortlist.len(),
            "Asking oracle"
        );
        let candidates: Vec<String> = shortlist
            .iter()
            .map(|entry| text::normalize(Some(raw_texts[entry.position.get()])))
            .collect();
        let prompt = match_prompt(&query_text, candidates.iter().map(String::as_str));
        let verdict = self.ask_oracle(&prompt).await?;

        debug!(stage = %MatchStage::Parsing, verdict_len = verdict.len(), "Parsing verdict");
        let matches: Vec<Match> = parse_match_verdict(&verdict, &shortlist)
            .into_iter()
            .map(|entry| Match {
                position: entry.position.get(),
                similarity: entry.score,
                question: pool[entry.position.get()].clone(),
            })
            .collect();

        info!(
            pool_size = pool.len(),
            shortlist_len = shortlist.len(),
            matches = matches.len(),
            "Single-question match complete"
        );

        Ok(MatchResult { matches })
    }

    /// Asks the oracle to partition the whole pool into groups of equivalent questions.
    pub async fn group_questions(&self, pool: &[Question]) -> Result<GroupResult, MatchError> {
        if pool.is_empty() {
            return Err(MatchError::EmptyPool);
        }
        if pool.len() < 2 {
            debug!("Pool has a single question, nothing to group");
            return Ok(GroupResult::default());
        }

        debug!(stage = %MatchStage::Normalizing, pool_size = pool.len(), "Normalizing pool");
        let texts: Vec<String> = self
            .pool_texts(pool)
            .into_iter()
            .map(|t| text::normalize(Some(t)))
            .collect();

        debug!(stage = %MatchStage::Prompting, "Asking oracle");
        let prompt = grouping_prompt(texts.iter().map(String::as_str));
        let verdict = self.ask_oracle(&prompt).await?;

        debug!(stage = %MatchStage::Parsing, verdict_len = verdict.len(), "Parsing verdict");
        let groups = parse_group_verdict(&verdict, pool.len());
        let questions = groups
            .iter()
            .map(|g| g.iter().map(|p| pool[p.get()].clone()).collect())
            .collect();

        info!(pool_size = pool.len(), groups = groups.len(), "Grouping complete");

        Ok(GroupResult { groups, questions })
    }

    fn pool_texts<'p>(&self, pool: &'p [Question]) -> Vec<&'p str> {
        pool.iter()
            .map(|q| q.text(&self.settings.question_field).unwrap_or_default())
            .collect()
    }

    async fn ask_oracle(&self, prompt: &str) -> Result<String, MatchError> {
        let timeout = self.settings.oracle_timeout;
        let verdict = tokio::time::timeout(timeout, self.oracle.generate(prompt))
            .await
            .map_err(|_| MatchError::Timeout {
                stage: MatchStage::Prompting,
                timeout,
            })??;
        Ok(verdict)
    }

    fn shortlist_error(&self, err: ShortlistError) -> MatchError {
        match err {
            ShortlistError::Embedding { source, .. } => MatchError::EmbeddingUnavailable(source),
            ShortlistError::Timeout { target, timeout } => MatchError::Timeout {
                stage: match target {
                    EmbedTarget::Pool => MatchStage::EmbeddingPool,
                    EmbedTarget::Query => MatchStage::EmbeddingQuery,
                },
                timeout,
            },
            ShortlistError::Build(IndexError::EmptyPool) => MatchError::EmptyPool,
            ShortlistError::Build(source) => MatchError::Index {
                stage: MatchStage::Indexing,
                source,
            },
            ShortlistError::Search(source) => MatchError::Index {
                stage: MatchStage::Searching,
                source,
            },
        }
    }
}
