// Fuzzy ranking of candidate domains against a keyword

use crate::similarity::{Processor, Query, Scorer};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedMatch {
    /// 1-based position in the ranking
    pub rank: usize,
    pub domain: String,
    pub score: f64,
    /// Position of the domain in the candidate list
    pub index: usize,
}

/// Ranked matches for one keyword of a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMatches {
    pub query: String,
    pub matches: Vec<RankedMatch>,
}

#[derive(Debug, Clone)]
pub struct Ranker {
    scorer: Scorer,
    score_cutoff: f64,
    processor: Processor,
}

impl Default for Ranker {
    fn default() -> Self {
        Self::new(Scorer::default())
    }
}

impl Ranker {
    pub fn new(scorer: Scorer) -> Self {
        Self {
            scorer,
            score_cutoff: 0.0,
            processor: Processor::default(),
        }
    }

    /// Drop candidates scoring below `cutoff` (0-100). NaN disables the
    /// cutoff.
    pub fn with_score_cutoff(mut self, cutoff: f64) -> Self {
        self.score_cutoff = if cutoff.is_nan() {
            0.0
        } else {
            cutoff.clamp(0.0, 100.0)
        };
        self
    }

    /// How the query and each candidate are normalized before scoring.
    pub fn with_processor(mut self, processor: Processor) -> Self {
        self.processor = processor;
        self
    }

    pub fn scorer(&self) -> Scorer {
        self.scorer
    }

    pub fn processor(&self) -> Processor {
        self.processor
    }

    /// Returns the `limit` best-scoring candidates, highest first.
    ///
    /// Equal scores keep candidate-list order, so the output is fully
    /// determined by the inputs. Scoring runs in parallel over the candidate
    /// list; the stable sort afterwards restores a deterministic order.
    /// A query that is empty after processing ranks nothing.
    pub fn rank(&self, query: &str, candidates: &[String], limit: usize) -> Vec<RankedMatch> {
        let processed = self.processor.apply(query);
        if limit == 0 || processed.is_empty() || candidates.is_empty() {
            return Vec::new();
        }

        let prepared = Query::new(&processed);
        let mut scored: Vec<(usize, f64)> = candidates
            .par_iter()
            .enumerate()
            .filter_map(|(index, candidate)| {
                let candidate = self.processor.apply(candidate);
                self.scorer
                    .score_with_cutoff(&prepared, &candidate, self.score_cutoff)
                    .map(|score| (index, score))
            })
            .collect();

        debug!(
            "Scored {} of {} candidates for '{}' with {}",
            scored.len(),
            candidates.len(),
            query,
            self.scorer.as_str()
        );

        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(limit);

        scored
            .into_iter()
            .enumerate()
            .map(|(position, (index, score))| RankedMatch {
                rank: position + 1,
                domain: candidates[index].clone(),
                score,
                index,
            })
            .collect()
    }

    /// Ranks every query against the same candidate list.
    pub fn rank_batch(&self, queries: &[String], candidates: &[String], limit: usize) -> Vec<QueryMatches> {
        queries
            .iter()
            .map(|query| QueryMatches {
                query: query.clone(),
                matches: self.rank(query, candidates, limit),
            })
            .collect()
    }
}
