//! Exact re-ranking of coarse candidates

use crate::error::Result;
use crate::types::{Candidate, Hit, ScoredCandidate};

use super::metadata::{resolve, SourceField};
use super::similarity::cosine_similarity;

/// Score every candidate against the query, keeping coarse order.
///
/// Fails on the first dimension mismatch; a skipped candidate would
/// silently change the ranking.
pub fn score_candidates(query: &[f32], candidates: &[Candidate]) -> Result<Vec<ScoredCandidate>> {
    candidates
        .iter()
        .enumerate()
        .map(|(coarse_rank, candidate)| -> Result<ScoredCandidate> {
            let score = cosine_similarity(query, &candidate.vector)?;
            Ok(ScoredCandidate {
                candidate: candidate.clone(),
                // NaN only comes from NaN inputs; rank those last
                score: if score.is_nan() { f32::NEG_INFINITY } else { score },
                coarse_rank,
            })
        })
        .collect()
}

/// Re-rank coarse candidates and keep the best `final_k` as hits.
///
/// Ties are broken by coarse rank. Returns `min(final_k, len)` hits,
/// empty when either is zero.
pub fn rerank(query: &[f32], candidates: &[Candidate], final_k: usize) -> Result<Vec<Hit>> {
    if final_k == 0 || candidates.is_empty() {
        return Ok(Vec::new());
    }

    let mut scored = score_candidates(query, candidates)?;
    order_by_score(&mut scored);
    scored.truncate(final_k);

    let hits: Vec<Hit> = scored
        .into_iter()
        .enumerate()
        .map(|(i, sc)| to_hit(sc, i + 1))
        .collect();

    for hit in &hits {
        tracing::debug!(
            "rank {} score={:.4} source={} pages={}",
            hit.rank,
            hit.score,
            hit.source_book,
            hit.pages
        );
    }

    Ok(hits)
}

/// Descending score, then ascending coarse rank
fn order_by_score(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.coarse_rank.cmp(&b.coarse_rank))
    });
}

fn to_hit(scored: ScoredCandidate, rank: usize) -> Hit {
    let metadata = &scored.candidate.metadata;
    Hit {
        source_book: resolve(metadata, SourceField::Book),
        chapter: resolve(metadata, SourceField::Chapter),
        section: resolve(metadata, SourceField::Section),
        pages: resolve(metadata, SourceField::Pages),
        chunk: scored.candidate.text,
        score: scored.score,
        rank,
    }
}
