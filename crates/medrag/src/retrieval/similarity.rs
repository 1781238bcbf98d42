//! Exact similarity between a query vector and a candidate vector

use crate::error::{Error, Result};

/// Added to the norm product so zero vectors score 0 instead of NaN
pub const NORM_EPSILON: f32 = 1e-8;

/// Cosine similarity, approximately in `[-1, 1]`.
///
/// Accumulates in `f64`; mismatched lengths are a caller bug and fail with
/// [`Error::InvalidDimension`] rather than being truncated.
pub fn cosine_similarity(query: &[f32], candidate: &[f32]) -> Result<f32> {
    if query.len() != candidate.len() {
        return Err(Error::invalid_dimension(query.len(), candidate.len()));
    }

    let (mut dot, mut query_sq, mut candidate_sq) = (0.0f64, 0.0f64, 0.0f64);
    for (&q, &c) in query.iter().zip(candidate) {
        let (q, c) = (f64::from(q), f64::from(c));
        dot += q * c;
        query_sq += q * q;
        candidate_sq += c * c;
    }

    let denominator = query_sq.sqrt() * candidate_sq.sqrt() + f64::from(NORM_EPSILON);
    Ok((dot / denominator) as f32)
}
