//! This is the vector math module
//! Provide L2 norm, dot product, cosine similarity and top-k ranking

use crate::error::{Error, Result};

/// L2 Norm
/// ||vec|| = sqrt(sum(vec[i]^2))
pub fn l2_norm(vector: &[f32]) -> f32 {
    vector.iter()
        .map(|x| x * x)
        .sum::<f32>()
        .sqrt()
}

/// Dot Product
/// dot_prod = sum(a[i] * b[i]) for i = 0..a.len()
/// Can only process vectors with same dimensions
pub fn dot_product(left: &[f32], right: &[f32]) -> Result<f32> {
    if left.len() != right.len() {
        return Err(Error::DimensionMismatch { expected: left.len(), actual: right.len() });
    }

    let dot_prod = left.iter()
        .zip(right.iter())
        .map(|(x, y)| x * y)
        .sum();

    Ok(dot_prod)
}

/// Cosine Similarity
/// cos = dot(a, b) / (||a|| * ||b||)
/// A zero vector on either side scores 0.0
pub fn cosine_similarity(left: &[f32], right: &[f32]) -> Result<f32> {
    let dot = dot_product(left, right)?;
    Ok(cosine_from_parts(dot, l2_norm(left), l2_norm(right)))
}

fn cosine_from_parts(dot: f32, left_norm: f32, right_norm: f32) -> f32 {
    if left_norm == 0.0 || right_norm == 0.0 {
        return 0.0;
    }
    dot / (left_norm * right_norm)
}

/// Exact top-k ranking over `(ordinal, vector)` candidates.
///
/// Every candidate is scored against `query` with [`cosine_similarity`] and
/// the `k` best are returned as `(ordinal, score)`, highest score first.
/// Candidates with an identical score keep their input order, so the caller
/// gets earlier ordinals first as long as it feeds candidates in ordinal order.
///
/// Fails with [`Error::DimensionMismatch`] if any candidate length differs
/// from the query.
pub fn top_k<'a, I>(query: &[f32], candidates: I, k: usize) -> Result<Vec<(usize, f32)>>
where
    I: IntoIterator<Item = (usize, &'a [f32])>,
{
    if k == 0 {
        return Ok(Vec::new());
    }

    let query_norm = l2_norm(query);
    let mut ranked: Vec<(usize, f32)> = Vec::new();
    for (ordinal, vector) in candidates {
        let dot = dot_product(query, vector)?;
        let sim = cosine_from_parts(dot, query_norm, l2_norm(vector));
        // `>=` puts the new entry after any equal score already kept
        let insert_index = ranked.partition_point(|&x| x.1 >= sim);
        if insert_index < k {
            ranked.insert(insert_index, (ordinal, sim));
            ranked.truncate(k);
        }
    }

    Ok(ranked)
}
