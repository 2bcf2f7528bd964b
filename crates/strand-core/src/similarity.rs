//! Vector similarity helpers shared by strategies and test backends.

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for mismatched lengths, empty input, or zero-magnitude vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f64::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

/// Jaccard overlap between two token sets, case-insensitive.
pub fn token_jaccard(a: &str, b: &str) -> f64 {
    use std::collections::HashSet;

    let left: HashSet<String> = a.split_whitespace().map(|t| t.to_lowercase()).collect();
    let right: HashSet<String> = b.split_whitespace().map(|t| t.to_lowercase()).collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(&right).count() as f64;
    let union = left.union(&right).count() as f64;
    intersection / union
}
