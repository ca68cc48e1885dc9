//! Cosine similarity over raw `f32` slices.

/// Computes cosine similarity between two vectors.
///
/// # Returns
/// * Cosine similarity in range [-1, 1], where 1 is most similar
/// * `0.0` when either vector has a zero norm, so the result is always
///   safe to sort and compare
///
/// Components are accumulated in `f64` and the result is clamped into
/// [-1, 1] to absorb rounding.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "Vectors must have same dimension");

    let mut dot_product = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot_product += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot_product / (norm_a.sqrt() * norm_b.sqrt());
    if similarity.is_nan() {
        // NaN components poison the score; treat as unrelated
        return 0.0;
    }
    similarity.clamp(-1.0, 1.0) as f32
}
