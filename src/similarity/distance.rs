//! Vector kernels used by the similarity matrix.
//!
//! Accumulation happens in f64 so that cosine scores for exactly
//! representable inputs (e.g. 0.5) come out exact.

pub fn squared_magnitude(v: &[f32]) -> f64 {
    let mut sum = 0.0f64;
    let n = v.len();
    let mut i = 0;

    // Unrolling 4
    while i + 3 < n {
        let (a, b, c, d) = (v[i] as f64, v[i + 1] as f64, v[i + 2] as f64, v[i + 3] as f64);
        sum += a * a + b * b + c * c + d * d;
        i += 4;
    }

    while i < n {
        let a = v[i] as f64;
        sum += a * a;
        i += 1;
    }

    sum
}

pub fn magnitude(v: &[f32]) -> f64 {
    squared_magnitude(v).sqrt()
}

pub fn dot(a: &[f32], b: &[f32]) -> f64 {
    let mut sum = 0.0f64;
    let n = a.len().min(b.len());
    let mut i = 0;

    // Unrolling 4
    while i + 3 < n {
        sum += a[i] as f64 * b[i] as f64
            + a[i + 1] as f64 * b[i + 1] as f64
            + a[i + 2] as f64 * b[i + 2] as f64
            + a[i + 3] as f64 * b[i + 3] as f64;
        i += 4;
    }

    while i < n {
        sum += a[i] as f64 * b[i] as f64;
        i += 1;
    }

    sum
}

/// Cosine similarity with optional precomputed squared magnitudes.
///
/// Zero vectors have no direction; the pair scores 0.0 instead of NaN.
/// The result is clamped to [-1, 1] to absorb rounding drift.
pub fn cosine_similarity(a: &[f32], b: &[f32], sq_a: Option<f64>, sq_b: Option<f64>) -> f64 {
    let sa = sq_a.unwrap_or_else(|| squared_magnitude(a));
    let sb = sq_b.unwrap_or_else(|| squared_magnitude(b));

    if sa == 0.0 || sb == 0.0 {
        return 0.0;
    }

    let score = dot(a, b) / (sa * sb).sqrt();
    if score.is_nan() {
        return 0.0;
    }
    score.clamp(-1.0, 1.0)
}
