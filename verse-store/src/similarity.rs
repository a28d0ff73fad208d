//! Cosine similarity and linear best-match scan.

/// Cosine similarity of two vectors, clamped to `[-1, 1]`.
///
/// Accumulates in `f64`, which cannot overflow for finite `f32` input.
/// Zero-norm or non-finite inputs score `0.0`.
pub fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    let s = dot / (na.sqrt() * nb.sqrt());
    if s.is_finite() { s.clamp(-1.0, 1.0) as f32 } else { 0.0 }
}

/// Index and score of the corpus vector closest to `query`.
///
/// The first index reaching the maximum wins. `None` only for an empty corpus.
pub fn best_match(query: &[f32], corpus: &[Vec<f32>]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in corpus.iter().enumerate() {
        let s = cosine(query, v);
        match best {
            Some((_, top)) if s <= top => {}
            _ => best = Some((i, s)),
        }
    }
    best
}
