//! Weighted and uniform random selection

use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;

/// Draw one item with probability proportional to its weight.
///
/// Weights need not sum to any particular value. Zero-weight items are never
/// chosen. Returns `None` when no item has a positive finite weight.
pub fn choice_by_prob<'a, T, R>(rng: &mut R, candidates: &'a [(f64, T)]) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    let weights = candidates.iter().map(|(w, _)| {
        if w.is_finite() && *w > 0.0 { *w } else { 0.0 }
    });
    let index = WeightedIndex::new(weights).ok()?;
    candidates.get(index.sample(rng)).map(|(_, item)| item)
}

/// Draw one item uniformly
pub fn choose_uniform<'a, T, R>(rng: &mut R, items: &'a [T]) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}
