use std::cmp::Reverse;

use crate::types::ClipVariant;

/// Order the download variants of a clip, best first
pub trait VariantRanker {
    fn rank(&self, variants: &mut [ClipVariant]);
}

/// Prefer the largest declared resolution.
/// Variants without a resolution hint come last, ties keep their discovery order.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestResolution;

impl VariantRanker for HighestResolution {
    fn rank(&self, variants: &mut [ClipVariant]) {
        // Stable sort: equal keys stay in discovery order
        variants.sort_by_key(|v| Reverse(v.quality.map(|q| q.lines())));
    }
}
