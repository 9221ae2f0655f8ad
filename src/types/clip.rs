use std::collections::HashMap;

use crate::ranking::VariantRanker;

use super::Quality;

pub type ClipId = String;

/// One candidate download URL of a clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipVariant {
    pub url: String,
    pub quality: Option<Quality>,
}

impl ClipVariant {
    pub fn new(url: impl Into<String>, quality: Option<Quality>) -> Self {
        Self {
            url: url.into(),
            quality,
        }
    }
}

/// A clip found on a profile page, along with its ranked download variants.
///
/// There is always at least one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipReference {
    pub id: ClipId,
    variants: Vec<ClipVariant>,
}

impl ClipReference {
    /// Build a clip from the variants in discovery order.
    /// Return None if there is no variant.
    pub fn new(id: ClipId, variants: Vec<ClipVariant>, ranker: &dyn VariantRanker) -> Option<Self> {
        if variants.is_empty() {
            return None;
        }

        let mut clip = Self {
            id,
            variants: Vec::with_capacity(variants.len()),
        };
        clip.absorb(variants, ranker);
        Some(clip)
    }

    /// Variants, best first
    pub fn variants(&self) -> &[ClipVariant] {
        &self.variants
    }

    pub fn download_url(&self) -> &str {
        &self.variants[0].url
    }

    pub fn quality(&self) -> Option<Quality> {
        self.variants[0].quality
    }

    /// The output file name, only depending on the clip ID
    pub fn file_name(&self) -> String {
        format!("{}.mp4", self.id)
    }

    /// Add the unknown variants and rank everything again
    fn absorb(&mut self, variants: Vec<ClipVariant>, ranker: &dyn VariantRanker) {
        for variant in variants {
            if !self.variants.iter().any(|v| v.url == variant.url) {
                self.variants.push(variant);
            }
        }
        ranker.rank(&mut self.variants);
    }
}

/// Clips deduplicated by ID, kept in discovery order
#[derive(Debug, Default)]
pub struct ClipSet {
    clips: Vec<ClipReference>,
    index: HashMap<ClipId, usize>,
}

impl ClipSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a clip. If its ID is already known, its variants are merged
    /// into the existing entry.
    ///
    /// Return whether the clip was new.
    pub fn insert(&mut self, clip: ClipReference, ranker: &dyn VariantRanker) -> bool {
        if let Some(&idx) = self.index.get(&clip.id) {
            self.clips[idx].absorb(clip.variants, ranker);
            false
        } else {
            self.index.insert(clip.id.clone(), self.clips.len());
            self.clips.push(clip);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipReference> {
        self.clips.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|clip| clip.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::HighestResolution;

    fn variant(id: &str, quality: u16) -> ClipVariant {
        ClipVariant::new(
            format!("https://cdn.example/video/{id}/processed/{quality}.mp4"),
            Some(Quality::new(quality)),
        )
    }

    fn clip(id: &str, qualities: &[u16]) -> ClipReference {
        let variants = qualities.iter().map(|&q| variant(id, q)).collect();
        ClipReference::new(id.to_owned(), variants, &HighestResolution).unwrap()
    }

    #[test]
    fn clip_needs_a_variant() {
        assert!(ClipReference::new("abc123".to_owned(), vec![], &HighestResolution).is_none());
    }

    #[test]
    fn file_name_only_depends_on_id() {
        assert_eq!(clip("abc123", &[480]).file_name(), "abc123.mp4");
        assert_eq!(clip("abc123", &[1080, 720]).file_name(), "abc123.mp4");
    }

    #[test]
    fn set_keeps_discovery_order_and_deduplicates() {
        let mut set = ClipSet::new();
        assert!(set.insert(clip("b", &[720]), &HighestResolution));
        assert!(set.insert(clip("a", &[720]), &HighestResolution));
        assert!(!set.insert(clip("b", &[720]), &HighestResolution));

        assert_eq!(set.len(), 2);
        assert_eq!(set.ids().collect::<Vec<_>>(), ["b", "a"]);
    }

    #[test]
    fn duplicate_brings_its_better_variants() {
        let mut set = ClipSet::new();
        set.insert(clip("abc123", &[480]), &HighestResolution);
        set.insert(clip("abc123", &[1080, 480]), &HighestResolution);

        let merged = set.iter().next().unwrap();
        assert_eq!(merged.variants().len(), 2);
        assert_eq!(merged.quality(), Some(Quality::new(1080)));
    }
}
