use std::collections::HashMap;

use crate::{
    my_regex,
    ranking::{HighestResolution, VariantRanker},
    types::{ClipId, ClipReference, ClipVariant, Quality},
};

/// Encodings PlaysTV produced for most clips
pub const DEFAULT_QUALITIES: [Quality; 3] =
    [Quality::new(1080), Quality::new(720), Quality::new(480)];

const PROCESSED_DIR: &str = "/processed/";
const WAYBACK_ORIGIN: &str = "https://web.archive.org";

/// Find the clips referenced by an archived profile page
pub struct ClipLinkExtractor {
    qualities: Vec<Quality>,
    ranker: Box<dyn VariantRanker>,
}

impl Default for ClipLinkExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITIES.to_vec(), Box::new(HighestResolution))
    }
}

impl ClipLinkExtractor {
    /// `qualities` are the encodings to try for clips only known by an image
    pub fn new(qualities: Vec<Quality>, ranker: Box<dyn VariantRanker>) -> Self {
        Self { qualities, ranker }
    }

    pub fn ranker(&self) -> &dyn VariantRanker {
        self.ranker.as_ref()
    }

    /// Extract the clips in the order they first appear in the page.
    /// Every clip appears once, with all the variants found for it.
    pub fn extract(&self, html: &str) -> Vec<ClipReference> {
        let mut order: Vec<(ClipId, Vec<ClipVariant>)> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();

        for cap in my_regex::media_url().captures_iter(html) {
            let id = cap.name("id").map_or("", |m| m.as_str());
            let url = origin_url(&cap["url"]);
            let variants = self.variants_of(&url, &cap["file"], &cap["ext"]);

            match index.get(id) {
                Some(&idx) => order[idx].1.extend(variants),
                None => {
                    index.insert(id, order.len());
                    order.push((id.to_owned(), variants));
                }
            }
        }

        order
            .into_iter()
            .filter_map(|(id, variants)| ClipReference::new(id, variants, self.ranker()))
            .collect()
    }

    /// Turn one matched media URL into download candidates.
    ///
    /// A numbered mp4 is an encoding of known quality.
    /// Anything else only tells where the encodings live, so one URL
    /// per configured quality is derived from it.
    fn variants_of(&self, url: &str, file: &str, ext: &str) -> Vec<ClipVariant> {
        if ext == "mp4" {
            if let Ok(quality) = file.parse::<Quality>() {
                return vec![ClipVariant::new(url, Some(quality))];
            }
        }

        let Some(idx) = url.rfind(PROCESSED_DIR) else {
            return vec![];
        };
        let base = &url[..idx + PROCESSED_DIR.len()];

        let mut variants: Vec<ClipVariant> = self
            .qualities
            .iter()
            .map(|q| ClipVariant::new(format!("{base}{}.mp4", q.lines()), Some(*q)))
            .collect();
        if ext == "mp4" {
            variants.push(ClipVariant::new(url, None));
        }
        variants
    }

    /// Find the link to the page following `current` (1-based), if any.
    ///
    /// Relative links are resolved against `base_url`, the URL of the current page.
    pub fn next_page(&self, html: &str, current: usize, base_url: &str) -> Option<String> {
        let wanted = current + 1;
        my_regex::page_link()
            .captures_iter(html)
            .find(|cap| cap["page"].parse::<usize>().ok() == Some(wanted))
            .map(|cap| absolute_url(&cap["href"].replace("&amp;", "&"), base_url))
    }

    /// The number of videos the profile page says the user has
    pub fn declared_video_count(&self, html: &str) -> Option<usize> {
        my_regex::video_count()
            .captures(html)
            .and_then(|cap| cap["count"].parse().ok())
    }
}

/// Return the URL as it was on the live site: without the archive rewriting
/// prefix and with an explicit scheme.
pub fn origin_url(url: &str) -> String {
    let mut url = url;
    while let Some(m) = my_regex::wayback_prefix().find(url) {
        url = &url[m.end()..];
    }

    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_owned()
    }
}

/// Whether the URL already points inside the archive
pub fn is_archive_url(url: &str) -> bool {
    my_regex::wayback_prefix().is_match(url)
}

fn absolute_url(href: &str, base_url: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_owned()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else if href.starts_with('/') {
        format!("{WAYBACK_ORIGIN}{href}")
    } else if href.starts_with('?') {
        let path = base_url.split_once('?').map_or(base_url, |(path, _)| path);
        format!("{path}{href}")
    } else {
        let dir = base_url.rsplit_once('/').map_or(base_url, |(dir, _)| dir);
        format!("{dir}/{href}")
    }
}
