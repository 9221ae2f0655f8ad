use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::{
    extractor::ClipLinkExtractor,
    outside::{PageFetcher, SnapshotLookup},
    result::{Error, Result},
    types::{ClipSet, Username},
};

/// Find every clip of a user in the archived pages of their profile
pub struct ArchiveResolver<'a> {
    pages: &'a dyn PageFetcher,
    archive: &'a dyn SnapshotLookup,
    extractor: &'a ClipLinkExtractor,
    max_pages: usize,
}

impl<'a> ArchiveResolver<'a> {
    pub fn new(
        pages: &'a dyn PageFetcher,
        archive: &'a dyn SnapshotLookup,
        extractor: &'a ClipLinkExtractor,
        max_pages: usize,
    ) -> Self {
        Self {
            pages,
            archive,
            extractor,
            max_pages,
        }
    }

    /// Return the clips of every reachable profile page, each clip once.
    ///
    /// Fails with [`Error::NotArchived`] if the profile was never archived,
    /// and on any error while reading its pages.
    pub fn resolve(&self, username: &Username) -> Result<ClipSet> {
        let profile_url = username.profile_url();
        let snapshot = self
            .archive
            .closest_any_scheme(&profile_url)?
            .ok_or(Error::NotArchived(profile_url))?;

        match &snapshot.timestamp {
            Some(timestamp) => info!("Found a snapshot of {username}'s profile from {timestamp}"),
            None => info!("Found a snapshot of {username}'s profile"),
        }

        let ranker = self.extractor.ranker();
        let mut clips = ClipSet::new();
        let mut visited = HashSet::new();
        let mut declared = None;

        let mut next = Some(snapshot.url);
        let mut page = 1;
        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                debug!("Page {url} already read");
                break;
            }

            let html = self.pages.fetch(&url)?;
            let found = self.extractor.extract(&html);
            let total = found.len();
            let new = found
                .into_iter()
                .map(|clip| clips.insert(clip, ranker))
                .filter(|&is_new| is_new)
                .count();
            info!("Page {page}: {total} clips, {new} new");

            if declared.is_none() {
                declared = self.extractor.declared_video_count(&html);
            }

            next = self.extractor.next_page(&html, page, &url);
            if next.is_some() && page >= self.max_pages {
                warn!("Stopped after {page} pages, the profile has more");
                break;
            }
            page += 1;
        }

        debug!("Clips found: {:?}", clips.ids().collect::<Vec<_>>());
        if let Some(declared) = declared.filter(|&declared| clips.len() < declared) {
            warn!(
                "The profile lists {declared} videos but only {} were found in the archive",
                clips.len()
            );
        }

        Ok(clips)
    }
}
