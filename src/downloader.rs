use std::path::Path;

use tracing::debug;

use crate::{
    extractor::is_archive_url,
    io::{copy_to, find_existing, named_tempfile},
    outside::{ContentFetcher, SnapshotLookup},
    result::{Error, Result},
    types::{ClipReference, DownloadOutcome},
};

/// Save clips from the archive to disk
pub struct ClipDownloader<'a> {
    archive: &'a dyn SnapshotLookup,
    content: &'a dyn ContentFetcher,
}

impl<'a> ClipDownloader<'a> {
    pub fn new(archive: &'a dyn SnapshotLookup, content: &'a dyn ContentFetcher) -> Self {
        Self { archive, content }
    }

    /// Download the clip into `out_dir`, in the best archived quality.
    ///
    /// Without `force`, a clip already on disk is skipped before any network access.
    /// Failures are reported in the outcome, never returned.
    pub fn download(&self, clip: &ClipReference, out_dir: &Path, force: bool) -> DownloadOutcome {
        match self.try_download(clip, out_dir, force) {
            Ok(outcome) => outcome,
            Err(err) => DownloadOutcome::Failed(err.to_string()),
        }
    }

    fn try_download(
        &self,
        clip: &ClipReference,
        out_dir: &Path,
        force: bool,
    ) -> Result<DownloadOutcome> {
        let file_name = clip.file_name();
        if !force {
            if let Some(existing) = find_existing(out_dir, &file_name, &clip.id)? {
                return Ok(DownloadOutcome::SkippedExisting(existing));
            }
        }

        debug!(
            "{}: best candidate is {} ({})",
            clip.id,
            clip.download_url(),
            clip.quality().map_or_else(|| "unknown quality".to_owned(), |q| q.to_string())
        );

        let dest = out_dir.join(&file_name);
        let mut last_error = None;

        for variant in clip.variants() {
            let url = match self.archived_url(&variant.url) {
                Ok(Some(url)) => url,
                Ok(None) => {
                    debug!("{}: {} is not archived", clip.id, variant.url);
                    continue;
                }
                Err(err) => {
                    debug!("{}: {err}", clip.id);
                    last_error = Some(err);
                    continue;
                }
            };

            match self.save(&url, out_dir, &dest) {
                Ok(bytes) => {
                    return Ok(DownloadOutcome::Downloaded {
                        path: dest,
                        bytes,
                        quality: variant.quality,
                    })
                }
                // The disk will not get better with another variant
                Err(err @ Error::Write { .. }) => return Err(err),
                Err(err) => {
                    debug!("{}: {err}", clip.id);
                    last_error = Some(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::NotArchived(clip.download_url().to_owned())))
    }

    /// Where to download the URL from the archive, if it is archived at all
    fn archived_url(&self, url: &str) -> Result<Option<String>> {
        if is_archive_url(url) {
            return Ok(Some(url.to_owned()));
        }

        Ok(self
            .archive
            .closest_any_scheme(url)?
            .map(|snapshot| snapshot.url))
    }

    /// Download into a temporary file next to `dest`, then move it into place.
    /// An interrupted download thus never leaves a file at `dest`.
    fn save(&self, url: &str, out_dir: &Path, dest: &Path) -> Result<u64> {
        let mut reader = self.content.open(url)?;
        let mut part = named_tempfile(out_dir)?;

        let bytes = copy_to(&mut reader, &mut part, url, dest)?;
        if bytes == 0 {
            return Err(Error::fetch(url, "Empty response"));
        }

        part.persist(dest)
            .map_err(|err| Error::write(dest, err.error))?;
        Ok(bytes)
    }
}
