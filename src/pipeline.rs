use tracing::{info, warn};

use crate::{
    config::Configuration,
    downloader::ClipDownloader,
    extractor::ClipLinkExtractor,
    io::remove_partials,
    outside::{ContentFetcher, PageFetcher, SnapshotLookup},
    ranking::HighestResolution,
    resolver::ArchiveResolver,
    result::{Error, Result},
    types::{DownloadOutcome, Summary, Username},
};

/// Resolve the clips of a user, then download them one after the other
pub struct Pipeline<'a> {
    config: &'a Configuration,
    archive: &'a dyn SnapshotLookup,
    content: &'a dyn ContentFetcher,
    extractor: ClipLinkExtractor,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Configuration,
        archive: &'a dyn SnapshotLookup,
        content: &'a dyn ContentFetcher,
    ) -> Self {
        Self {
            config,
            archive,
            content,
            extractor: ClipLinkExtractor::new(config.qualities.clone(), Box::new(HighestResolution)),
        }
    }

    /// Run the whole recovery.
    ///
    /// `pages` is only needed to find the clips and is dropped as soon as they are
    /// known, whether that succeeded or not.
    /// Only failing to find the clips is an error, failed downloads are in the summary.
    pub fn run(&self, username: &Username, pages: Box<dyn PageFetcher>) -> Result<Summary> {
        let resolver =
            ArchiveResolver::new(pages.as_ref(), self.archive, &self.extractor, self.config.max_pages);
        let clips = resolver.resolve(username);
        drop(pages);
        let clips = clips?;

        let out_dir = &self.config.path;
        std::fs::create_dir_all(out_dir).map_err(|err| Error::write(out_dir, err))?;
        match remove_partials(out_dir) {
            Ok(0) => {}
            Ok(n) => info!("Removed {n} unfinished downloads of an earlier run"),
            Err(err) => warn!("{err}"),
        }

        let total = clips.len();
        if clips.is_empty() {
            warn!("No clip found in the archived profile of {username}");
        } else {
            info!("{total} clips to recover into {}", out_dir.display());
        }

        let downloader = ClipDownloader::new(self.archive, self.content);
        let mut summary = Summary::default();

        for (i, clip) in clips.iter().enumerate() {
            let outcome = downloader.download(clip, out_dir, self.config.force);
            let progress = format!("[{}/{total}]", i + 1);

            match &outcome {
                DownloadOutcome::Downloaded {
                    path,
                    bytes,
                    quality,
                } => {
                    let quality =
                        quality.map_or_else(|| "unknown quality".to_owned(), |q| q.to_string());
                    info!(
                        "{progress} Saved {} ({quality}, {})",
                        path.display(),
                        human_size(*bytes)
                    );
                }
                DownloadOutcome::SkippedExisting(path) => {
                    info!("{progress} Skipped {}, already saved as {}", clip.id, path.display());
                }
                DownloadOutcome::Failed(reason) => {
                    warn!("{progress} Could not download {}: {reason}", clip.id);
                }
            }

            summary.record(&clip.id, &outcome);
        }

        Ok(summary)
    }
}

fn human_size(bytes: u64) -> String {
    const MIB: f64 = 1024.0 * 1024.0;
    if bytes < 1024 * 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MiB", bytes as f64 / MIB)
    }
}
