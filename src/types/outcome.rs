use std::{fmt::Display, path::PathBuf};

use super::{ClipId, Quality};

/// What happened to one clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Downloaded {
        path: PathBuf,
        bytes: u64,
        quality: Option<Quality>,
    },
    SkippedExisting(PathBuf),
    Failed(String),
}

/// Tally of the outcomes of a run
#[derive(Debug, Default)]
pub struct Summary {
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: Vec<(ClipId, String)>,
}

impl Summary {
    pub fn record(&mut self, id: &str, outcome: &DownloadOutcome) {
        match outcome {
            DownloadOutcome::Downloaded { .. } => self.downloaded += 1,
            DownloadOutcome::SkippedExisting(_) => self.skipped += 1,
            DownloadOutcome::Failed(reason) => self.failed.push((id.to_owned(), reason.clone())),
        }
    }

    pub fn total(&self) -> usize {
        self.downloaded + self.skipped + self.failed.len()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped, {} failed",
            self.downloaded,
            self.skipped,
            self.failed.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tallies_every_outcome() {
        let mut summary = Summary::default();
        summary.record(
            "a",
            &DownloadOutcome::Downloaded {
                path: "a.mp4".into(),
                bytes: 3,
                quality: None,
            },
        );
        summary.record("b", &DownloadOutcome::SkippedExisting("b.mp4".into()));
        summary.record("c", &DownloadOutcome::Failed("HTTP status 404".to_owned()));

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.failed, [("c".to_owned(), "HTTP status 404".to_owned())]);
        assert_eq!(summary.to_string(), "1 downloaded, 1 skipped, 1 failed");
    }
}
