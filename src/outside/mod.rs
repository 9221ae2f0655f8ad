mod browser;
mod http;
mod wayback;

use std::io::Read;

pub use browser::ChromeFetcher;
pub use http::HttpClient;
pub use wayback::Wayback;

use crate::{result::Result, types::ArchivedPageReference};

/// Interface for reading web pages
pub trait PageFetcher {
    /// Return the HTML of the page, once its content has been loaded.
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Interface for finding archived copies of URLs
pub trait SnapshotLookup {
    /// Return the snapshot closest to now, or None if the URL was never archived.
    fn closest(&self, url: &str) -> Result<Option<ArchivedPageReference>>;

    /// Same as [`SnapshotLookup::closest`], retrying with the other scheme
    /// as the archive does not always index both.
    fn closest_any_scheme(&self, url: &str) -> Result<Option<ArchivedPageReference>> {
        if let Some(snapshot) = self.closest(url)? {
            return Ok(Some(snapshot));
        }

        match other_scheme(url) {
            Some(url) => self.closest(&url),
            None => Ok(None),
        }
    }
}

/// The URL with `http` swapped for `https` and the other way around
fn other_scheme(url: &str) -> Option<String> {
    if let Some(rest) = url.strip_prefix("http://") {
        Some(format!("https://{rest}"))
    } else {
        url.strip_prefix("https://")
            .map(|rest| format!("http://{rest}"))
    }
}

/// Interface for downloading binary content
pub trait ContentFetcher {
    /// Start the download, returning a reader over the response body.
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeArchive;

    #[test]
    fn lookup_retries_with_https() {
        let archive = FakeArchive::default().with_snapshot("https://plays.tv/u/someone");

        let snapshot = archive
            .closest_any_scheme("http://plays.tv/u/someone")
            .unwrap()
            .unwrap();
        assert_eq!(snapshot.url, FakeArchive::snapshot_url("https://plays.tv/u/someone"));
        assert_eq!(archive.lookups(), 2);
    }

    #[test]
    fn lookup_stops_when_http_is_archived() {
        let archive = FakeArchive::default().with_snapshot("http://plays.tv/u/someone");

        assert!(archive
            .closest_any_scheme("http://plays.tv/u/someone")
            .unwrap()
            .is_some());
        assert_eq!(archive.lookups(), 1);
    }

    #[test]
    fn lookup_retries_with_http() {
        let archive = FakeArchive::default().with_snapshot("http://cdn.example/video/abc123/processed/720.mp4");

        let snapshot = archive
            .closest_any_scheme("https://cdn.example/video/abc123/processed/720.mp4")
            .unwrap()
            .unwrap();
        assert_eq!(
            snapshot.url,
            FakeArchive::snapshot_url("http://cdn.example/video/abc123/processed/720.mp4")
        );
        assert_eq!(archive.lookups(), 2);
    }

    #[test]
    fn unknown_schemes_are_not_retried() {
        let archive = FakeArchive::default();

        assert!(archive
            .closest_any_scheme("ftp://plays.tv/u/nobody")
            .unwrap()
            .is_none());
        assert_eq!(archive.lookups(), 1);
    }
}
