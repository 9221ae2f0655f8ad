use serde::Deserialize;
use tracing::debug;
use ureq::Agent;

use crate::{
    result::{Error, Result},
    types::ArchivedPageReference,
};

use super::{http::fetch_error, HttpClient, SnapshotLookup};

const AVAILABILITY_API: &str = "https://archive.org/wayback/available";

/// Interface for the [Wayback Machine](https://archive.org/help/wayback_api.php) availability API
#[derive(Debug, Clone)]
pub struct Wayback {
    agent: Agent,
}

impl Wayback {
    pub fn new(http: &HttpClient) -> Self {
        Self {
            agent: http.agent().clone(),
        }
    }
}

impl SnapshotLookup for Wayback {
    fn closest(&self, url: &str) -> Result<Option<ArchivedPageReference>> {
        debug!("Looking up archived snapshots of {url}");
        let availability: Availability = self
            .agent
            .get(AVAILABILITY_API)
            .query("url", url)
            .call()
            .map_err(|err| fetch_error(AVAILABILITY_API, err))?
            .into_json()
            .map_err(|err| Error::fetch(AVAILABILITY_API, err))?;

        Ok(availability.into_snapshot())
    }
}

/// Response of the availability API.
/// `archived_snapshots` is an empty object when nothing is archived.
#[derive(Debug, Deserialize)]
struct Availability {
    #[serde(default)]
    archived_snapshots: ArchivedSnapshots,
}

#[derive(Debug, Default, Deserialize)]
struct ArchivedSnapshots {
    closest: Option<ClosestSnapshot>,
}

#[derive(Debug, Deserialize)]
struct ClosestSnapshot {
    #[serde(default)]
    available: bool,
    url: String,
    timestamp: Option<String>,
    status: Option<String>,
}

impl Availability {
    fn into_snapshot(self) -> Option<ArchivedPageReference> {
        let closest = self.archived_snapshots.closest?;
        let status_ok = closest.status.as_deref().map_or(true, |s| s == "200");
        if !closest.available || !status_ok {
            return None;
        }

        // The API answers with http links even though the archive serves https
        let url = match closest.url.strip_prefix("http://") {
            Some(rest) => format!("https://{rest}"),
            None => closest.url,
        };

        Some(ArchivedPageReference {
            url,
            timestamp: closest.timestamp,
        })
    }
}
