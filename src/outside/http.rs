use std::io::Read;

use tracing::debug;
use ureq::{Agent, AgentBuilder};

use crate::{config::Configuration, result::Error, result::Result};

use super::{ContentFetcher, PageFetcher};

/// Blocking HTTP client shared by every network access
#[derive(Debug, Clone)]
pub struct HttpClient {
    agent: Agent,
}

impl HttpClient {
    pub fn new(config: &Configuration) -> Self {
        let agent = AgentBuilder::new()
            .timeout_connect(config.timeout())
            .timeout_read(config.timeout())
            .user_agent(&config.user_agent)
            .build();

        Self { agent }
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    fn get(&self, url: &str) -> Result<ureq::Response> {
        debug!("GET {url}");
        self.agent.get(url).call().map_err(|err| fetch_error(url, err))
    }
}

/// Convert a ureq failure, non-success statuses included
pub(super) fn fetch_error(url: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, _) => Error::fetch(url, format!("HTTP status {code}")),
        err => Error::fetch(url, err),
    }
}

impl PageFetcher for HttpClient {
    fn fetch(&self, url: &str) -> Result<String> {
        self.get(url)?
            .into_string()
            .map_err(|err| Error::fetch(url, err))
    }
}

impl ContentFetcher for HttpClient {
    fn open(&self, url: &str) -> Result<Box<dyn Read + Send>> {
        Ok(self.get(url)?.into_reader())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_statuses_name_the_code() {
        let response = ureq::Response::new(404, "Not Found", "").unwrap();
        let err = fetch_error("https://cdn.example/a.mp4", ureq::Error::Status(404, response));

        assert!(matches!(&err, Error::Fetch { reason, .. } if reason == "HTTP status 404"));
        assert_eq!(err.to_string(), "Could not fetch https://cdn.example/a.mp4: HTTP status 404");
    }
}
