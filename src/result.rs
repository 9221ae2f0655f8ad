use std::{fmt::Display, path::PathBuf};

use miette::miette;

#[derive(Debug)]
pub enum Error {
    /// The archive has no snapshot of the URL
    NotArchived(String),

    /// Network failure, timeout or non-success response
    Fetch { url: String, reason: String },

    /// Filesystem failure while saving a clip
    Write { path: PathBuf, reason: String },

    Miette(miette::Report),
}

impl Error {
    pub fn fetch(url: &str, reason: impl Display) -> Self {
        Error::Fetch {
            url: url.to_owned(),
            reason: reason.to_string(),
        }
    }

    pub fn write(path: impl Into<PathBuf>, reason: impl Display) -> Self {
        Error::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NotArchived(url) => write!(f, "No archived snapshot of {url}"),
            Error::Fetch { url, reason } => write!(f, "Could not fetch {url}: {reason}"),
            Error::Write { path, reason } => {
                write!(f, "Could not write {}: {reason}", path.display())
            }
            Error::Miette(report) => write!(f, "{report}"),
        }
    }
}

impl From<miette::Report> for Error {
    fn from(err: miette::Report) -> Self {
        Error::Miette(err)
    }
}

impl From<Error> for miette::Report {
    fn from(err: Error) -> Self {
        match err {
            Error::Miette(err) => err,
            err => miette!("{err}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_keep_their_message() {
        let report: miette::Report = Error::NotArchived("http://plays.tv/u/nobody".to_owned()).into();
        assert_eq!(report.to_string(), "No archived snapshot of http://plays.tv/u/nobody");

        let err = Error::from(miette!("inner"));
        assert_eq!(miette::Report::from(err).to_string(), "inner");
    }

    #[test]
    fn fetch_error_names_the_url() {
        let err = Error::fetch("https://example.org/a.mp4", "HTTP status 404");
        assert_eq!(
            err.to_string(),
            "Could not fetch https://example.org/a.mp4: HTTP status 404"
        );
    }
}
