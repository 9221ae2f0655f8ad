use std::{fmt::Display, ops::Deref, str::FromStr};

/// A PlaysTV profile name. Only guaranteed to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    /// URL of the live profile page, as it was crawled by the archive
    pub fn profile_url(&self) -> String {
        format!("http://plays.tv/u/{}", self.0)
    }
}

impl FromStr for Username {
    type Err = Box<dyn std::error::Error + Sync + Send>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Err(Box::from("Username cannot be empty"))
        } else {
            Ok(Self(s.to_owned()))
        }
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Deref for Username {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
