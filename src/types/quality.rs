use std::{fmt::Display, str::FromStr};

use serde::Deserialize;

/// Vertical resolution of a clip encoding, e.g. `720` for 720p.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(transparent)]
pub struct Quality(u16);

impl Quality {
    pub const fn new(lines: u16) -> Self {
        Self(lines)
    }

    pub fn lines(self) -> u16 {
        self.0
    }
}

impl FromStr for Quality {
    type Err = Box<dyn std::error::Error + Sync + Send>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let digits = s.strip_suffix('p').unwrap_or(&s);
        match digits.parse()? {
            0 => Err(Box::from("Quality cannot be 0")),
            lines => Ok(Self(lines)),
        }
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}p", self.0)
    }
}
