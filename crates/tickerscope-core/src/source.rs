use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Canonical provider identifiers used in metadata and envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    Yahoo,
    Fixture,
}

impl ProviderId {
    pub const ALL: [Self; 2] = [Self::Yahoo, Self::Fixture];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Fixture => "fixture",
        }
    }
}

impl Display for ProviderId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
