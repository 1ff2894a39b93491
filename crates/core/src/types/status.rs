//! Status enums for stored entities.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when a status value is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown contact status: {0}")]
pub struct ContactStatusError(pub String);

/// Handling status of a contact submission.
///
/// Submissions start as `New`; only an admin moves them along. Nothing is
/// ever deleted - `Archived` is the terminal state.
///
/// Stored as the `site.contact_status` enum; repositories cast through text
/// using [`ContactStatus::as_str`] and [`str::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl ContactStatus {
    /// Returns the lowercase status name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
            Self::Archived => "archived",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactStatus {
    type Err = ContactStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            "archived" => Ok(Self::Archived),
            _ => Err(ContactStatusError(s.to_owned())),
        }
    }
}
