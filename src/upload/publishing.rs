//! Publishing modes understood by the remote API.

use std::fmt;

/// Whether an accepted bundle is published automatically or waits for manual
/// confirmation in the portal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishingType {
    /// Validated, then held until the user publishes it from the portal.
    #[default]
    UserManaged,
    /// Validated, then published without further confirmation.
    Automatic,
}

impl PublishingType {
    /// Query parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UserManaged => "USER_MANAGED",
            Self::Automatic => "AUTOMATIC",
        }
    }

    /// Lenient parse: only `AUTOMATIC` selects automatic publishing, anything
    /// else (including nothing) is `USER_MANAGED`.
    pub fn parse_from(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("AUTOMATIC") => Self::Automatic,
            _ => Self::UserManaged,
        }
    }
}

impl fmt::Display for PublishingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
