//! Domain primitives for the catalog engine.
//!
//! Strongly typed wrappers around upstream identifiers and the media-kind
//! discriminator, so movie and series ids cannot be mixed with row ids or
//! raw integers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier assigned by the upstream metadata provider to a title.
///
/// Unique per media kind, not globally: movie `603` and series `603` are
/// different titles. Always paired with a [`MediaKind`] at the boundaries.
///
/// # Examples
///
/// ```rust
/// use vodarr::domain::TmdbId;
///
/// let id = TmdbId::new(603);
/// assert_eq!(id.value(), 603);
/// assert_eq!(id.to_string(), "603");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TmdbId(i64);

impl TmdbId {
    /// Creates a new `TmdbId` from a raw i64 value.
    ///
    /// # Panics
    ///
    /// Panics in debug mode if `id` is not positive. Upstream ids start at 1.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        debug_assert!(id > 0, "TmdbId should be positive");
        Self(id)
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub const fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TmdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TmdbId> for i64 {
    fn from(id: TmdbId) -> Self {
        id.0
    }
}

impl From<i64> for TmdbId {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}

impl Serialize for TmdbId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for TmdbId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let id = i64::deserialize(deserializer)?;
        Ok(Self::new(id))
    }
}

/// Discriminator between the two catalog tables.
///
/// Serialized as `"movie"` / `"series"`. Parsing also accepts the metadata
/// provider's `tv` spelling so values coming off its search payloads map
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Movie,
    Series,
}

impl MediaKind {
    /// Canonical lowercase name used in logs and config.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    #[must_use]
    pub const fn is_series(&self) -> bool {
        matches!(self, Self::Series)
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "movie" | "filme" => Ok(Self::Movie),
            "series" | "serie" | "tv" => Ok(Self::Series),
            other => Err(format!("unknown media kind '{other}' (use movie or series)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmdb_id_conversions() {
        let id = TmdbId::new(603);
        assert_eq!(id.value(), 603);
        assert_eq!(id.to_string(), "603");
        assert_eq!(i64::from(id), 603);
        assert_eq!(TmdbId::from(603), id);
    }

    #[test]
    fn tmdb_id_serialization() {
        let id = TmdbId::new(27205);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "27205");
        let back: TmdbId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn media_kind_parsing() {
        assert_eq!("movie".parse::<MediaKind>().unwrap(), MediaKind::Movie);
        assert_eq!("tv".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert_eq!("SERIES".parse::<MediaKind>().unwrap(), MediaKind::Series);
        assert!("podcast".parse::<MediaKind>().is_err());
    }

    #[test]
    fn media_kind_serialization() {
        assert_eq!(serde_json::to_string(&MediaKind::Movie).unwrap(), "\"movie\"");
        let kind: MediaKind = serde_json::from_str("\"series\"").unwrap();
        assert_eq!(kind, MediaKind::Series);
    }
}
