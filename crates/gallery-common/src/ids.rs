//! Typed ID wrapper for catalog records.
//!
//! Record ids are 64-bit integers assigned by the store. Wrapping them keeps a
//! raw pixel dimension or row count from being passed where an id is expected.

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of an image record.
///
/// Ids are handed out monotonically and are never reused, even after the
/// record they named has been deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(i64);

impl ImageId {
    /// The raw integer value as stored in the database.
    #[must_use]
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for ImageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<ImageId> for i64 {
    fn from(id: ImageId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ImageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ImageId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_id_conversion() {
        let id = ImageId::from(17);
        assert_eq!(id.get(), 17);
        assert_eq!(i64::from(id), 17);
        assert_eq!(id.to_string(), "17");
    }

    #[test]
    fn test_image_id_parse() {
        assert_eq!("99".parse::<ImageId>().unwrap(), ImageId::from(99));
        assert!("abc".parse::<ImageId>().is_err());
    }

    #[test]
    fn test_image_id_ordering() {
        assert!(ImageId::from(1) < ImageId::from(2));
    }

    #[test]
    fn test_image_id_serializes_as_integer() {
        let id = ImageId::from(5);
        assert_eq!(serde_json::to_string(&id).unwrap(), "5");
        let back: ImageId = serde_json::from_str("5").unwrap();
        assert_eq!(back, id);
    }
}
