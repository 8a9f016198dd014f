//! Rust models matching the `images` table.

use gallery_common::{ContentHash, ImageId};
use serde::{Deserialize, Serialize};

/// A stored image metadata record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageRecord {
    pub id: ImageId,
    pub author: String,
    pub width: i32,
    pub height: i32,
    pub hash: ContentHash,
    pub path: String,
    pub url: String,
    pub mime_type: String,
}

/// An image record that has not been assigned an id yet.
///
/// Used as the payload of both inserts and whole-record replaces.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewImage {
    pub author: String,
    pub width: i32,
    pub height: i32,
    pub hash: ContentHash,
    pub path: String,
    pub url: String,
    pub mime_type: String,
}

impl ImageRecord {
    /// Attach a store-assigned id to a new image.
    pub fn from_new(id: ImageId, image: NewImage) -> Self {
        Self {
            id,
            author: image.author,
            width: image.width,
            height: image.height,
            hash: image.hash,
            path: image.path,
            url: image.url,
            mime_type: image.mime_type,
        }
    }

    /// Strip the id, e.g. to resubmit an edited record through `replace`.
    pub fn into_new(self) -> NewImage {
        NewImage {
            author: self.author,
            width: self.width,
            height: self.height,
            hash: self.hash,
            path: self.path,
            url: self.url,
            mime_type: self.mime_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewImage {
        NewImage {
            author: "alice".to_string(),
            width: 800,
            height: 600,
            hash: ContentHash::new(vec![0xde, 0xad]),
            path: "/img/1.png".to_string(),
            url: "https://cdn/1.png".to_string(),
            mime_type: "image/png".to_string(),
        }
    }

    #[test]
    fn test_from_new_and_back() {
        let record = ImageRecord::from_new(ImageId::from(3), sample());
        assert_eq!(record.id, ImageId::from(3));
        assert_eq!(record.author, "alice");
        assert_eq!(record.into_new(), sample());
    }

    #[test]
    fn test_record_json_shape() {
        let record = ImageRecord::from_new(ImageId::from(1), sample());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], 1);
        assert_eq!(json["hash"], "dead");
        assert_eq!(json["width"], 800);
        assert_eq!(json["mime_type"], "image/png");
    }
}
