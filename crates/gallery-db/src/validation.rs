//! Field validation applied before every write.
//!
//! Fields are checked in declaration order and the first violation wins, so a
//! caller always sees the same error for the same input.

use gallery_common::ValidationError;

use crate::models::NewImage;

pub const MAX_AUTHOR_LEN: usize = 255;
pub const MAX_PATH_LEN: usize = 255;
pub const MAX_URL_LEN: usize = 512;
pub const MAX_MIME_TYPE_LEN: usize = 255;

/// Check that `image` satisfies every column constraint of the `images` table.
pub fn validate(image: &NewImage) -> Result<(), ValidationError> {
    check_text("author", &image.author, MAX_AUTHOR_LEN)?;
    check_dimension("width", image.width)?;
    check_dimension("height", image.height)?;
    if image.hash.is_empty() {
        return Err(ValidationError::EmptyField { field: "hash" });
    }
    check_text("path", &image.path, MAX_PATH_LEN)?;
    check_text("url", &image.url, MAX_URL_LEN)?;
    check_text("mime_type", &image.mime_type, MAX_MIME_TYPE_LEN)?;
    Ok(())
}

fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::EmptyField { field });
    }
    // SQLite's length() stops at the first NUL, so the table's CHECK
    // constraints only agree with this count for NUL-free text.
    if value.contains('\0') {
        return Err(ValidationError::NulCharacter { field });
    }
    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong { field, len, max });
    }
    Ok(())
}

fn check_dimension(field: &'static str, value: i32) -> Result<(), ValidationError> {
    if value <= 0 {
        return Err(ValidationError::NonPositiveDimension { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_common::ContentHash;

    fn valid() -> NewImage {
        NewImage {
            author: "alice".to_string(),
            width: 100,
            height: 100,
            hash: ContentHash::new(vec![0x01]),
            path: "p".to_string(),
            url: "u".to_string(),
            mime_type: "image/jpeg".to_string(),
        }
    }

    #[test]
    fn test_valid_image_passes() {
        assert_eq!(validate(&valid()), Ok(()));
    }

    #[test]
    fn test_empty_author() {
        let image = NewImage {
            author: String::new(),
            ..valid()
        };
        assert_eq!(
            validate(&image),
            Err(ValidationError::EmptyField { field: "author" })
        );
    }

    #[test]
    fn test_non_positive_dimensions() {
        let image = NewImage { width: 0, ..valid() };
        assert_eq!(
            validate(&image),
            Err(ValidationError::NonPositiveDimension {
                field: "width",
                value: 0
            })
        );

        let image = NewImage {
            height: -1,
            ..valid()
        };
        assert_eq!(
            validate(&image),
            Err(ValidationError::NonPositiveDimension {
                field: "height",
                value: -1
            })
        );
    }

    #[test]
    fn test_empty_hash() {
        let image = NewImage {
            hash: ContentHash::new(Vec::new()),
            ..valid()
        };
        assert_eq!(
            validate(&image),
            Err(ValidationError::EmptyField { field: "hash" })
        );
    }

    #[test]
    fn test_length_limits() {
        let image = NewImage {
            url: "u".repeat(MAX_URL_LEN),
            path: "p".repeat(MAX_PATH_LEN),
            ..valid()
        };
        assert!(validate(&image).is_ok());

        let image = NewImage {
            url: "u".repeat(MAX_URL_LEN + 1),
            ..valid()
        };
        assert_eq!(
            validate(&image),
            Err(ValidationError::TooLong {
                field: "url",
                len: 513,
                max: 512
            })
        );
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 255 two-byte characters is within the author limit.
        let image = NewImage {
            author: "é".repeat(MAX_AUTHOR_LEN),
            ..valid()
        };
        assert!(validate(&image).is_ok());
    }

    #[test]
    fn test_nul_characters_rejected() {
        let image = NewImage {
            author: "\0alice".to_string(),
            ..valid()
        };
        assert_eq!(
            validate(&image),
            Err(ValidationError::NulCharacter { field: "author" })
        );

        // Would slip past length(mime_type) <= 255 if stored.
        let image = NewImage {
            mime_type: format!("image/png\0{}", "x".repeat(300)),
            ..valid()
        };
        assert_eq!(
            validate(&image),
            Err(ValidationError::NulCharacter { field: "mime_type" })
        );
    }

    #[test]
    fn test_first_violation_wins() {
        let image = NewImage {
            author: String::new(),
            width: 0,
            mime_type: String::new(),
            ..valid()
        };
        assert_eq!(validate(&image).unwrap_err().field(), "author");

        let image = NewImage {
            width: -5,
            mime_type: String::new(),
            ..valid()
        };
        assert_eq!(validate(&image).unwrap_err().field(), "width");
    }
}
