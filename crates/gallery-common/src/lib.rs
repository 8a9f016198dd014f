//! Gallery-Common: Shared types and error handling for the gallery catalog.
//!
//! This crate provides the vocabulary shared by the storage layer and the CLI:
//!
//! - **Typed IDs**: [`ImageId`], the store-assigned identity of a record
//! - **Content hashes**: [`ContentHash`], the binary fingerprint used for dedup lookups
//! - **Error Handling**: the catalog error taxonomy and a `Result` alias
//!
//! # Examples
//!
//! ```
//! use gallery_common::{ContentHash, Error, ImageId, Result};
//!
//! let hash = ContentHash::sha256(b"raw image bytes");
//! assert_eq!(hash.len(), 32);
//!
//! fn lookup(id: ImageId) -> Result<()> {
//!     Err(Error::NotFound(id))
//! }
//! assert!(lookup(ImageId::from(7)).is_err());
//! ```

pub mod error;
pub mod hash;
pub mod ids;

pub use error::{Error, Result, ValidationError};
pub use hash::ContentHash;
pub use ids::ImageId;
