//! Gallery-DB: the image metadata catalog.
//!
//! This crate stores image metadata records in SQLite using rusqlite and r2d2
//! connection pooling.
//!
//! # Modules
//!
//! - `migrations` - Database schema migrations
//! - `pool` - Connection pool management
//! - `models` - Rust models matching the database schema
//! - `validation` - Field constraints checked before every write
//! - `queries` - Row-level query operations
//! - `store` - [`CatalogStore`], the thread-safe catalog API
//!
//! # Example
//!
//! ```
//! use gallery_common::ContentHash;
//! use gallery_db::{CatalogStore, NewImage};
//!
//! let store = CatalogStore::in_memory().unwrap();
//! let image = NewImage {
//!     author: "alice".to_string(),
//!     width: 800,
//!     height: 600,
//!     hash: ContentHash::sha256(b"pixels"),
//!     path: "/img/1.png".to_string(),
//!     url: "https://cdn.example/1.png".to_string(),
//!     mime_type: "image/png".to_string(),
//! };
//!
//! // Check for an existing copy before inserting a new one.
//! if store.find_by_hash(&image.hash).next().is_none() {
//!     let id = store.insert(&image).unwrap();
//!     assert_eq!(store.get(id).unwrap().author, "alice");
//! }
//! ```

pub mod migrations;
pub mod models;
pub mod pool;
pub mod queries;
pub mod store;
pub mod validation;

pub use models::{ImageRecord, NewImage};
pub use store::{CatalogStore, HashMatches};
