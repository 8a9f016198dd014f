//! Database query modules.
//!
//! - images: image record CRUD, hash lookup, and listing

pub mod images;
