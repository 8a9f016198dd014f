//! Gallery - image metadata catalog
//!
//! This library crate exposes configuration handling for the `gallery` binary
//! and its integration tests. The catalog itself lives in `gallery-db`.

pub mod config;
