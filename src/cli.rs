use clap::{Args, Parser, Subcommand};
use gallery_common::ImageId;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gallery")]
#[command(author, version, about = "Image metadata catalog with content-hash lookup")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file to use instead of the configured one
    #[arg(short, long, global = true)]
    pub database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the catalog database and apply migrations
    Init,

    /// Add an image record and print its id
    Insert(ImageArgs),

    /// Print an image record as JSON
    Get {
        /// Record id
        id: ImageId,
    },

    /// Print every record with the given content hash
    Find {
        /// Content hash in hex
        hash: String,
    },

    /// Overwrite every field of an existing record
    Replace {
        /// Record id
        id: ImageId,

        #[command(flatten)]
        image: ImageArgs,
    },

    /// Remove an image record
    Delete {
        /// Record id
        id: ImageId,
    },

    /// Print a page of records as JSON
    List {
        /// Zero-based page number
        #[arg(long, default_value = "0")]
        page: u32,

        /// Records per page (defaults to listing.default_limit)
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Print the number of records
    Count,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },
}

/// Fields of an image record as given on the command line.
#[derive(Args)]
pub struct ImageArgs {
    /// Author of the image
    #[arg(long)]
    pub author: String,

    /// Width in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub width: i32,

    /// Height in pixels
    #[arg(long, allow_negative_numbers = true)]
    pub height: i32,

    /// Content hash in hex
    #[arg(long, required_unless_present = "file", conflicts_with = "file")]
    pub hash: Option<String>,

    /// Compute the content hash (SHA-256) from this file
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Storage location of the image
    #[arg(long)]
    pub path: String,

    /// Public URL of the image
    #[arg(long)]
    pub url: String,

    /// MIME type of the image
    #[arg(long)]
    pub mime_type: String,
}
