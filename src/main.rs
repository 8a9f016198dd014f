mod cli;

use gallery::config::{self, Config};
use gallery_common::ContentHash;
use gallery_db::pool::get_conn;
use gallery_db::{migrations, CatalogStore, NewImage};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, ImageArgs};
use serde::Serialize;
use std::path::Path;

fn open_store(config: &Config) -> Result<CatalogStore> {
    let database = &config.database;

    let store = if database.is_memory() {
        CatalogStore::in_memory()?
    } else {
        if let Some(parent) = database.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create database directory: {:?}", parent))?;
        }
        let path = database
            .path
            .to_str()
            .with_context(|| format!("Database path is not valid UTF-8: {:?}", database.path))?;
        CatalogStore::open_with(path, &database.pool_options())?
    };

    Ok(store.with_max_list_limit(config.listing.max_limit))
}

fn to_new_image(args: ImageArgs) -> Result<NewImage> {
    let hash = match (&args.hash, &args.file) {
        (Some(hex), _) => ContentHash::from_hex(hex)?,
        (None, Some(file)) => {
            let bytes = std::fs::read(file)
                .with_context(|| format!("Failed to read image file: {:?}", file))?;
            ContentHash::sha256(&bytes)
        }
        (None, None) => anyhow::bail!("either --hash or --file is required"),
    };

    Ok(NewImage {
        author: args.author,
        width: args.width,
        height: args.height,
        hash,
        path: args.path,
        url: args.url,
        mime_type: args.mime_type,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_catalog(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    let conn = get_conn(store.pool())?;
    let version = migrations::current_version(&conn)?;

    println!(
        "Catalog ready at {} (schema version {})",
        config.database.path.display(),
        version
    );
    Ok(())
}

fn find_images(store: &CatalogStore, hash: &str) -> Result<()> {
    let hash = ContentHash::from_hex(hash)?;
    let records = store
        .find_by_hash(&hash)
        .collect::<gallery_common::Result<Vec<_>>>()?;

    tracing::debug!(%hash, matches = records.len(), "Hash lookup");
    print_json(&records)
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(path)?;
    config::validate_config(&config)?;

    match path {
        Some(p) => println!("Configuration {} is valid", p.display()),
        None => println!("Configuration is valid"),
    }
    println!("  Database: {}", config.database.path.display());
    println!("  Pool size: {}", config.database.pool_size);
    println!(
        "  Listing: default {} / max {}",
        config.listing.default_limit, config.listing.max_limit
    );
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    let database = cli.database;
    let settings = || -> Result<Config> {
        let mut config = config::load_config_or_default(config_path.as_deref())?;
        if let Some(path) = &database {
            config.database.path = path.clone();
        }
        Ok(config)
    };
    let store = || -> Result<CatalogStore> { open_store(&settings()?) };

    match cli.command {
        Commands::Init => init_catalog(&settings()?),
        Commands::Insert(args) => {
            let id = store()?.insert(&to_new_image(args)?)?;
            println!("{}", id);
            Ok(())
        }
        Commands::Get { id } => print_json(&store()?.get(id)?),
        Commands::Find { hash } => find_images(&store()?, &hash),
        Commands::Replace { id, image } => {
            store()?.replace(id, &to_new_image(image)?)?;
            println!("Replaced image {}", id);
            Ok(())
        }
        Commands::Delete { id } => {
            store()?.delete(id)?;
            println!("Deleted image {}", id);
            Ok(())
        }
        Commands::List { page, limit } => {
            let config = settings()?;
            let limit = limit.unwrap_or(config.listing.default_limit);
            print_json(&open_store(&config)?.list(page, limit)?)
        }
        Commands::Count => {
            println!("{}", store()?.count()?);
            Ok(())
        }
        Commands::Validate { config: path } => {
            validate_config(path.as_deref().or(config_path.as_deref()))
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "gallery=debug,gallery_db=debug".to_string()
        } else {
            "gallery=warn,gallery_db=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli);
    if let Err(e) = &result {
        if let Some(err) = e.downcast_ref::<gallery_common::Error>() {
            if err.is_retryable() {
                tracing::warn!("Storage failure, the operation can be retried: {}", err);
            }
        }
    }
    result
}
