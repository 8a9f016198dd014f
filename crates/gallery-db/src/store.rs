//! The image metadata catalog.
//!
//! [`CatalogStore`] is the collaborator-facing API over the `images` table.
//! It is a cheap, cloneable handle around a connection pool and can be shared
//! freely between threads.
//!
//! Every write runs in its own `BEGIN IMMEDIATE` transaction, so writers are
//! serialized by SQLite and a failed write rolls back without a trace. Reads
//! fetch each row with a single statement and never observe a half-written
//! record. Deduplication is left to the caller: [`CatalogStore::find_by_hash`]
//! reports existing records with the same content, but nothing prevents a
//! concurrent insert of the same hash between that check and a later insert.

use gallery_common::{ContentHash, Error, ImageId, Result};
use rusqlite::{Connection, TransactionBehavior};

use crate::models::{ImageRecord, NewImage};
use crate::pool::{get_conn, init_memory_pool, init_pool_with, DbPool, PoolOptions};
use crate::queries::images;

/// Rows fetched per round trip while iterating hash matches.
pub const DEFAULT_PAGE_SIZE: usize = 64;

/// Upper bound on the page size accepted by [`CatalogStore::list`].
pub const MAX_LIST_LIMIT: u32 = 100;

/// Durable store of image metadata records.
#[derive(Clone)]
pub struct CatalogStore {
    pool: DbPool,
    page_size: usize,
    max_list_limit: u32,
}

impl CatalogStore {
    /// Open (creating and migrating if needed) a file-backed catalog.
    pub fn open(db_path: &str) -> Result<Self> {
        Self::open_with(db_path, &PoolOptions::default())
    }

    /// Open a file-backed catalog with explicit pool options.
    pub fn open_with(db_path: &str, options: &PoolOptions) -> Result<Self> {
        Ok(Self::from_pool(init_pool_with(db_path, options)?))
    }

    /// Create an empty catalog that lives only as long as the store.
    pub fn in_memory() -> Result<Self> {
        Ok(Self::from_pool(init_memory_pool()?))
    }

    /// Wrap an already migrated pool.
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            pool,
            page_size: DEFAULT_PAGE_SIZE,
            max_list_limit: MAX_LIST_LIMIT,
        }
    }

    /// Set how many rows [`HashMatches`] fetches per round trip.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Set the largest page [`CatalogStore::list`] will return.
    #[must_use]
    pub fn with_max_list_limit(mut self, limit: u32) -> Self {
        self.max_list_limit = limit.max(1);
        self
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Insert a new record and return its store-assigned id.
    pub fn insert(&self, image: &NewImage) -> Result<ImageId> {
        let id = self
            .write(|conn| images::insert_image(conn, image))
            .inspect_err(|e| log_rejected("insert", None, e))?;

        tracing::debug!(%id, hash = %image.hash, "Inserted image");
        Ok(id)
    }

    /// Fetch a record by id.
    pub fn get(&self, id: ImageId) -> Result<ImageRecord> {
        let conn = get_conn(&self.pool)?;
        images::get_image(&conn, id)?.ok_or(Error::NotFound(id))
    }

    /// Lazily iterate every record whose hash equals `hash`, in insertion order.
    ///
    /// No database work happens until the iterator is first advanced.
    pub fn find_by_hash(&self, hash: &ContentHash) -> HashMatches {
        HashMatches {
            pool: self.pool.clone(),
            hash: hash.clone(),
            page_size: self.page_size,
            cursor: None,
            buffer: Vec::new().into_iter(),
            exhausted: false,
        }
    }

    /// Overwrite every field of an existing record, keeping its id.
    pub fn replace(&self, id: ImageId, image: &NewImage) -> Result<()> {
        self.write(|conn| {
            if images::replace_image(conn, id, image)? {
                Ok(())
            } else {
                Err(Error::NotFound(id))
            }
        })
        .inspect_err(|e| log_rejected("replace", Some(id), e))?;

        tracing::debug!(%id, "Replaced image");
        Ok(())
    }

    /// Remove a record. Deleting an absent id, including one that was
    /// already deleted, fails with [`Error::NotFound`].
    pub fn delete(&self, id: ImageId) -> Result<()> {
        self.write(|conn| {
            if images::delete_image(conn, id)? {
                Ok(())
            } else {
                Err(Error::NotFound(id))
            }
        })
        .inspect_err(|e| log_rejected("delete", Some(id), e))?;

        tracing::debug!(%id, "Deleted image");
        Ok(())
    }

    /// One page of records in id order. `limit` is clamped to
    /// `1..=max_list_limit`; the page starts at `page * limit`.
    pub fn list(&self, page: u32, limit: u32) -> Result<Vec<ImageRecord>> {
        let limit = limit.clamp(1, self.max_list_limit);
        let offset = u64::from(page) * u64::from(limit);

        let conn = get_conn(&self.pool)?;
        images::list_images(&conn, limit, offset)
    }

    /// Number of records currently present.
    pub fn count(&self) -> Result<u64> {
        let conn = get_conn(&self.pool)?;
        images::count_images(&conn)
    }

    /// Run `f` inside an immediate transaction, committing only on success.
    fn write<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let mut conn = get_conn(&self.pool)?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| Error::storage(e.to_string()))?;

        let value = f(&*tx)?;

        tx.commit().map_err(|e| Error::storage(e.to_string()))?;
        Ok(value)
    }
}

fn log_rejected(op: &str, id: Option<ImageId>, err: &Error) {
    match err {
        Error::Storage(_) => tracing::warn!(op, ?id, error = %err, "Catalog write failed"),
        _ => tracing::debug!(op, ?id, error = %err, "Catalog write rejected"),
    }
}

/// Lazy, finite iterator over the records matching a content hash.
///
/// Rows are fetched in pages keyed on the last id seen, so no connection is
/// held between calls to `next`. Records inserted with the same hash while
/// iterating may or may not be yielded; deleted ones already buffered still
/// are. After the first error the iterator ends.
pub struct HashMatches {
    pool: DbPool,
    hash: ContentHash,
    page_size: usize,
    cursor: Option<ImageId>,
    buffer: std::vec::IntoIter<ImageRecord>,
    exhausted: bool,
}

impl HashMatches {
    fn fetch_page(&self) -> Result<Vec<ImageRecord>> {
        let conn = get_conn(&self.pool)?;
        images::find_images_by_hash(&conn, &self.hash, self.cursor, self.page_size)
    }
}

impl Iterator for HashMatches {
    type Item = Result<ImageRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(record) = self.buffer.next() {
            self.cursor = Some(record.id);
            return Some(Ok(record));
        }
        if self.exhausted {
            return None;
        }

        match self.fetch_page() {
            Ok(page) => {
                // A short page means there is nothing left past it.
                self.exhausted = page.len() < self.page_size;
                self.buffer = page.into_iter();
                let record = self.buffer.next()?;
                self.cursor = Some(record.id);
                Some(Ok(record))
            }
            Err(e) => {
                self.exhausted = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for HashMatches {}
