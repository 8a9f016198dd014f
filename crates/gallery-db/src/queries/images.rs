//! Image database queries.
//!
//! Row-level operations on the `images` table. Every function takes a plain
//! connection so it can run inside a caller-owned transaction; writes are
//! validated here before any SQL is issued.

use gallery_common::{ContentHash, Error, ImageId, Result};
use rusqlite::Connection;

use crate::models::{ImageRecord, NewImage};
use crate::validation::validate;

const IMAGE_COLUMNS: &str = "id, author, width, height, hash, path, url, mime_type";

/// Parse an image from a database row.
///
/// Expects columns in order: id, author, width, height, hash, path, url, mime_type.
fn parse_image_row(row: &rusqlite::Row) -> rusqlite::Result<ImageRecord> {
    Ok(ImageRecord {
        id: ImageId::from(row.get::<_, i64>(0)?),
        author: row.get(1)?,
        width: row.get(2)?,
        height: row.get(3)?,
        hash: ContentHash::new(row.get::<_, Vec<u8>>(4)?),
        path: row.get(5)?,
        url: row.get(6)?,
        mime_type: row.get(7)?,
    })
}

fn query_images(
    conn: &Connection,
    sql: &str,
    params: &[(&str, &dyn rusqlite::ToSql)],
) -> Result<Vec<ImageRecord>> {
    let mut stmt = conn
        .prepare_cached(sql)
        .map_err(|e| Error::storage(e.to_string()))?;

    let images = stmt
        .query_map(params, parse_image_row)
        .map_err(|e| Error::storage(e.to_string()))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::storage(e.to_string()))?;

    Ok(images)
}

/// Insert a new image record and return the id the database assigned.
///
/// # Returns
///
/// * `Ok(ImageId)` - The id of the inserted image
/// * `Err(Error::Validation)` - If a field violates its constraint
/// * `Err(Error::Storage)` - If a database error occurs
pub fn insert_image(conn: &Connection, image: &NewImage) -> Result<ImageId> {
    validate(image)?;

    conn.execute(
        "INSERT INTO images (author, width, height, hash, path, url, mime_type)
         VALUES (:author, :width, :height, :hash, :path, :url, :mime_type)",
        rusqlite::named_params! {
            ":author": &image.author,
            ":width": image.width,
            ":height": image.height,
            ":hash": image.hash.as_bytes(),
            ":path": &image.path,
            ":url": &image.url,
            ":mime_type": &image.mime_type,
        },
    )
    .map_err(|e| Error::storage(e.to_string()))?;

    Ok(ImageId::from(conn.last_insert_rowid()))
}

/// Get an image by ID.
///
/// # Returns
///
/// * `Ok(Some(ImageRecord))` - The image if found
/// * `Ok(None)` - If the image does not exist
/// * `Err(Error)` - If a database error occurs
pub fn get_image(conn: &Connection, id: ImageId) -> Result<Option<ImageRecord>> {
    let result = conn.query_row(
        &format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = :id"),
        rusqlite::named_params! { ":id": id.get() },
        parse_image_row,
    );

    match result {
        Ok(image) => Ok(Some(image)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(Error::storage(e.to_string())),
    }
}

/// Get one page of images whose hash equals `hash`, in id order.
///
/// Only rows with an id greater than `after` are returned, which lets callers
/// walk a large match set page by page without holding a statement open.
pub fn find_images_by_hash(
    conn: &Connection,
    hash: &ContentHash,
    after: Option<ImageId>,
    limit: usize,
) -> Result<Vec<ImageRecord>> {
    let after = after.map(ImageId::get).unwrap_or(0);
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    query_images(
        conn,
        &format!(
            "SELECT {IMAGE_COLUMNS} FROM images
             WHERE hash = :hash AND id > :after
             ORDER BY id
             LIMIT :limit"
        ),
        rusqlite::named_params! {
            ":hash": hash.as_bytes(),
            ":after": after,
            ":limit": limit,
        },
    )
}

/// List images in id order.
pub fn list_images(conn: &Connection, limit: u32, offset: u64) -> Result<Vec<ImageRecord>> {
    let offset = i64::try_from(offset).unwrap_or(i64::MAX);

    query_images(
        conn,
        &format!("SELECT {IMAGE_COLUMNS} FROM images ORDER BY id LIMIT :limit OFFSET :offset"),
        rusqlite::named_params! {
            ":limit": limit,
            ":offset": offset,
        },
    )
}

/// Count all stored images.
pub fn count_images(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))
        .map_err(|e| Error::storage(e.to_string()))?;

    Ok(count as u64)
}

/// Overwrite every non-id field of an existing image.
///
/// # Returns
///
/// * `Ok(true)` - If the image was replaced
/// * `Ok(false)` - If the image did not exist
/// * `Err(Error)` - If validation or the database fails
pub fn replace_image(conn: &Connection, id: ImageId, image: &NewImage) -> Result<bool> {
    validate(image)?;

    let rows_affected = conn
        .execute(
            "UPDATE images SET author = :author, width = :width, height = :height,
                    hash = :hash, path = :path, url = :url, mime_type = :mime_type
             WHERE id = :id",
            rusqlite::named_params! {
                ":id": id.get(),
                ":author": &image.author,
                ":width": image.width,
                ":height": image.height,
                ":hash": image.hash.as_bytes(),
                ":path": &image.path,
                ":url": &image.url,
                ":mime_type": &image.mime_type,
            },
        )
        .map_err(|e| Error::storage(e.to_string()))?;

    Ok(rows_affected > 0)
}

/// Delete an image by ID.
///
/// # Returns
///
/// * `Ok(true)` - If the image was deleted
/// * `Ok(false)` - If the image did not exist
/// * `Err(Error)` - If a database error occurs
pub fn delete_image(conn: &Connection, id: ImageId) -> Result<bool> {
    let rows_affected = conn
        .execute(
            "DELETE FROM images WHERE id = :id",
            rusqlite::named_params! { ":id": id.get() },
        )
        .map_err(|e| Error::storage(e.to_string()))?;

    Ok(rows_affected > 0)
}
