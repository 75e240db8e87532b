//! L2 (on-disk) tier of the embedding cache, keyed by content hash.

use rusqlite::{params, Connection, OptionalExtension};

use bugtriage_core::errors::BugtriageResult;

use super::bug_crud::{bytes_to_f32_vec, f32_vec_to_bytes};
use crate::to_storage_err;

pub fn get_cached_embedding(conn: &Connection, content_hash: &str) -> BugtriageResult<Option<Vec<f32>>> {
    conn.query_row(
        "SELECT embedding FROM embedding_cache WHERE content_hash = ?1",
        params![content_hash],
        |row| row.get::<_, Vec<u8>>(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
    .map(|blob| blob.map(|b| bytes_to_f32_vec(&b)))
}

/// Upsert an embedding by content hash. Wrapped in a SAVEPOINT so the
/// insert-or-update is atomic even if called from within a larger
/// transaction.
pub fn put_cached_embedding(
    conn: &Connection,
    content_hash: &str,
    embedding: &[f32],
) -> BugtriageResult<()> {
    conn.execute_batch("SAVEPOINT put_cached_embedding")
        .map_err(|e| to_storage_err(format!("put_cached_embedding savepoint: {e}")))?;

    match put_cached_embedding_inner(conn, content_hash, embedding) {
        Ok(()) => {
            conn.execute_batch("RELEASE put_cached_embedding")
                .map_err(|e| to_storage_err(format!("put_cached_embedding release: {e}")))?;
            Ok(())
        }
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK TO put_cached_embedding");
            let _ = conn.execute_batch("RELEASE put_cached_embedding");
            Err(e)
        }
    }
}

fn put_cached_embedding_inner(
    conn: &Connection,
    content_hash: &str,
    embedding: &[f32],
) -> BugtriageResult<()> {
    let blob = f32_vec_to_bytes(embedding);
    conn.execute(
        "INSERT INTO embedding_cache (content_hash, embedding, dimensions)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(content_hash) DO UPDATE SET
            embedding = excluded.embedding,
            dimensions = excluded.dimensions",
        params![content_hash, blob, embedding.len() as i64],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_returns_none() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();
        assert!(get_cached_embedding(&conn, "nope").unwrap().is_none());
    }

    #[test]
    fn put_then_get_round_trips() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        let embedding = vec![0.1f32, -0.2, 0.3];
        put_cached_embedding(&conn, "hash-a", &embedding).unwrap();

        let fetched = get_cached_embedding(&conn, "hash-a").unwrap().unwrap();
        assert_eq!(fetched, embedding);
    }

    #[test]
    fn put_overwrites_existing_hash() {
        let conn = Connection::open_in_memory().unwrap();
        crate::migrations::run_migrations(&conn).unwrap();

        put_cached_embedding(&conn, "hash-a", &[1.0, 2.0]).unwrap();
        put_cached_embedding(&conn, "hash-a", &[3.0, 4.0, 5.0]).unwrap();

        let fetched = get_cached_embedding(&conn, "hash-a").unwrap().unwrap();
        assert_eq!(fetched, vec![3.0, 4.0, 5.0]);
    }
}
