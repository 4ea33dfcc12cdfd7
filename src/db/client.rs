use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::conflict::Conflict;
use super::Entity;

/// Thin handle over an injected connection pool. The crate never opens or
/// closes connections itself, and schema management lives with the caller.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Database { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Upsert `rows` under the kind's conflict policy, in chunks of at
    /// most `chunk_size` rows, one multi-row INSERT per chunk.
    ///
    /// Returns the accumulated affected-row count. The first failing chunk
    /// stops the batch; no retry. Callers keep the partial count through
    /// their own accounting since the error here carries none.
    pub async fn upsert_chunked<E: Entity>(
        &self,
        rows: &[E],
        chunk_size: usize,
    ) -> Result<u64, sqlx::Error> {
        if rows.is_empty() {
            return Ok(0);
        }
        let conflict = E::CONFLICT;
        let mut affected = 0u64;
        for chunk in rows.chunks(chunk_size.max(1)) {
            let mut query = QueryBuilder::<Sqlite>::new(format!(
                "INSERT INTO \"{}\" ({}) ",
                E::TABLE,
                E::COLUMNS.join(", ")
            ));
            query.push_values(chunk.iter(), |mut row, entity| entity.bind(&mut row));
            push_conflict_clause(&mut query, &conflict);
            affected += query.build().execute(&self.pool).await?.rows_affected();
        }
        Ok(affected)
    }

    /// All known style ids, for reference-cache seeding.
    pub async fn fetch_styles(&self) -> Result<Vec<(i64, String)>, sqlx::Error> {
        self.fetch_named("style").await
    }

    /// All known genre ids, for reference-cache seeding.
    pub async fn fetch_genres(&self) -> Result<Vec<(i64, String)>, sqlx::Error> {
        self.fetch_named("genre").await
    }

    async fn fetch_named(&self, table: &str) -> Result<Vec<(i64, String)>, sqlx::Error> {
        let rows = sqlx::query(&format!("SELECT id, name FROM \"{table}\""))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|row| (row.get("id"), row.get("name")))
            .collect())
    }
}

fn push_conflict_clause(query: &mut QueryBuilder<'_, Sqlite>, conflict: &Conflict) {
    match conflict {
        Conflict::Update { key, set } => {
            let assignments = set
                .iter()
                .map(|column| format!("{column} = excluded.{column}"))
                .collect::<Vec<_>>()
                .join(", ");
            query.push(format!(
                " ON CONFLICT({}) DO UPDATE SET {}",
                key.join(", "),
                assignments
            ));
        }
        Conflict::DoNothing => {
            query.push(" ON CONFLICT DO NOTHING");
        }
        Conflict::Touch { key } => {
            query.push(format!(
                " ON CONFLICT({}) DO UPDATE SET updated_at = CURRENT_TIMESTAMP",
                key.join(", ")
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Artist, ArtistUrl};
    use sqlx::query_builder::Separated;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_database(schema: &[&str]) -> Database {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        for statement in schema {
            sqlx::query(statement).execute(&pool).await.unwrap();
        }
        Database::new(pool)
    }

    fn artist(id: i32, name: &str) -> Artist {
        Artist {
            id,
            name: Some(name.to_string()),
            real_name: None,
            profile: Some("profile".to_string()),
            data_quality: None,
        }
    }

    #[tokio::test]
    async fn chunked_counts_sum_to_the_batch_size() {
        let db = test_database(&[
            "CREATE TABLE artist (id INTEGER PRIMARY KEY, name TEXT, real_name TEXT, profile TEXT, data_quality TEXT)",
        ])
        .await;
        let batch: Vec<Artist> = (1..=10).map(|id| artist(id, "a")).collect();
        let affected = db.upsert_chunked(&batch, 3).await.unwrap();
        assert_eq!(affected, 10);
    }

    #[tokio::test]
    async fn update_policy_refreshes_only_allow_listed_columns() {
        let db = test_database(&[
            "CREATE TABLE artist (id INTEGER PRIMARY KEY, name TEXT, real_name TEXT, profile TEXT, data_quality TEXT)",
        ])
        .await;
        db.upsert_chunked(&[artist(1, "before")], 10).await.unwrap();
        let affected = db.upsert_chunked(&[artist(1, "after")], 10).await.unwrap();
        assert_eq!(affected, 1);

        let row = sqlx::query("SELECT name, profile FROM artist WHERE id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("name"), "after");
        assert_eq!(row.get::<String, _>("profile"), "profile");
    }

    #[tokio::test]
    async fn do_nothing_policy_makes_rewrites_free() {
        let db = test_database(&[
            "CREATE TABLE artist_url (artist_id INTEGER NOT NULL, url_hash INTEGER NOT NULL, url TEXT NOT NULL, PRIMARY KEY (artist_id, url_hash))",
        ])
        .await;
        let url = ArtistUrl {
            artist_id: 1,
            url_hash: 77,
            url: "https://example.net".to_string(),
        };
        assert_eq!(db.upsert_chunked(&[url.clone()], 10).await.unwrap(), 1);
        assert_eq!(db.upsert_chunked(&[url], 10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn empty_batches_issue_no_writes() {
        let db = test_database(&[]).await;
        assert_eq!(db.upsert_chunked::<Artist>(&[], 10).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn write_failure_surfaces_the_error() {
        // no table created
        let db = test_database(&[]).await;
        let err = db.upsert_chunked(&[artist(1, "x")], 10).await.unwrap_err();
        assert!(err.to_string().contains("artist"));
    }

    /// Kind without an explicit policy: collisions only touch the
    /// bookkeeping timestamp.
    #[derive(Debug)]
    struct Bookmark {
        id: i32,
        note: String,
    }

    impl Entity for Bookmark {
        const TABLE: &'static str = "bookmark";
        const COLUMNS: &'static [&'static str] = &["id", "note"];
        const CONFLICT: Conflict = Conflict::Touch { key: &["id"] };

        fn bind(&self, row: &mut Separated<'_, '_, Sqlite, &'static str>) {
            row.push_bind(self.id).push_bind(self.note.clone());
        }
    }

    #[tokio::test]
    async fn touch_policy_leaves_data_columns_alone() {
        let db = test_database(&[
            "CREATE TABLE bookmark (id INTEGER PRIMARY KEY, note TEXT, updated_at TEXT)",
        ])
        .await;
        db.upsert_chunked(
            &[Bookmark {
                id: 1,
                note: "original".to_string(),
            }],
            10,
        )
        .await
        .unwrap();
        db.upsert_chunked(
            &[Bookmark {
                id: 1,
                note: "changed".to_string(),
            }],
            10,
        )
        .await
        .unwrap();

        let row = sqlx::query("SELECT note, updated_at FROM bookmark WHERE id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(row.get::<String, _>("note"), "original");
        assert!(row.get::<Option<String>, _>("updated_at").is_some());
    }
}
