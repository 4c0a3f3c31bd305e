//! SQLite-backed stores.
//!
//! Two tables: `name_translations` (primary text -> secondary text, no
//! uniqueness constraint on the key) and `locale_fallback_names` (legacy
//! positional text keyed by group, slot and language).

use std::str::FromStr;

use async_trait::async_trait;
use placard_core::{
    Error, FallbackEntry, FallbackStore, LanguageCode, NewTranslation, Result, TranslationEntry,
    TranslationStore,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS name_translations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        primary_text TEXT NOT NULL,
        secondary_text TEXT NOT NULL DEFAULT ''
    )",
    "CREATE INDEX IF NOT EXISTS idx_name_translations_primary
        ON name_translations (primary_text COLLATE NOCASE)",
    "CREATE TABLE IF NOT EXISTS locale_fallback_names (
        group_name TEXT NOT NULL,
        slot_index INTEGER NOT NULL,
        lang TEXT NOT NULL,
        text TEXT NOT NULL,
        PRIMARY KEY (group_name, slot_index, lang)
    )",
];

#[derive(sqlx::FromRow)]
struct TranslationRow {
    id: i64,
    primary_text: String,
    secondary_text: String,
}

impl From<TranslationRow> for TranslationEntry {
    fn from(row: TranslationRow) -> Self {
        Self {
            id: row.id,
            primary_text: row.primary_text,
            secondary_text: row.secondary_text,
        }
    }
}

#[derive(sqlx::FromRow)]
struct FallbackRow {
    group_name: String,
    slot_index: i64,
    lang: String,
    text: String,
}

fn db_error(context: &'static str) -> impl FnOnce(sqlx::Error) -> Error {
    move |e| Error::persistence_with_source(format!("{context}: {e}"), e)
}

/// Translation and fallback tables in a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens (creating if missing) the database at `url`.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(db_error("invalid database url"))?
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(db_error("failed to open database"))?;
        log::info!("Opened translation store at {url}");
        Ok(Self { pool })
    }

    /// Opens a private in-memory database.
    ///
    /// The pool is pinned to one long-lived connection; an in-memory
    /// SQLite database disappears with its last connection.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(db_error("invalid database url"))?;
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(db_error("failed to open in-memory database"))?;
        Ok(Self { pool })
    }

    /// Creates the tables if they do not exist yet.
    pub async fn init_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(*statement)
                .execute(&self.pool)
                .await
                .map_err(db_error("failed to create schema"))?;
        }
        log::debug!("Translation schema ready");
        Ok(())
    }
}

#[async_trait]
impl TranslationStore for SqliteStore {
    async fn list_all(&self) -> Result<Vec<TranslationEntry>> {
        let rows = sqlx::query_as::<_, TranslationRow>(
            "SELECT id, primary_text, secondary_text FROM name_translations ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("failed to list translations"))?;
        Ok(rows.into_iter().map(TranslationEntry::from).collect())
    }

    async fn insert(&self, entry: NewTranslation) -> Result<TranslationEntry> {
        let result = sqlx::query(
            "INSERT INTO name_translations (primary_text, secondary_text) VALUES (?, ?)",
        )
        .bind(&entry.primary_text)
        .bind(&entry.secondary_text)
        .execute(&self.pool)
        .await
        .map_err(db_error("failed to insert translation"))?;

        log::debug!("Inserted translation for '{}'", entry.primary_text);
        Ok(TranslationEntry {
            id: result.last_insert_rowid(),
            primary_text: entry.primary_text,
            secondary_text: entry.secondary_text,
        })
    }

    async fn insert_batch(&self, entries: Vec<NewTranslation>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("failed to begin transaction"))?;
        for entry in &entries {
            sqlx::query(
                "INSERT INTO name_translations (primary_text, secondary_text) VALUES (?, ?)",
            )
            .bind(&entry.primary_text)
            .bind(&entry.secondary_text)
            .execute(&mut *tx)
            .await
            .map_err(db_error("failed to insert translation"))?;
        }
        tx.commit()
            .await
            .map_err(db_error("failed to commit translations"))?;
        log::debug!("Committed {} seeded translations", entries.len());
        Ok(())
    }

    async fn update_secondary(&self, id: i64, secondary_text: &str) -> Result<()> {
        let result = sqlx::query("UPDATE name_translations SET secondary_text = ? WHERE id = ?")
            .bind(secondary_text)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("failed to update translation"))?;
        if result.rows_affected() == 0 {
            return Err(Error::persistence(format!("no translation with id {id}")));
        }
        Ok(())
    }
}

#[async_trait]
impl FallbackStore for SqliteStore {
    async fn put_fallback(&self, entry: FallbackEntry) -> Result<()> {
        let slot_index = i64::try_from(entry.slot_index)
            .map_err(|_| Error::invalid_input(format!("slot index {} too large", entry.slot_index)))?;
        sqlx::query(
            "INSERT INTO locale_fallback_names (group_name, slot_index, lang, text)
             VALUES (?, ?, ?, ?)
             ON CONFLICT (group_name, slot_index, lang) DO UPDATE SET text = excluded.text",
        )
        .bind(&entry.group)
        .bind(slot_index)
        .bind(entry.language.as_str())
        .bind(&entry.text)
        .execute(&self.pool)
        .await
        .map_err(db_error("failed to store fallback text"))?;
        Ok(())
    }

    async fn get_fallback(
        &self,
        group: &str,
        slot_index: usize,
        language: &LanguageCode,
    ) -> Result<Option<FallbackEntry>> {
        let slot = i64::try_from(slot_index)
            .map_err(|_| Error::invalid_input(format!("slot index {slot_index} too large")))?;
        let row = sqlx::query_as::<_, FallbackRow>(
            "SELECT group_name, slot_index, lang, text FROM locale_fallback_names
             WHERE group_name = ? AND slot_index = ? AND lang = ?",
        )
        .bind(group)
        .bind(slot)
        .bind(language.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("failed to read fallback text"))?;

        row.map(|row| {
            Ok(FallbackEntry {
                group: row.group_name,
                slot_index: usize::try_from(row.slot_index).map_err(|_| {
                    Error::persistence(format!("stored slot index {} is invalid", row.slot_index))
                })?,
                language: LanguageCode::new(&row.lang)?,
                text: row.text,
            })
        })
        .transpose()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn store() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        store.init_schema().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let store = store().await;
        store.init_schema().await.unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_list_in_id_order() {
        let store = store().await;
        let a = store.insert(NewTranslation::seed("MAIN")).await.unwrap();
        let b = store
            .insert(NewTranslation {
                primary_text: "TIE".into(),
                secondary_text: "ટાઇ".into(),
            })
            .await
            .unwrap();
        assert!(a.id < b.id);

        let all = store.list_all().await.unwrap();
        assert_eq!(all, vec![a, b]);
    }

    #[tokio::test]
    async fn test_duplicate_keys_are_allowed() {
        let store = store().await;
        store.insert(NewTranslation::seed("Main")).await.unwrap();
        store.insert(NewTranslation::seed("MAIN")).await.unwrap();
        assert_eq!(store.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_insert_batch() {
        let store = store().await;
        store
            .insert_batch(vec![NewTranslation::seed("A"), NewTranslation::seed("B")])
            .await
            .unwrap();
        store.insert_batch(Vec::new()).await.unwrap();
        let keys: Vec<_> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.primary_text)
            .collect();
        assert_eq!(keys, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn test_update_secondary() {
        let store = store().await;
        let e = store.insert(NewTranslation::seed("MAIN")).await.unwrap();
        store.update_secondary(e.id, "મુખ્ય").await.unwrap();
        assert_eq!(store.list_all().await.unwrap()[0].secondary_text, "મુખ્ય");

        let err = store.update_secondary(9999, "x").await.unwrap_err();
        assert!(err.to_string().contains("9999"));
    }

    #[tokio::test]
    async fn test_fallback_upserts() {
        let store = store().await;
        let gu = LanguageCode::new("gu").unwrap();
        let entry = FallbackEntry {
            group: "breaker-names".into(),
            slot_index: 3,
            language: gu.clone(),
            text: "first".into(),
        };
        store.put_fallback(entry.clone()).await.unwrap();
        store
            .put_fallback(FallbackEntry {
                text: "second".into(),
                ..entry
            })
            .await
            .unwrap();

        let row = store.get_fallback("breaker-names", 3, &gu).await.unwrap().unwrap();
        assert_eq!(row.text, "second");
        assert!(store.get_fallback("breaker-names", 4, &gu).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_schema_is_persistence_error() {
        let store = SqliteStore::in_memory().await.unwrap();
        let err = store.list_all().await.unwrap_err();
        assert_eq!(err.kind(), placard_core::ErrorKind::PersistenceFailed);
    }

    #[tokio::test]
    async fn test_file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("placard.db").display());

        let store = SqliteStore::connect(&url, 2).await.unwrap();
        store.init_schema().await.unwrap();
        store.insert(NewTranslation::seed("MAIN")).await.unwrap();
        drop(store);

        let reopened = SqliteStore::connect(&url, 2).await.unwrap();
        assert_eq!(reopened.list_all().await.unwrap()[0].primary_text, "MAIN");
    }
}
