use axum::async_trait;
use diesel::pg::PgConnection;
use diesel::sql_types::{Nullable, Text, Timestamptz};
use diesel::{OptionalExtension, RunQueryDsl};
use shared::Item;
use std::sync::Arc;

use super::{ItemPatch, ItemStore, StoreError};
use crate::db::DbPool;
use crate::models::ItemRow;

const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// PostgreSQL-backed store. Each operation is a single statement whose
/// `WHERE`/`ON CONFLICT` clause carries the existence precondition.
#[derive(Clone)]
pub struct PgItemStore {
    pool: DbPool,
    statements: Arc<Statements>,
}

impl PgItemStore {
    pub fn new(pool: DbPool, table: &str) -> Self {
        Self {
            pool,
            statements: Arc::new(Statements::for_table(table)),
        }
    }

    /// Run a blocking diesel call on the blocking thread pool.
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection, &Statements) -> Result<T, StoreError> + Send + 'static,
    {
        let pool = self.pool.clone();
        let statements = Arc::clone(&self.statements);
        tokio::task::spawn_blocking(move || {
            let mut conn = pool
                .get()
                .map_err(|e| StoreError::backend(operation, e))?;
            f(&mut conn, &statements)
        })
        .await
        .map_err(|e| StoreError::backend(operation, e))?
    }
}

/// SQL text for one table, built once.
#[derive(Debug)]
struct Statements {
    insert: String,
    select_one: String,
    select_all: String,
    update: String,
    delete: String,
}

impl Statements {
    /// `table` must already be validated as a plain identifier.
    fn for_table(table: &str) -> Self {
        Self {
            insert: format!(
                r#"INSERT INTO "{table}" ({COLUMNS}) VALUES ($1, $2, $3, $4, $5) ON CONFLICT (id) DO NOTHING"#
            ),
            select_one: format!(r#"SELECT {COLUMNS} FROM "{table}" WHERE id = $1"#),
            select_all: format!(r#"SELECT {COLUMNS} FROM "{table}""#),
            update: format!(
                r#"UPDATE "{table}" SET name = COALESCE($2, name), description = COALESCE($3, description), updated_at = GREATEST($4, created_at) WHERE id = $1 RETURNING {COLUMNS}"#
            ),
            delete: format!(r#"DELETE FROM "{table}" WHERE id = $1"#),
        }
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn put_new(&self, item: &Item) -> Result<(), StoreError> {
        let item = item.clone();
        self.with_conn("put item", move |conn, sql| {
            let inserted = diesel::sql_query(&sql.insert)
                .bind::<Text, _>(&item.id)
                .bind::<Text, _>(&item.name)
                .bind::<Nullable<Text>, _>(&item.description)
                .bind::<Timestamptz, _>(item.created_at)
                .bind::<Timestamptz, _>(item.updated_at)
                .execute(conn)
                .map_err(|e| StoreError::backend("put item", e))?;
            if inserted == 0 {
                return Err(StoreError::condition_failed(&item.id));
            }
            Ok(())
        })
        .await
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let id = id.to_string();
        self.with_conn("get item", move |conn, sql| {
            diesel::sql_query(&sql.select_one)
                .bind::<Text, _>(&id)
                .get_result::<ItemRow>(conn)
                .optional()
                .map(|row| row.map(Item::from))
                .map_err(|e| StoreError::backend("get item", e))
        })
        .await
    }

    async fn scan(&self) -> Result<Vec<Item>, StoreError> {
        self.with_conn("scan items", |conn, sql| {
            diesel::sql_query(&sql.select_all)
                .load::<ItemRow>(conn)
                .map(|rows| rows.into_iter().map(Item::from).collect::<Vec<_>>())
                .map_err(|e| StoreError::backend("scan items", e))
        })
        .await
    }

    async fn update_existing(&self, id: &str, patch: &ItemPatch) -> Result<Item, StoreError> {
        let id = id.to_string();
        let patch = patch.clone();
        self.with_conn("update item", move |conn, sql| {
            diesel::sql_query(&sql.update)
                .bind::<Text, _>(&id)
                .bind::<Nullable<Text>, _>(&patch.name)
                .bind::<Nullable<Text>, _>(&patch.description)
                .bind::<Timestamptz, _>(patch.updated_at)
                .get_result::<ItemRow>(conn)
                .optional()
                .map_err(|e| StoreError::backend("update item", e))?
                .map(Item::from)
                .ok_or_else(|| StoreError::condition_failed(&id))
        })
        .await
    }

    async fn delete_existing(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.with_conn("delete item", move |conn, sql| {
            let deleted = diesel::sql_query(&sql.delete)
                .bind::<Text, _>(&id)
                .execute(conn)
                .map_err(|e| StoreError::backend("delete item", e))?;
            if deleted == 0 {
                return Err(StoreError::condition_failed(&id));
            }
            Ok(())
        })
        .await
    }
}
