//! Database operations for the flights table.

use super::{create_pool, run_migrations, Pool};
use crate::error::StoreResult;
use crate::store::LocalStore;
use async_trait::async_trait;
use logbook_engine::{FlightRecord, RecordId};
use sqlx::{QueryBuilder, Row, Sqlite};

/// SQLite limits the number of bound parameters per statement.
const ID_BATCH: usize = 500;

/// A stored flight row from the database.
#[derive(Debug)]
pub struct StoredFlight {
    pub id: i64,
    pub timestamp: i64,
    pub is_planned: bool,
    pub unknown_to_server: bool,
    pub payload: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::sqlite::SqliteRow> for StoredFlight {
    fn from_row(row: &'r sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(StoredFlight {
            id: row.try_get("id")?,
            timestamp: row.try_get("timestamp")?,
            is_planned: row.try_get("is_planned")?,
            unknown_to_server: row.try_get("unknown_to_server")?,
            payload: row.try_get("payload")?,
        })
    }
}

impl StoredFlight {
    pub fn from_record(record: &FlightRecord) -> StoreResult<Self> {
        Ok(StoredFlight {
            id: record.id,
            timestamp: record.timestamp,
            is_planned: record.is_planned,
            unknown_to_server: record.unknown_to_server,
            payload: serde_json::to_string(record)?,
        })
    }

    /// Convert database row to a flight record.
    ///
    /// The indexed columns win over whatever the payload says.
    pub fn to_record(&self) -> StoreResult<FlightRecord> {
        let record: FlightRecord = serde_json::from_str(&self.payload)?;
        Ok(FlightRecord {
            id: self.id,
            timestamp: self.timestamp,
            is_planned: self.is_planned,
            unknown_to_server: self.unknown_to_server,
            ..record
        })
    }
}

/// `LocalStore` backed by a SQLite database.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: Pool,
}

impl SqliteStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and bring the schema up to date.
    pub async fn open(database_url: &str) -> StoreResult<Self> {
        let pool = create_pool(database_url).await?;
        run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn get_all_records(&self) -> StoreResult<Vec<FlightRecord>> {
        let rows = sqlx::query_as::<_, StoredFlight>(
            r#"
            SELECT id, timestamp, is_planned, unknown_to_server, payload
            FROM flights
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(StoredFlight::to_record).collect()
    }

    async fn get_records_by_id(&self, ids: &[RecordId]) -> StoreResult<Vec<FlightRecord>> {
        let mut records = Vec::with_capacity(ids.len());

        for batch in ids.chunks(ID_BATCH) {
            let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
                "SELECT id, timestamp, is_planned, unknown_to_server, payload FROM flights WHERE id IN (",
            );
            let mut separated = query.separated(", ");
            for id in batch {
                separated.push_bind(*id);
            }
            separated.push_unseparated(") ORDER BY id");

            let rows = query
                .build_query_as::<StoredFlight>()
                .fetch_all(&self.pool)
                .await?;
            for row in &rows {
                records.push(row.to_record()?);
            }
        }

        Ok(records)
    }

    async fn save_records(&self, records: &[FlightRecord]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            let row = StoredFlight::from_record(record)?;
            sqlx::query(
                r#"
                INSERT INTO flights (id, timestamp, is_planned, unknown_to_server, payload)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT (id) DO UPDATE SET
                    timestamp = excluded.timestamp,
                    is_planned = excluded.is_planned,
                    unknown_to_server = excluded.unknown_to_server,
                    payload = excluded.payload
                "#,
            )
            .bind(row.id)
            .bind(row.timestamp)
            .bind(row.is_planned)
            .bind(row.unknown_to_server)
            .bind(&row.payload)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!(count = records.len(), "Saved flights");
        Ok(())
    }

    async fn delete_records_hard(&self, records: &[FlightRecord]) -> StoreResult<()> {
        let mut tx = self.pool.begin().await?;

        for record in records {
            sqlx::query("DELETE FROM flights WHERE id = ?1")
                .bind(record.id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        tracing::debug!(count = records.len(), "Deleted flights");
        Ok(())
    }

    async fn allocate_next_id(&self, floor: RecordId) -> StoreResult<RecordId> {
        let row = sqlx::query(
            r#"
            UPDATE id_allocator
            SET last_id = MAX(?1, last_id, (SELECT COALESCE(MAX(id), 0) FROM flights)) + 1
            WHERE singleton = 1
            RETURNING last_id
            "#,
        )
        .bind(floor)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.try_get("last_id")?)
    }
}
