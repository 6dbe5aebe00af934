//! # Inventory Repository
//!
//! Database operations for inventory records.
//!
//! ## Scannable Lookup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Lookup by Either Identifier                          │
//! │                                                                         │
//! │  Payload: "ALT-1"                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE sku = ?1 OR barcode_text = ?1      (one query, not two)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ sku        | barcode_text | quantity    │                           │
//! │  │ WHW-00001  | ALT-1        | 50          │ ← MATCH (barcode_text)    │
//! │  │ WHW-00002  | 5449000...   | 12          │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  Every match is returned; deciding what two matches mean is the        │
//! │  resolver's job.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use warehub_core::sku::parse_sequence;
use warehub_core::{InventoryRecord, NewInventoryItem};

const ENTITY: &str = "InventoryItem";

const SELECT_COLUMNS: &str =
    "id, sku, barcode_text, name, quantity, created_at, updated_at";

// =============================================================================
// Row Decoding
// =============================================================================

/// Raw `inventory_items` row as SQLite stores it.
///
/// SQLite integers are i64; the domain quantity is u32. Conversion happens
/// in one place so a malformed row becomes a `DbError::Decode` instead of
/// a wrapped or negative stock level.
#[derive(Debug, Clone, FromRow)]
struct InventoryRow {
    id: String,
    sku: String,
    barcode_text: Option<String>,
    name: String,
    quantity: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InventoryRow> for InventoryRecord {
    type Error = DbError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity).map_err(|_| {
            DbError::decode(
                ENTITY,
                format!("quantity {} for {} is out of range", row.quantity, row.sku),
            )
        })?;

        Ok(InventoryRecord {
            id: row.id,
            sku: row.sku,
            barcode_text: row.barcode_text,
            name: row.name,
            quantity,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn decode_all(rows: Vec<InventoryRow>) -> DbResult<Vec<InventoryRecord>> {
    rows.into_iter().map(InventoryRecord::try_from).collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for inventory database operations.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
}

impl InventoryRepository {
    /// Creates a new InventoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InventoryRepository { pool }
    }

    /// Returns every record whose SKU or barcode text equals `value`.
    ///
    /// ## Returns
    /// * `Ok(vec![])` - nothing matched
    /// * `Ok(records)` - one or more matches, most recently updated first
    pub async fn find_by_identifier(&self, value: &str) -> DbResult<Vec<InventoryRecord>> {
        debug!(value = %value, "Finding inventory by identifier");

        let sql = format!(
            "SELECT {} FROM inventory_items \
             WHERE sku = ?1 OR barcode_text = ?1 \
             ORDER BY updated_at DESC",
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Identifier lookup returned rows");
        decode_all(rows)
    }

    /// Gets a record by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<InventoryRecord>> {
        let sql = format!("SELECT {} FROM inventory_items WHERE id = ?1", SELECT_COLUMNS);

        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InventoryRecord::try_from).transpose()
    }

    /// Inserts a new record with a generated ID.
    ///
    /// ## Returns
    /// * `Ok(InventoryRecord)` - the stored record
    /// * `Err(DbError::UniqueViolation)` - SKU already exists
    pub async fn insert(&self, item: &NewInventoryItem) -> DbResult<InventoryRecord> {
        debug!(sku = %item.sku, "Inserting inventory item");

        let now = Utc::now();
        let record = InventoryRecord {
            id: generate_item_id(),
            sku: item.sku.trim().to_string(),
            barcode_text: item.barcode_text.clone(),
            name: item.name.trim().to_string(),
            quantity: item.quantity,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO inventory_items (
                id, sku, barcode_text, name, quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&record.id)
        .bind(&record.sku)
        .bind(&record.barcode_text)
        .bind(&record.name)
        .bind(i64::from(record.quantity))
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => {
                DbError::duplicate(field, record.sku.clone())
            }
            other => other,
        })?;

        Ok(record)
    }

    /// Writes a new absolute quantity and stamps `updated_at`.
    ///
    /// A single-row UPDATE ... RETURNING, so the write and the returned
    /// record cannot disagree. Concurrent writers are last-write-wins.
    ///
    /// ## Returns
    /// * `Ok(InventoryRecord)` - record as stored after the write
    /// * `Err(DbError::NotFound)` - no record with that ID
    pub async fn update_quantity(&self, id: &str, quantity: u32) -> DbResult<InventoryRecord> {
        debug!(id = %id, quantity = quantity, "Updating quantity");

        let sql = format!(
            "UPDATE inventory_items SET quantity = ?2, updated_at = ?3 \
             WHERE id = ?1 RETURNING {}",
            SELECT_COLUMNS
        );

        let row = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(id)
            .bind(i64::from(quantity))
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => InventoryRecord::try_from(row),
            None => Err(DbError::not_found(ENTITY, id)),
        }
    }

    /// Lists records ordered by name, optionally filtered by a substring of
    /// name, SKU or barcode text.
    pub async fn list(&self, query: Option<&str>, limit: u32) -> DbResult<Vec<InventoryRecord>> {
        let pattern = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(|q| format!("%{}%", escape_like(q)));

        debug!(pattern = ?pattern, limit = limit, "Listing inventory");

        let sql = format!(
            "SELECT {} FROM inventory_items \
             WHERE ?1 IS NULL \
                OR name LIKE ?1 ESCAPE '\\' \
                OR sku LIKE ?1 ESCAPE '\\' \
                OR barcode_text LIKE ?1 ESCAPE '\\' \
             ORDER BY name, sku \
             LIMIT ?2",
            SELECT_COLUMNS
        );

        let rows = sqlx::query_as::<_, InventoryRow>(&sql)
            .bind(pattern)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        decode_all(rows)
    }

    /// Returns the highest generated SKU for `prefix`, if any.
    ///
    /// Hand-entered SKUs that happen to share the prefix are skipped.
    /// Ordering is numeric, so `WHW-100000` beats `WHW-99999`.
    pub async fn last_generated_sku(&self, prefix: &str) -> DbResult<Option<String>> {
        let skus: Vec<String> =
            sqlx::query_scalar("SELECT sku FROM inventory_items WHERE sku LIKE ?1 || '-%'")
                .bind(prefix)
                .fetch_all(&self.pool)
                .await?;

        Ok(skus
            .into_iter()
            .filter_map(|sku| parse_sequence(prefix, &sku).map(|seq| (seq, sku)))
            .max_by_key(|(seq, _)| *seq)
            .map(|(_, sku)| sku))
    }

    /// Counts all records (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM inventory_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new inventory item ID.
/// Escapes LIKE wildcards so operator input matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn generate_item_id() -> String {
    Uuid::new_v4().to_string()
}
