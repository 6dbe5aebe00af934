//! # Inventory Store Seam
//!
//! The two calls the workflow makes against inventory data. Everything
//! else about inventory (creation, listing, search) stays in `warehub-db`.

use async_trait::async_trait;
use tracing::debug;

use warehub_core::InventoryRecord;
use warehub_db::{Database, InventoryRepository};

use crate::error::StoreResult;

/// Read/write access to inventory records.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Every record whose `sku` or `barcode_text` equals `value`, in one
    /// query.
    async fn find_by_identifier(&self, value: &str) -> StoreResult<Vec<InventoryRecord>>;

    /// Writes a new quantity and refreshes `updated_at`.
    async fn update_quantity(&self, id: &str, quantity: u32) -> StoreResult<InventoryRecord>;
}

#[async_trait]
impl InventoryStore for InventoryRepository {
    async fn find_by_identifier(&self, value: &str) -> StoreResult<Vec<InventoryRecord>> {
        Ok(InventoryRepository::find_by_identifier(self, value).await?)
    }

    async fn update_quantity(&self, id: &str, quantity: u32) -> StoreResult<InventoryRecord> {
        debug!(id = %id, quantity, "Persisting quantity");
        Ok(InventoryRepository::update_quantity(self, id, quantity).await?)
    }
}

#[async_trait]
impl InventoryStore for Database {
    async fn find_by_identifier(&self, value: &str) -> StoreResult<Vec<InventoryRecord>> {
        InventoryStore::find_by_identifier(&self.inventory(), value).await
    }

    async fn update_quantity(&self, id: &str, quantity: u32) -> StoreResult<InventoryRecord> {
        InventoryStore::update_quantity(&self.inventory(), id, quantity).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use warehub_core::NewInventoryItem;
    use warehub_db::DbConfig;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_database_store_round_trip() {
        let db = test_db().await;
        let created = db
            .inventory()
            .insert(&NewInventoryItem {
                sku: "WHW-00001".to_string(),
                barcode_text: Some("ALT-1".to_string()),
                name: "Pallet wrap".to_string(),
                quantity: 50,
            })
            .await
            .unwrap();

        let store: &dyn InventoryStore = &db;
        let found = store.find_by_identifier("ALT-1").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, created.id);

        let updated = store.update_quantity(&created.id, 7).await.unwrap();
        assert_eq!(updated.quantity, 7);
    }

    #[tokio::test]
    async fn test_missing_record_maps_to_not_found() {
        let db = test_db().await;
        let store: &dyn InventoryStore = &db;

        let err = store.update_quantity("missing", 1).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }
}
