//! # Scan Command
//!
//! ```text
//!   validate amount ──► start_scan ──► resolve ──► adjust (if requested)
//!                           │             │
//!                       Cancelled      NotFound        (no write)
//! ```

use serde::Serialize;
use tracing::debug;
use ts_rs::TS;

use warehub_core::{AdjustAmount, AdjustOperation};
use warehub_scan::ScanResolution;

use super::{AdjustmentDto, ItemDto};
use crate::error::ApiError;
use crate::state::WorkflowState;

/// What one scan did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ScanReport {
    Cancelled,
    NotFound { payload: String },
    Found { item: ItemDto },
    Adjusted { adjustment: AdjustmentDto },
}

impl ScanReport {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ScanReport::Cancelled)
    }
}

impl std::fmt::Display for ScanReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanReport::Cancelled => write!(f, "Scan cancelled"),
            ScanReport::NotFound { payload } => {
                write!(f, "No inventory item matches '{}'", payload)
            }
            ScanReport::Found { item } => write!(f, "{}", item),
            ScanReport::Adjusted { adjustment } => write!(f, "{}", adjustment),
        }
    }
}

/// Runs one scan, resolves it, and applies `delta` to a found record.
pub async fn scan(
    state: &WorkflowState,
    delta: Option<(AdjustOperation, u32)>,
) -> Result<ScanReport, ApiError> {
    let delta = delta
        .map(|(op, n)| AdjustAmount::new(n).map(|amount| (op, amount)))
        .transpose()?;

    let workflow = state.workflow();
    let record = match workflow.scan_and_resolve().await? {
        ScanResolution::Cancelled => return Ok(ScanReport::Cancelled),
        ScanResolution::NotFound { payload } => return Ok(ScanReport::NotFound { payload }),
        ScanResolution::Found { record } => record,
    };

    let Some((operation, amount)) = delta else {
        return Ok(ScanReport::Found {
            item: record.into(),
        });
    };

    debug!(sku = %record.sku, %operation, amount = amount.get(), "Adjusting scanned item");
    let previous_quantity = record.quantity;
    let updated = workflow.adjust(&record, operation, amount).await?;

    Ok(ScanReport::Adjusted {
        adjustment: AdjustmentDto {
            item: updated.into(),
            operation,
            amount: amount.get(),
            previous_quantity,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::inventory::{create, CreateItemInput};
    use crate::config::InventorySettings;
    use crate::error::ErrorCode;
    use crate::state::DbState;
    use crate::wedge::{KeyboardWedgeProvider, SilentTerminal};
    use std::sync::Arc;
    use warehub_db::{Database, DbConfig};
    use warehub_scan::ScanBackend;

    async fn setup(input: &'static [u8]) -> WorkflowState {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        create(
            &db,
            &InventorySettings::default(),
            CreateItemInput {
                name: "Pallet wrap".to_string(),
                barcode_text: Some("ALT-1".to_string()),
                sku: None,
                quantity: 50,
            },
        )
        .await
        .unwrap();

        let wedge = Arc::new(KeyboardWedgeProvider::from_reader(input));
        WorkflowState::new(ScanBackend::Native(wedge), db.store())
    }

    #[tokio::test]
    async fn test_scan_found_without_adjustment() {
        let state = setup(b"WHW-00001\n").await;

        match scan(&state, None).await.unwrap() {
            ScanReport::Found { item } => assert_eq!(item.quantity, 50),
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scan_and_subtract_by_barcode_text() {
        let state = setup(b"ALT-1\n").await;

        let report = scan(&state, Some((AdjustOperation::Subtract, 8))).await.unwrap();
        match report {
            ScanReport::Adjusted { adjustment } => {
                assert_eq!(adjustment.previous_quantity, 50);
                assert_eq!(adjustment.item.quantity, 42);
                assert_eq!(adjustment.item.sku, "WHW-00001");
            }
            other => panic!("unexpected report {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scan_unknown_payload() {
        let state = setup(b"ZZZ-999\n").await;
        assert_eq!(
            scan(&state, Some((AdjustOperation::Add, 1))).await.unwrap(),
            ScanReport::NotFound {
                payload: "ZZZ-999".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_empty_line_cancels() {
        let state = setup(b"\n").await;
        assert!(scan(&state, None).await.unwrap().is_cancelled());
    }

    #[tokio::test]
    async fn test_invalid_amount_rejected_before_scanning() {
        let state = setup(b"WHW-00001\n").await;

        let err = scan(&state, Some((AdjustOperation::Add, 0))).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        // The scanned line was not consumed.
        assert!(matches!(
            scan(&state, None).await.unwrap(),
            ScanReport::Found { .. }
        ));
    }

    #[tokio::test]
    async fn test_stop_scan_ends_command_without_input() {
        let db = DbState::new(Database::new(DbConfig::in_memory()).await.unwrap());
        let wedge = Arc::new(KeyboardWedgeProvider::from_reader(std::io::BufReader::new(
            SilentTerminal,
        )));
        let state = WorkflowState::new(ScanBackend::Native(wedge), db.store());
        let controller = state.workflow().controller().clone();

        let command = {
            let state = state.clone();
            tokio::spawn(async move { scan(&state, Some((AdjustOperation::Add, 1))).await })
        };
        while !controller.state().is_active() {
            tokio::task::yield_now().await;
        }
        controller.stop_scan();

        let report = tokio::time::timeout(std::time::Duration::from_secs(5), command)
            .await
            .expect("scan command hung after stop_scan")
            .unwrap()
            .unwrap();
        assert!(report.is_cancelled());
    }

    #[test]
    fn test_report_json_shape() {
        let json = serde_json::to_value(ScanReport::NotFound {
            payload: "ZZZ-999".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["payload"], "ZZZ-999");
    }
}
