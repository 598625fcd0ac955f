// Planning half of the finance -> sales projection. Pure: takes the finance
// deals and the set of VINs already present on the sales side, returns what
// to insert and what to leave alone. The service layer owns the writes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;

use std::collections::HashSet;

use crate::database::models::{DealContact, FinanceDeal, StageHistoryEntry};

use super::stage::{DealPriority, FinanceStage, SalesStage};

/// A sales deal ready to be inserted
#[derive(Debug, Clone)]
pub struct PlannedSalesDeal {
    pub id: Uuid,
    pub vin: String,
    pub source_deal_id: Uuid,
    pub year: Option<i32>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub purchase_price: Option<Decimal>,
    pub list_price: Option<Decimal>,
    pub current_stage: SalesStage,
    pub priority: DealPriority,
    pub initial_history: Vec<StageHistoryEntry>,
    pub customer: Option<DealContact>,
}

/// A finance deal left alone because its VIN is already materialized
#[derive(Debug, Clone)]
pub struct SkippedDeal {
    pub deal_id: Uuid,
    pub vin: String,
}

/// A finance deal that cannot be materialized as-is
#[derive(Debug, Clone)]
pub struct FailedDeal {
    pub deal_id: Uuid,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct MaterializationPlan {
    pub examined: usize,
    pub to_create: Vec<PlannedSalesDeal>,
    pub skipped: Vec<SkippedDeal>,
    pub failed: Vec<FailedDeal>,
}

/// Decide, for every finance deal, whether a sales deal must be created.
/// Deals whose VIN already has a sales deal are skipped; deals without a
/// VIN or with an unmappable stage/priority are reported as failures and
/// do not abort the rest of the batch.
pub fn plan_materialization(
    finance_deals: &[FinanceDeal],
    existing_vins: &HashSet<String>,
    now: DateTime<Utc>,
) -> MaterializationPlan {
    let mut plan = MaterializationPlan {
        examined: finance_deals.len(),
        ..Default::default()
    };

    // VINs planned within this batch also count as existing, so duplicate
    // finance rows for one vehicle produce a single sales deal.
    let mut claimed: HashSet<String> = existing_vins.clone();

    for deal in finance_deals {
        let vin = match deal.vin.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                plan.failed.push(FailedDeal {
                    deal_id: deal.id,
                    reason: "finance deal has no VIN".to_string(),
                });
                continue;
            }
        };

        if claimed.contains(&vin) {
            plan.skipped.push(SkippedDeal { deal_id: deal.id, vin });
            continue;
        }

        let stage = match FinanceStage::parse(&deal.current_stage) {
            Ok(s) => s,
            Err(e) => {
                plan.failed.push(FailedDeal {
                    deal_id: deal.id,
                    reason: e.to_string(),
                });
                continue;
            }
        };
        let priority = match DealPriority::parse(&deal.priority) {
            Ok(p) => p,
            Err(e) => {
                plan.failed.push(FailedDeal {
                    deal_id: deal.id,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let sales_stage = stage.sales_stage();
        claimed.insert(vin.clone());
        plan.to_create.push(PlannedSalesDeal {
            id: Uuid::new_v4(),
            vin,
            source_deal_id: deal.id,
            year: deal.year,
            make: deal.make.clone(),
            model: deal.model.clone(),
            purchase_price: deal.purchase_price,
            list_price: deal.list_price,
            current_stage: sales_stage,
            priority,
            initial_history: vec![StageHistoryEntry {
                stage: sales_stage.as_str().to_string(),
                entered_at: now,
                note: Some(format!(
                    "materialized from finance stage '{}'",
                    stage.as_str()
                )),
            }],
            customer: deal.buyer.as_ref().map(|b| b.0.clone()),
        });
    }

    plan
}

impl MaterializationPlan {
    /// Compact summary for logs and the sync audit trail
    pub fn summary(&self) -> serde_json::Value {
        json!({
            "examined": self.examined,
            "to_create": self.to_create.len(),
            "skipped": self.skipped.len(),
            "failed": self.failed.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::types::Json;

    fn finance_deal(vin: Option<&str>, stage: &str, priority: &str) -> FinanceDeal {
        let now = Utc::now();
        FinanceDeal {
            id: Uuid::new_v4(),
            vin: vin.map(|v| v.to_string()),
            year: Some(2021),
            make: Some("Honda".to_string()),
            model: Some("Civic".to_string()),
            purchase_price: Some(Decimal::new(18_500_00, 2)),
            list_price: Some(Decimal::new(21_000_00, 2)),
            wholesale_price: None,
            seller: None,
            buyer: Some(Json(DealContact::named("Jordan Brooks"))),
            current_stage: stage.to_string(),
            priority: priority.to_string(),
            dealer_name: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn creates_sales_deal_for_unseen_vin() {
        let deals = vec![finance_deal(Some("1HGCM82633A004352"), "funds_disbursed", "normal")];
        let plan = plan_materialization(&deals, &HashSet::new(), Utc::now());

        assert_eq!(plan.to_create.len(), 1);
        assert!(plan.skipped.is_empty());
        assert!(plan.failed.is_empty());

        let planned = &plan.to_create[0];
        assert_eq!(planned.current_stage, SalesStage::Funding);
        assert_eq!(planned.priority, DealPriority::Medium);
        assert_eq!(planned.initial_history.len(), 1);
        assert_eq!(planned.customer.as_ref().unwrap().name.as_deref(), Some("Jordan Brooks"));
    }

    #[test]
    fn existing_vin_is_a_no_op() {
        let deals = vec![finance_deal(Some("1HGCM82633A004352"), "closed", "low")];
        let existing: HashSet<String> = ["1HGCM82633A004352".to_string()].into();

        let plan = plan_materialization(&deals, &existing, Utc::now());
        assert!(plan.to_create.is_empty());
        assert_eq!(plan.skipped.len(), 1);

        // re-running the same plan against the same input stays a no-op
        let again = plan_materialization(&deals, &existing, Utc::now());
        assert!(again.to_create.is_empty());
    }

    #[test]
    fn duplicate_vins_within_a_batch_create_one_deal() {
        let deals = vec![
            finance_deal(Some("VIN123"), "intake", "high"),
            finance_deal(Some("VIN123"), "approved", "high"),
        ];
        let plan = plan_materialization(&deals, &HashSet::new(), Utc::now());
        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.skipped.len(), 1);
    }

    #[test]
    fn bad_records_fail_without_aborting_the_batch() {
        let deals = vec![
            finance_deal(None, "intake", "high"),
            finance_deal(Some("  "), "intake", "high"),
            finance_deal(Some("VINOK1"), "warp-speed", "high"),
            finance_deal(Some("VINOK2"), "intake", "whenever"),
            finance_deal(Some("VINOK3"), "purchased", "normal"),
        ];
        let plan = plan_materialization(&deals, &HashSet::new(), Utc::now());

        assert_eq!(plan.examined, 5);
        assert_eq!(plan.failed.len(), 4);
        assert_eq!(plan.to_create.len(), 1);
        assert_eq!(plan.to_create[0].vin, "VINOK3");
        assert_eq!(plan.to_create[0].current_stage, SalesStage::Contract);
    }
}
