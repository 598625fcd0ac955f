pub mod materializer;
pub mod stage;

pub use materializer::{plan_materialization, FailedDeal, MaterializationPlan, PlannedSalesDeal, SkippedDeal};
pub use stage::{DealPriority, FinanceStage, SalesStage, StageParseError};
