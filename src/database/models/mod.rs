pub mod dealer;
pub mod document;
pub mod finance_deal;
pub mod sales_deal;
pub mod sync_run;
pub mod upload_token;
pub mod user;

pub use dealer::Dealer;
pub use document::{Document, DocumentType};
pub use finance_deal::{DealContact, FinanceDeal};
pub use sales_deal::{SalesDeal, StageHistoryEntry};
pub use sync_run::SyncRun;
pub use upload_token::UploadToken;
pub use user::User;
