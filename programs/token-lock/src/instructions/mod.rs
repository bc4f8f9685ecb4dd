pub mod initialize_ledger;
pub mod register_schedule;
pub mod deposit_custody;
pub mod activate;
pub mod withdraw;
pub mod withdraw_all_matured;
pub mod reclaim_custody;
pub mod reclaim_foreign_asset;
pub mod native_value;
pub mod emit_recipient_quote;

pub use initialize_ledger::*;
pub use register_schedule::*;
pub use deposit_custody::*;
pub use activate::*;
pub use withdraw::*;
pub use withdraw_all_matured::*;
pub use reclaim_custody::*;
pub use reclaim_foreign_asset::*;
pub use native_value::*;
pub use emit_recipient_quote::*;
