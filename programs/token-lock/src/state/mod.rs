pub mod ledger_state;
pub mod registry;

pub use ledger_state::*;
pub use registry::*;
