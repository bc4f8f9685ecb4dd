pub mod auth;
pub mod custody;
pub mod time;

pub use auth::AdminCapability;
