pub mod fsops;
pub mod name;
pub mod store;

pub use name::{require_name, sanitize_name};
pub use store::ProfileStore;
