pub mod extract;
pub mod inventory;
pub mod section;
pub mod status;
mod store;
