pub mod alert;
pub mod coin;
pub mod filters;
pub mod holding;
pub mod state;
