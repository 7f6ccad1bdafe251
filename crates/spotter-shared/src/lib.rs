pub mod api;
pub mod models;
pub mod ranking;

pub use models::*;
