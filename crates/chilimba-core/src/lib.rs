pub mod config;
pub mod error;
pub mod model;
pub mod money;
pub mod role;
pub mod types;
