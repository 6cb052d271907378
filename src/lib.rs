pub mod alerts;
pub mod assessment;
pub mod config;
pub mod error;
pub mod ledger;
pub mod server;
pub mod service;
pub mod vendors;

pub use error::GuardError;
