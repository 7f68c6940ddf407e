//! HTTP inbound adapter exposing REST endpoints.

pub mod browser;
pub mod dashboard;
pub mod deployments;
pub mod documents;
pub mod error;
pub mod health;
pub mod logs;
pub mod schema_cache;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;
pub mod views;

pub use error::ApiResult;
