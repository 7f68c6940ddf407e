//! Convex Studio backend library.
//!
//! Hexagonal layout: `domain` holds entities, services and ports;
//! `inbound::http` adapts them to actix-web; `outbound` provides the
//! PostgreSQL, in-memory and remote gateway adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
