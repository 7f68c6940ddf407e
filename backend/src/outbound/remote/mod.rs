//! Remote deployment adapters.
//!
//! A thin reqwest implementation of the `DeploymentGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::HttpDeploymentGateway;
